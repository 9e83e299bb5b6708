//! Transaction types.

mod account_register;

pub use account_register::{AccountRegisterTx, TxHash, TxType, CURRENT_TX_VERSION};
