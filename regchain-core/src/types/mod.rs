//! Ledger data types.
//!
//! - [`Identity`]: closed union of the ways a participant is named
//! - [`RegId`]: registration id minted when a registration is included
//! - [`Account`] with its explicit [`Registration`] state and token balances
//! - [`Receipt`]: record of a balance-affecting event
//! - [`TokenSymbol`]: 8-byte currency tag

mod account;
mod identity;
mod receipt;
mod reg_id;
mod symbol;

pub use account::{Account, AccountToken, BalanceOp, Registration};
pub use identity::{Identity, IdentityKind};
pub use receipt::{Receipt, ReceiptCode};
pub use reg_id::{RegId, REG_ID_BYTES};
pub use symbol::{symbol_from_str, symbol_to_string, TokenSymbol, NATIVE_SYMBOL};

/// 20-byte account key id (first 20 bytes of SHA-256 of the public key).
pub type KeyId = [u8; 20];
