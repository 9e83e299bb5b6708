//! State machine for regchain account registration.
//!
//! This crate implements the two-phase registration core. CheckTx validates
//! a transaction without any store access; ExecuteTx applies it to the
//! ledger or fails without a trace. Persistence lives in `regchain-storage`.
//!
//! # Key Components
//!
//! - [`LedgerState`]: In-memory ledger backed by HashMaps
//! - [`AccountStore`]/[`ReceiptStore`]: Traits abstracting ledger access
//! - [`check_tx`]/[`execute_tx`]: Driver entry points reporting through [`ValidationState`]
//! - [`StateError`]: Rejection taxonomy with stable reason codes
//!
//! # Example
//!
//! ```ignore
//! use regchain_state::{execute_tx, ExecutionContext, LedgerState, ValidationState};
//!
//! let mut ledger = LedgerState::new();
//! let mut state = ValidationState::new();
//! let ctx = ExecutionContext::new(block_height, tx_index);
//! let accepted = execute_tx(&mut ledger, &tx, &ctx, &mut state);
//! ```

mod error;
mod execute;
mod state;
mod validation;

pub use error::{StateError, StateResult};
pub use execute::{
    check_account_register, check_tx, execute_account_register, execute_tx, ExecutionContext,
};
pub use state::{AccountStore, LedgerState, LedgerStore, ReceiptStore};
pub use validation::{RejectClass, ValidationMode, ValidationState, REJECT_DOS_SCORE};
