//! Ledger store traits and the in-memory implementation.
//!
//! This module provides:
//! - [`AccountStore`]: account lookup and persistence
//! - [`ReceiptStore`]: receipt persistence keyed by transaction hash
//! - [`LedgerStore`]: combined trait the executor runs against
//! - [`LedgerState`]: in-memory HashMap-backed implementation

mod ledger_state;
mod store;

pub use ledger_state::LedgerState;
pub use store::{AccountStore, LedgerStore, ReceiptStore};
