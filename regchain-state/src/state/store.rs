//! Ledger store traits.
//!
//! These traits abstract over the backing store so the same executor runs
//! against the in-memory [`LedgerState`](super::LedgerState) and the
//! persistent ledger in `regchain-storage`.

use std::fmt::Display;

use regchain_core::{Account, Identity, Receipt, TxHash};

/// Account lookup and persistence.
///
/// Methods take `&mut self` to allow implementations to lazily load data
/// from persistent storage into an internal cache on first access.
pub trait AccountStore {
    /// Store failure.
    type Error: Display;

    /// Load a copy of the account named by `uid`.
    ///
    /// Public keys resolve through their key id, registration ids through
    /// the store's reg-id index. `Ok(None)` is a miss.
    fn get_account(&mut self, uid: &Identity) -> Result<Option<Account>, Self::Error>;

    /// Persist an account, replacing any previous record under its key id.
    ///
    /// A registered account also becomes reachable by its registration id.
    fn save_account(&mut self, account: &Account) -> Result<(), Self::Error>;
}

/// Receipt persistence.
pub trait ReceiptStore {
    /// Store failure.
    type Error: Display;

    /// Store the receipt list of a transaction.
    fn set_tx_receipts(&mut self, tx_hash: &TxHash, receipts: &[Receipt]) -> Result<(), Self::Error>;

    /// Load the receipt list of a transaction.
    fn get_tx_receipts(&mut self, tx_hash: &TxHash) -> Result<Option<Vec<Receipt>>, Self::Error>;
}

/// Combined trait for full ledger access.
///
/// Any type implementing both `AccountStore` and `ReceiptStore`
/// automatically implements `LedgerStore`.
pub trait LedgerStore: AccountStore + ReceiptStore {}

// Blanket implementation
impl<T: AccountStore + ReceiptStore> LedgerStore for T {}
