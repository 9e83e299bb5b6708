//! In-memory ledger state container.

use std::collections::HashMap;
use std::convert::Infallible;

use regchain_core::{
    Account, AccountError, BalanceOp, Identity, KeyId, Receipt, RegId, TokenSymbol, TxHash,
};

use super::store::{AccountStore, ReceiptStore};

/// In-memory ledger state backed by HashMaps.
///
/// This is the testing and development implementation. The persistent
/// ledger in `regchain-storage` implements the same traits.
#[derive(Clone, Debug, Default)]
pub struct LedgerState {
    /// All accounts by key id.
    pub accounts: HashMap<KeyId, Account>,

    /// Registration id to key id index for registered accounts.
    pub reg_ids: HashMap<RegId, KeyId>,

    /// Receipt lists by transaction hash.
    pub receipts: HashMap<TxHash, Vec<Receipt>>,
}

impl LedgerState {
    /// Create a new empty ledger state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `symbol` to the account under `key_id`, creating
    /// an unregistered account if none exists.
    pub fn fund(
        &mut self,
        key_id: KeyId,
        symbol: &TokenSymbol,
        amount: u64,
    ) -> Result<(), AccountError> {
        self.accounts
            .entry(key_id)
            .or_insert_with(|| Account::new(key_id))
            .operate_balance(symbol, BalanceOp::AddFree, amount)
    }

    /// Resolve an identity to the key id accounts are stored under.
    pub fn resolve_key_id(&self, uid: &Identity) -> Option<KeyId> {
        match uid {
            Identity::Absent => None,
            Identity::RegId(reg_id) => self.reg_ids.get(reg_id).copied(),
            Identity::KeyId(key_id) => Some(*key_id),
            Identity::PublicKey(key) => Some(key.key_id()),
        }
    }

    /// Number of accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of registered accounts.
    pub fn registered_count(&self) -> usize {
        self.reg_ids.len()
    }
}

impl AccountStore for LedgerState {
    type Error = Infallible;

    fn get_account(&mut self, uid: &Identity) -> Result<Option<Account>, Infallible> {
        Ok(self
            .resolve_key_id(uid)
            .and_then(|key_id| self.accounts.get(&key_id))
            .cloned())
    }

    fn save_account(&mut self, account: &Account) -> Result<(), Infallible> {
        if let Some(reg_id) = account.reg_id() {
            self.reg_ids.insert(reg_id, account.key_id);
        }
        self.accounts.insert(account.key_id, account.clone());
        Ok(())
    }
}

impl ReceiptStore for LedgerState {
    type Error = Infallible;

    fn set_tx_receipts(&mut self, tx_hash: &TxHash, receipts: &[Receipt]) -> Result<(), Infallible> {
        self.receipts.insert(*tx_hash, receipts.to_vec());
        Ok(())
    }

    fn get_tx_receipts(&mut self, tx_hash: &TxHash) -> Result<Option<Vec<Receipt>>, Infallible> {
        Ok(self.receipts.get(tx_hash).cloned())
    }
}
