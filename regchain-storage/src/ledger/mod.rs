//! Persistent ledger implementation.
//!
//! This module provides `PersistentLedger`, which implements the
//! `AccountStore` and `ReceiptStore` traits from `regchain-state` over a
//! key-value backend.

mod journal;
mod store;

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use regchain_core::serialization::{deserialize, serialize};
use regchain_core::{
    Account, AccountRegisterTx, BalanceOp, Identity, KeyId, Receipt, RegId, TokenSymbol, TxHash,
};
use regchain_state::{execute_tx, ExecutionContext, ValidationState};

use crate::error::StorageError;
use crate::keys::{KeyPrefix, StateKey};
use crate::kv::{KvBackend, WriteBatch};

use journal::{Journal, Prior};

pub use journal::Savepoint;

/// Ledger backed by a key-value store.
///
/// Writes go to in-memory caches and are journaled until
/// [`commit`](Self::commit) flushes them to the backend in one atomic
/// batch. A block is applied with [`apply_tx`](Self::apply_tx) per
/// transaction and one commit at the end; a rejected transaction is unwound
/// to its own [`Savepoint`] and the rest of the block stays staged.
///
/// ## Usage
///
/// ```ignore
/// let backend = Arc::new(RocksBackend::open("ledger.db")?);
/// let mut ledger = PersistentLedger::new(backend);
///
/// let height = ledger.advance_tip()?;
/// for (index, tx) in block.iter().enumerate() {
///     let ctx = ExecutionContext::new(height, index as u16);
///     ledger.apply_tx(tx, &ctx, &mut ValidationState::new());
/// }
/// ledger.commit()?;
/// ```
pub struct PersistentLedger<B: KvBackend> {
    /// The underlying KV backend.
    backend: Arc<B>,

    // === Caches ===

    /// Account cache.
    account_cache: HashMap<KeyId, Account>,
    /// Registration id index cache.
    reg_id_cache: HashMap<RegId, KeyId>,
    /// Receipt cache.
    receipt_cache: HashMap<TxHash, Vec<Receipt>>,
    /// Tip height, once loaded.
    tip: Option<u32>,

    /// Writes staged since the last commit.
    journal: Journal,
}

impl<B: KvBackend> PersistentLedger<B> {
    /// Create a ledger over `backend`. Previously committed data is read
    /// lazily on first access.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            account_cache: HashMap::new(),
            reg_id_cache: HashMap::new(),
            receipt_cache: HashMap::new(),
            tip: None,
            journal: Journal::default(),
        }
    }

    /// Get the backend.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Load an account into the cache.
    pub fn load_account(&mut self, key_id: &KeyId) -> Result<Option<&Account>, StorageError> {
        if !self.account_cache.contains_key(key_id) {
            let key = StateKey::Account(*key_id).to_bytes();
            match self.backend.get(&key)? {
                Some(bytes) => {
                    let account: Account = deserialize(&bytes)?;
                    self.account_cache.insert(*key_id, account);
                }
                None => return Ok(None),
            }
        }
        Ok(self.account_cache.get(key_id))
    }

    /// Resolve an identity to the key id its account is stored under.
    pub fn resolve_key_id(&mut self, uid: &Identity) -> Result<Option<KeyId>, StorageError> {
        match uid {
            Identity::Absent => Ok(None),
            Identity::KeyId(key_id) => Ok(Some(*key_id)),
            Identity::PublicKey(key) => Ok(Some(key.key_id())),
            Identity::RegId(reg_id) => self.load_reg_id(reg_id),
        }
    }

    fn load_reg_id(&mut self, reg_id: &RegId) -> Result<Option<KeyId>, StorageError> {
        if let Some(key_id) = self.reg_id_cache.get(reg_id) {
            return Ok(Some(*key_id));
        }

        let key = StateKey::RegIdIndex(*reg_id).to_bytes();
        if let Some(bytes) = self.backend.get(&key)? {
            let key_id: KeyId = deserialize(&bytes)?;
            self.reg_id_cache.insert(*reg_id, key_id);
            Ok(Some(key_id))
        } else {
            Ok(None)
        }
    }

    /// Height of the last block, or 0 for a fresh ledger.
    pub fn tip_height(&mut self) -> Result<u32, StorageError> {
        if let Some(height) = self.tip {
            return Ok(height);
        }

        let height = match self.backend.get(&StateKey::Tip.to_bytes())? {
            Some(bytes) => deserialize::<u32>(&bytes)?,
            None => 0,
        };
        self.tip = Some(height);
        Ok(height)
    }

    /// Open the next block: stage the tip one height up and return it.
    ///
    /// Transactions applied before the next commit share this height, so
    /// each must use a distinct index.
    pub fn advance_tip(&mut self) -> Result<u32, StorageError> {
        let height = self
            .tip_height()?
            .checked_add(1)
            .ok_or_else(|| StorageError::InconsistentState("tip height exhausted".into()))?;
        let prior = self.tip.replace(height);
        self.journal.record(Prior::Tip(prior));
        Ok(height)
    }

    /// Credit `amount` of `symbol` to the account under `key_id`, creating
    /// an unregistered account if none exists.
    pub fn fund(
        &mut self,
        key_id: KeyId,
        symbol: &TokenSymbol,
        amount: u64,
    ) -> Result<(), StorageError> {
        let mut account = match self.load_account(&key_id)? {
            Some(account) => account.clone(),
            None => Account::new(key_id),
        };
        account.operate_balance(symbol, BalanceOp::AddFree, amount)?;
        self.stage_account(account);
        Ok(())
    }

    /// Execute a registration against the staged state.
    ///
    /// On rejection only this transaction's writes are unwound; writes
    /// staged by earlier transactions since the last commit are kept.
    pub fn apply_tx(
        &mut self,
        tx: &AccountRegisterTx,
        ctx: &ExecutionContext,
        state: &mut ValidationState,
    ) -> bool {
        let savepoint = self.savepoint();
        let accepted = execute_tx(self, tx, ctx, state);
        if !accepted {
            self.rollback_to(savepoint);
        }
        accepted
    }

    /// Current journal position.
    pub fn savepoint(&self) -> Savepoint {
        self.journal.savepoint()
    }

    /// Number of distinct entries written since the last commit.
    pub fn pending_changes(&self) -> usize {
        self.journal.touched_keys().len()
    }

    /// Flush all staged entries to the backend in one atomic batch.
    ///
    /// Returns the number of entries written. If the backend write fails
    /// the entries stay staged.
    pub fn commit(&mut self) -> Result<usize, StorageError> {
        let mut batch = WriteBatch::new();
        for key in self.journal.touched_keys() {
            let value = self.serialize_entry(&key)?;
            batch.put(key.to_bytes(), value);
        }

        let written = batch.len();
        if !batch.is_empty() {
            self.backend.apply(batch)?;
        }
        self.journal.clear();

        tracing::debug!(entries = written, "ledger committed");
        Ok(written)
    }

    /// Undo the writes staged after `savepoint`.
    pub fn rollback_to(&mut self, savepoint: Savepoint) {
        let undone = self.journal.unwind(savepoint);
        let count = undone.len();
        for prior in undone {
            match prior {
                Prior::Account(key_id, account) => restore(&mut self.account_cache, key_id, account),
                Prior::RegIdIndex(reg_id, key_id) => restore(&mut self.reg_id_cache, reg_id, key_id),
                Prior::Receipts(tx_hash, receipts) => {
                    restore(&mut self.receipt_cache, tx_hash, receipts)
                }
                Prior::Tip(height) => self.tip = height,
            }
        }

        tracing::debug!(writes = count, "ledger rolled back");
    }

    /// Undo everything staged since the last commit.
    pub fn rollback(&mut self) {
        self.rollback_to(Savepoint(0));
    }

    /// All committed accounts, in key id order.
    pub fn committed_accounts(&self) -> Result<Vec<Account>, StorageError> {
        self.backend
            .scan_prefix(&[KeyPrefix::Account as u8])?
            .iter()
            .map(|(_, bytes)| deserialize::<Account>(bytes).map_err(StorageError::from))
            .collect()
    }

    pub(crate) fn stage_account(&mut self, account: Account) {
        let key_id = account.key_id;
        let prior = self.account_cache.insert(key_id, account);
        self.journal.record(Prior::Account(key_id, prior));
    }

    pub(crate) fn stage_reg_id(&mut self, reg_id: RegId, key_id: KeyId) {
        let prior = self.reg_id_cache.insert(reg_id, key_id);
        self.journal.record(Prior::RegIdIndex(reg_id, prior));
    }

    pub(crate) fn stage_receipts(&mut self, tx_hash: TxHash, receipts: Vec<Receipt>) {
        let prior = self.receipt_cache.insert(tx_hash, receipts);
        self.journal.record(Prior::Receipts(tx_hash, prior));
    }

    pub(crate) fn cached_receipts(&self, tx_hash: &TxHash) -> Option<&Vec<Receipt>> {
        self.receipt_cache.get(tx_hash)
    }

    pub(crate) fn cache_receipts(&mut self, tx_hash: TxHash, receipts: Vec<Receipt>) {
        self.receipt_cache.insert(tx_hash, receipts);
    }

    /// Serialize a staged entry from cache.
    fn serialize_entry(&self, key: &StateKey) -> Result<Vec<u8>, StorageError> {
        let encoded = match key {
            StateKey::Account(key_id) => self.account_cache.get(key_id).map(serialize),
            StateKey::RegIdIndex(reg_id) => self.reg_id_cache.get(reg_id).map(serialize),
            StateKey::Receipts(tx_hash) => self.receipt_cache.get(tx_hash).map(serialize),
            StateKey::Tip => self.tip.as_ref().map(serialize),
        };
        match encoded {
            Some(bytes) => Ok(bytes?),
            None => Err(StorageError::InconsistentState(format!(
                "staged {:?} missing from cache",
                key
            ))),
        }
    }
}

fn restore<K: Eq + Hash, V>(cache: &mut HashMap<K, V>, key: K, prior: Option<V>) {
    match prior {
        Some(value) => {
            cache.insert(key, value);
        }
        None => {
            cache.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryBackend;
    use regchain_core::{KeyPair, NATIVE_SYMBOL};
    use regchain_state::{AccountStore, ReceiptStore};

    fn create_ledger() -> (PersistentLedger<MemoryBackend>, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        (PersistentLedger::new(Arc::clone(&backend)), backend)
    }

    fn registered_account(kp: &KeyPair, reg_id: RegId) -> Account {
        let mut account = Account::new(kp.raw_public_key().key_id());
        account.register(reg_id, kp.public_key(), None).unwrap();
        account
    }

    fn register_tx(kp: &KeyPair, fees: u64) -> AccountRegisterTx {
        AccountRegisterTx::new(Identity::PublicKey(kp.raw_public_key()), Identity::Absent, fees, 1)
    }

    #[test]
    fn test_writes_are_staged_until_commit() {
        let (mut ledger, backend) = create_ledger();
        ledger.fund([1u8; 20], &NATIVE_SYMBOL, 10).unwrap();
        ledger.fund([1u8; 20], &NATIVE_SYMBOL, 5).unwrap();

        assert_eq!(ledger.pending_changes(), 1);
        assert!(backend.is_empty().unwrap());

        assert_eq!(ledger.commit().unwrap(), 1);
        assert_eq!(ledger.pending_changes(), 0);
        assert_eq!(backend.len().unwrap(), 1);
    }

    #[test]
    fn test_persist_and_reload() {
        let kp = KeyPair::generate();
        let backend = Arc::new(MemoryBackend::new());
        let account = registered_account(&kp, RegId::new(4, 2));

        {
            let mut ledger = PersistentLedger::new(Arc::clone(&backend));
            ledger.save_account(&account).unwrap();
            ledger
                .set_tx_receipts(&[7u8; 32], &[Receipt::fee(account.key_id, NATIVE_SYMBOL, 5)])
                .unwrap();
            assert_eq!(ledger.commit().unwrap(), 3);
        }

        let mut ledger = PersistentLedger::new(backend);
        let by_reg_id = ledger
            .get_account(&Identity::RegId(RegId::new(4, 2)))
            .unwrap()
            .unwrap();
        assert_eq!(by_reg_id, account);
        assert_eq!(ledger.get_tx_receipts(&[7u8; 32]).unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_rollback_restores_committed_value() {
        let (mut ledger, _backend) = create_ledger();
        let key_id = [2u8; 20];
        ledger.fund(key_id, &NATIVE_SYMBOL, 100).unwrap();
        ledger.commit().unwrap();

        ledger.fund(key_id, &NATIVE_SYMBOL, 50).unwrap();
        ledger.set_tx_receipts(&[1u8; 32], &[]).unwrap();
        ledger.rollback();

        let account = ledger.get_account(&Identity::KeyId(key_id)).unwrap().unwrap();
        assert_eq!(account.free_balance(&NATIVE_SYMBOL), 100);
        assert!(ledger.get_tx_receipts(&[1u8; 32]).unwrap().is_none());
        assert_eq!(ledger.pending_changes(), 0);
    }

    #[test]
    fn test_rollback_of_new_account() {
        let (mut ledger, backend) = create_ledger();
        let kp = KeyPair::generate();
        ledger.save_account(&registered_account(&kp, RegId::new(1, 1))).unwrap();

        ledger.rollback();

        assert!(ledger
            .get_account(&Identity::RegId(RegId::new(1, 1)))
            .unwrap()
            .is_none());
        assert_eq!(ledger.commit().unwrap(), 0);
        assert!(backend.is_empty().unwrap());
    }

    #[test]
    fn test_rollback_to_keeps_earlier_writes() {
        let (mut ledger, backend) = create_ledger();
        ledger.fund([1u8; 20], &NATIVE_SYMBOL, 10).unwrap();
        let savepoint = ledger.savepoint();
        ledger.fund([1u8; 20], &NATIVE_SYMBOL, 5).unwrap();
        ledger.fund([2u8; 20], &NATIVE_SYMBOL, 7).unwrap();

        ledger.rollback_to(savepoint);

        let account = ledger.get_account(&Identity::KeyId([1u8; 20])).unwrap().unwrap();
        assert_eq!(account.free_balance(&NATIVE_SYMBOL), 10);
        assert!(ledger.get_account(&Identity::KeyId([2u8; 20])).unwrap().is_none());
        assert_eq!(ledger.commit().unwrap(), 1);
        assert_eq!(backend.len().unwrap(), 1);
    }

    #[test]
    fn test_apply_tx_unwinds_only_rejected_tx() {
        let (mut ledger, _backend) = create_ledger();
        let first = KeyPair::from_bytes(&[1u8; 32]);
        let second = KeyPair::from_bytes(&[2u8; 32]);
        ledger.fund(first.raw_public_key().key_id(), &NATIVE_SYMBOL, 10).unwrap();
        ledger.fund(second.raw_public_key().key_id(), &NATIVE_SYMBOL, 10).unwrap();
        ledger.commit().unwrap();

        let height = ledger.advance_tip().unwrap();
        let mut state = ValidationState::new();
        assert!(ledger.apply_tx(&register_tx(&first, 3), &ExecutionContext::new(height, 0), &mut state));

        let mut state = ValidationState::new();
        assert!(!ledger.apply_tx(&register_tx(&second, 11), &ExecutionContext::new(height, 1), &mut state));
        assert_eq!(state.reject_reason(), "insufficent-funds");

        let account = ledger
            .get_account(&Identity::PublicKey(first.raw_public_key()))
            .unwrap()
            .unwrap();
        assert_eq!(account.reg_id(), Some(RegId::new(1, 0)));
        assert_eq!(account.free_balance(&NATIVE_SYMBOL), 7);
        // tip + account + reg-id index + receipts
        assert_eq!(ledger.pending_changes(), 4);
    }

    #[test]
    fn test_tip_advances_and_persists() {
        let (mut ledger, backend) = create_ledger();
        assert_eq!(ledger.tip_height().unwrap(), 0);

        assert_eq!(ledger.advance_tip().unwrap(), 1);
        ledger.rollback();
        assert_eq!(ledger.tip_height().unwrap(), 0);

        assert_eq!(ledger.advance_tip().unwrap(), 1);
        assert_eq!(ledger.advance_tip().unwrap(), 2);
        ledger.commit().unwrap();

        let mut reopened = PersistentLedger::new(backend);
        assert_eq!(reopened.tip_height().unwrap(), 2);
    }

    #[test]
    fn test_committed_accounts() {
        let (mut ledger, _backend) = create_ledger();
        ledger.fund([3u8; 20], &NATIVE_SYMBOL, 1).unwrap();
        ledger.fund([1u8; 20], &NATIVE_SYMBOL, 2).unwrap();
        ledger.commit().unwrap();
        ledger.fund([2u8; 20], &NATIVE_SYMBOL, 3).unwrap();

        let accounts = ledger.committed_accounts().unwrap();
        let key_ids: Vec<KeyId> = accounts.iter().map(|a| a.key_id).collect();
        assert_eq!(key_ids, vec![[1u8; 20], [3u8; 20]]);
    }

    #[test]
    fn test_fund_overflow_is_not_staged() {
        let (mut ledger, _backend) = create_ledger();
        ledger.fund([4u8; 20], &NATIVE_SYMBOL, u64::MAX).unwrap();
        ledger.commit().unwrap();

        let err = ledger.fund([4u8; 20], &NATIVE_SYMBOL, 1).unwrap_err();
        assert!(matches!(err, StorageError::Account(_)));
        assert_eq!(ledger.pending_changes(), 0);
    }
}
