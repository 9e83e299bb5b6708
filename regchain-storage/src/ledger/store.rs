//! `AccountStore` and `ReceiptStore` for `PersistentLedger`.

use regchain_core::{Account, Identity, Receipt, TxHash};
use regchain_state::{AccountStore, ReceiptStore};

use super::PersistentLedger;
use crate::error::StorageError;
use crate::keys::StateKey;
use crate::kv::KvBackend;

impl<B: KvBackend> AccountStore for PersistentLedger<B> {
    type Error = StorageError;

    fn get_account(&mut self, uid: &Identity) -> Result<Option<Account>, StorageError> {
        let Some(key_id) = self.resolve_key_id(uid)? else {
            return Ok(None);
        };

        let account = self.load_account(&key_id)?.cloned();
        if account.is_none() && matches!(uid, Identity::RegId(_)) {
            return Err(StorageError::InconsistentState(format!(
                "{} indexes missing account {}",
                uid,
                hex::encode(key_id)
            )));
        }
        Ok(account)
    }

    fn save_account(&mut self, account: &Account) -> Result<(), StorageError> {
        if let Some(reg_id) = account.reg_id() {
            self.stage_reg_id(reg_id, account.key_id);
        }
        self.stage_account(account.clone());
        Ok(())
    }
}

impl<B: KvBackend> ReceiptStore for PersistentLedger<B> {
    type Error = StorageError;

    fn set_tx_receipts(&mut self, tx_hash: &TxHash, receipts: &[Receipt]) -> Result<(), StorageError> {
        self.stage_receipts(*tx_hash, receipts.to_vec());
        Ok(())
    }

    fn get_tx_receipts(&mut self, tx_hash: &TxHash) -> Result<Option<Vec<Receipt>>, StorageError> {
        if let Some(receipts) = self.cached_receipts(tx_hash) {
            return Ok(Some(receipts.clone()));
        }

        let key = StateKey::Receipts(*tx_hash).to_bytes();
        match self.backend().get(&key)? {
            Some(bytes) => {
                let receipts: Vec<Receipt> = regchain_core::serialization::deserialize(&bytes)?;
                self.cache_receipts(*tx_hash, receipts.clone());
                Ok(Some(receipts))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::kv::{MemoryBackend, WriteBatch};
    use regchain_core::RegId;

    #[test]
    fn test_dangling_reg_id_index_is_error() {
        let backend = Arc::new(MemoryBackend::new());
        let reg_id = RegId::new(9, 9);
        let mut batch = WriteBatch::new();
        batch.put(
            StateKey::RegIdIndex(reg_id).to_bytes(),
            regchain_core::serialization::serialize(&[5u8; 20]).unwrap(),
        );
        backend.apply(batch).unwrap();

        let mut ledger = PersistentLedger::new(backend);
        let err = ledger.get_account(&Identity::RegId(reg_id)).unwrap_err();
        assert!(matches!(err, StorageError::InconsistentState(_)));
    }

    #[test]
    fn test_unknown_identities_miss() {
        let mut ledger = PersistentLedger::new(Arc::new(MemoryBackend::new()));
        assert!(ledger.get_account(&Identity::Absent).unwrap().is_none());
        assert!(ledger.get_account(&Identity::KeyId([1u8; 20])).unwrap().is_none());
        assert!(ledger
            .get_account(&Identity::RegId(RegId::new(1, 0)))
            .unwrap()
            .is_none());
    }
}
