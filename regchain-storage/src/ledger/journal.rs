//! Undo journal for staged ledger writes.
//!
//! Every staged write records the cache entry it replaced. Unwinding to a
//! [`Savepoint`] restores those entries newest first, which discards the
//! writes of one transaction and leaves earlier ones in the block alone.

use std::collections::HashSet;

use regchain_core::{Account, KeyId, Receipt, RegId, TxHash};

use crate::keys::StateKey;

/// Journal position to unwind to.
///
/// Only meaningful until the next commit or full rollback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Savepoint(pub(super) usize);

/// Cache entry replaced by a staged write.
///
/// `None` means the entry was not cached; the backend still holds its
/// committed value, so undoing the write just evicts it.
#[derive(Clone, Debug)]
pub(super) enum Prior {
    Account(KeyId, Option<Account>),
    RegIdIndex(RegId, Option<KeyId>),
    Receipts(TxHash, Option<Vec<Receipt>>),
    Tip(Option<u32>),
}

impl Prior {
    fn key(&self) -> StateKey {
        match self {
            Prior::Account(key_id, _) => StateKey::Account(*key_id),
            Prior::RegIdIndex(reg_id, _) => StateKey::RegIdIndex(*reg_id),
            Prior::Receipts(tx_hash, _) => StateKey::Receipts(*tx_hash),
            Prior::Tip(_) => StateKey::Tip,
        }
    }
}

/// Ordered record of writes staged since the last commit.
#[derive(Debug, Default)]
pub(super) struct Journal {
    entries: Vec<Prior>,
}

impl Journal {
    pub(super) fn record(&mut self, prior: Prior) {
        self.entries.push(prior);
    }

    pub(super) fn savepoint(&self) -> Savepoint {
        Savepoint(self.entries.len())
    }

    /// Remove the entries recorded after `savepoint`, newest first.
    pub(super) fn unwind(&mut self, savepoint: Savepoint) -> Vec<Prior> {
        let start = savepoint.0.min(self.entries.len());
        let mut undone = self.entries.split_off(start);
        undone.reverse();
        undone
    }

    /// Distinct keys written since the last commit.
    pub(super) fn touched_keys(&self) -> HashSet<StateKey> {
        self.entries.iter().map(Prior::key).collect()
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touched_keys_are_distinct() {
        let mut journal = Journal::default();
        journal.record(Prior::Account([1u8; 20], None));
        journal.record(Prior::Account([1u8; 20], Some(Account::new([1u8; 20]))));
        journal.record(Prior::Tip(Some(3)));

        let keys = journal.touched_keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&StateKey::Account([1u8; 20])));
        assert!(keys.contains(&StateKey::Tip));
    }

    #[test]
    fn test_unwind_returns_newest_first() {
        let mut journal = Journal::default();
        journal.record(Prior::Tip(None));
        let savepoint = journal.savepoint();
        journal.record(Prior::Tip(Some(1)));
        journal.record(Prior::Tip(Some(2)));

        let undone = journal.unwind(savepoint);
        assert!(matches!(undone.as_slice(), [Prior::Tip(Some(2)), Prior::Tip(Some(1))]));
        assert_eq!(journal.savepoint(), savepoint);
    }

    #[test]
    fn test_unwind_past_end_is_empty() {
        let mut journal = Journal::default();
        let stale = Savepoint(5);
        journal.record(Prior::Tip(None));

        assert!(journal.unwind(stale).is_empty());
        assert_eq!(journal.touched_keys().len(), 1);
    }
}
