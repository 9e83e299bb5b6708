//! Key-value backends under the persistent ledger.
//!
//! The ledger asks a backend for three things: point reads, ordered prefix
//! scans, and all-or-nothing application of one commit's writes.
//! - `MemoryBackend`: BTreeMap behind a lock, for tests and tooling
//! - `RocksBackend`: RocksDB on disk

mod memory_backend;
mod rocks_backend;

pub use memory_backend::MemoryBackend;
pub use rocks_backend::RocksBackend;

use std::collections::BTreeMap;

use crate::error::StorageError;

/// Entries returned by [`KvBackend::scan_prefix`], in key order.
pub type KvEntries = Vec<(Vec<u8>, Vec<u8>)>;

/// Ordered key-value store the ledger commits into.
pub trait KvBackend: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// All entries whose key starts with `prefix`, in key order.
    ///
    /// A read failure part-way through is an error, never a short result.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<KvEntries, StorageError>;

    /// Apply every write in `batch`, or none of them.
    fn apply(&self, batch: WriteBatch) -> Result<(), StorageError>;

    /// Make applied batches durable.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Writes applied together by [`KvBackend::apply`].
///
/// Keyed by storage key: staging a key twice keeps the last value, and the
/// batch is applied in key order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl WriteBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `value` under `key`.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.writes.insert(key, value);
    }

    /// Number of distinct keys written.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Check if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Consume the batch, yielding writes in key order.
    pub fn into_writes(self) -> impl Iterator<Item = (Vec<u8>, Vec<u8>)> {
        self.writes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(writes: &[(&[u8], &[u8])]) -> WriteBatch {
        let mut batch = WriteBatch::new();
        for (key, value) in writes {
            batch.put(key.to_vec(), value.to_vec());
        }
        batch
    }

    fn check_apply_then_read<B: KvBackend>(backend: B) {
        assert!(backend.get(b"account").unwrap().is_none());

        backend
            .apply(batch(&[(b"account", b"a"), (b"receipts", b"r")]))
            .unwrap();
        backend.apply(batch(&[(b"account", b"a2")])).unwrap();

        assert_eq!(backend.get(b"account").unwrap(), Some(b"a2".to_vec()));
        assert_eq!(backend.get(b"receipts").unwrap(), Some(b"r".to_vec()));
    }

    fn check_scan_prefix<B: KvBackend>(backend: B) {
        backend
            .apply(batch(&[(&[0x01, 2], b"2"), (&[0x01, 1], b"1"), (&[0x02, 0], b"x")]))
            .unwrap();

        assert_eq!(
            backend.scan_prefix(&[0x01]).unwrap(),
            vec![
                (vec![0x01, 1], b"1".to_vec()),
                (vec![0x01, 2], b"2".to_vec()),
            ]
        );
        assert!(backend.scan_prefix(&[0x03]).unwrap().is_empty());
        assert_eq!(backend.scan_prefix(&[]).unwrap().len(), 3);
    }

    #[test]
    fn test_batch_keeps_last_write() {
        let mut batch = WriteBatch::new();
        batch.put(b"k".to_vec(), b"1".to_vec());
        batch.put(b"k".to_vec(), b"2".to_vec());
        batch.put(b"a".to_vec(), b"0".to_vec());

        assert_eq!(batch.len(), 2);
        let writes: Vec<_> = batch.into_writes().collect();
        assert_eq!(
            writes,
            vec![
                (b"a".to_vec(), b"0".to_vec()),
                (b"k".to_vec(), b"2".to_vec()),
            ]
        );
    }

    #[test]
    fn test_memory_backend_apply() {
        check_apply_then_read(MemoryBackend::new());
    }

    #[test]
    fn test_memory_backend_scan_prefix() {
        check_scan_prefix(MemoryBackend::new());
    }

    #[test]
    fn test_rocks_backend_apply() {
        let dir = tempfile::TempDir::new().unwrap();
        check_apply_then_read(RocksBackend::open(dir.path()).unwrap());
    }

    #[test]
    fn test_rocks_backend_scan_prefix() {
        let dir = tempfile::TempDir::new().unwrap();
        check_scan_prefix(RocksBackend::open(dir.path()).unwrap());
    }
}
