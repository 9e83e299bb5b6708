//! In-memory key-value backend.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard};

use super::{KvBackend, KvEntries, WriteBatch};
use crate::error::StorageError;

type Entries = BTreeMap<Vec<u8>, Vec<u8>>;

/// Sorted in-memory backend.
///
/// A batch is applied under one write lock, so readers see all of it or
/// none of it.
#[derive(Default)]
pub struct MemoryBackend {
    data: RwLock<Entries>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.len())
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Entries>, StorageError> {
        self.data.read().map_err(|_| StorageError::LockPoisoned)
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.read()?.get(key).cloned())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<KvEntries, StorageError> {
        Ok(self
            .read()?
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn apply(&self, batch: WriteBatch) -> Result<(), StorageError> {
        let mut data = self.data.write().map_err(|_| StorageError::LockPoisoned)?;
        data.extend(batch.into_writes());
        Ok(())
    }
}
