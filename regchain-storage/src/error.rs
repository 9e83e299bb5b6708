//! Storage error types.

use regchain_core::AccountError;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// RocksDB error.
    #[error("RocksDB error: {0}")]
    RocksDb(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored or staged value references data that does not exist.
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),

    /// In-memory backend lock was poisoned by a panicking writer.
    #[error("Backend lock poisoned")]
    LockPoisoned,

    /// Balance operation failed.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),
}

impl From<rocksdb::Error> for StorageError {
    fn from(e: rocksdb::Error) -> Self {
        StorageError::RocksDb(e.to_string())
    }
}

impl From<regchain_core::SerializationError> for StorageError {
    fn from(e: regchain_core::SerializationError) -> Self {
        StorageError::Serialization(e.to_string())
    }
}
