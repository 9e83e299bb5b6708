//! # Regchain Storage
//!
//! Persistent account and receipt storage for the regchain ledger.
//!
//! This crate provides:
//! - Disk-backed storage via RocksDB, plus an in-memory backend for tests
//! - A prefixed key schema for accounts, the reg-id index, receipts and the
//!   ledger tip
//! - [`PersistentLedger`], which journals writes in memory and commits them
//!   as one atomic batch
//!
//! ## Architecture
//!
//! The ledger implements the `AccountStore` and `ReceiptStore` traits from
//! `regchain-state`, so it can replace the in-memory `LedgerState` under the
//! registration executor. [`PersistentLedger::apply_tx`] unwinds a rejected
//! transaction to its [`Savepoint`]; [`PersistentLedger::commit`] makes the
//! accepted ones durable together.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod kv;
pub mod ledger;

pub use error::StorageError;
pub use keys::{KeyPrefix, StateKey};
pub use kv::{KvBackend, MemoryBackend, RocksBackend};
pub use ledger::{PersistentLedger, Savepoint};
