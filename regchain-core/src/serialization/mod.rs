//! Deterministic binary serialization for the regchain ledger.
//!
//! Persisted records and transaction hash preimages are serialized using
//! bincode with a deterministic configuration, so every node derives the
//! same bytes (and therefore the same transaction hash) from the same value.

mod bincode_config;

pub use bincode_config::{deserialize, serialize, serialized_size};
