//! Cryptographic primitives for the regchain ledger.
//!
//! This module provides:
//! - Ed25519 key pair generation
//! - Raw (unchecked) and validated public key types
//! - SHA-256 hashing and key-id derivation (first 20 bytes of the digest)

mod address;
mod keys;

pub use address::{derive_key_id, key_id_from_bytes, sha256};
pub use keys::{KeyPair, PublicKey, RawPublicKey, SecretKey, PUBLIC_KEY_LENGTH};
