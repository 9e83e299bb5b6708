//! Hashing and key-id derivation.
//!
//! A key id is the first 20 bytes of the SHA-256 hash of the public key
//! bytes. It is the canonical address of an account and the primary key
//! under which account records are stored. Transaction hashes use the same
//! digest over the encoded transaction.

use sha2::{Digest, Sha256};

use super::keys::PublicKey;
use crate::types::KeyId;

/// SHA-256 digest of `data`.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Derive the key id of a validated public key.
pub fn derive_key_id(public_key: &PublicKey) -> KeyId {
    key_id_from_bytes(public_key.as_bytes())
}

/// Derive a key id from raw public key bytes.
///
/// No well-formedness check is made; callers that need one validate the
/// key first.
pub fn key_id_from_bytes(bytes: &[u8]) -> KeyId {
    let hash = sha256(bytes);
    let mut key_id = [0u8; 20];
    key_id.copy_from_slice(&hash[..20]);
    key_id
}
