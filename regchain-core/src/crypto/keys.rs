//! Ed25519 key types.
//!
//! Two public key types exist. [`RawPublicKey`] is what arrives inside a
//! transaction: arbitrary bytes that claim to be a key. [`PublicKey`] is a
//! key that passed the well-formedness predicate and is the only form ever
//! bound to an account.

use std::fmt;

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::address::key_id_from_bytes;
use crate::error::CryptoError;
use crate::types::KeyId;

/// Length in bytes of an encoded Ed25519 public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Type alias for Ed25519 secret/signing key.
pub type SecretKey = SigningKey;

/// Public key bytes as carried by a transaction, not yet validated.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawPublicKey(Vec<u8>);

impl RawPublicKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        RawPublicKey(bytes.into())
    }

    /// Get the raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key id derived from the raw bytes.
    pub fn key_id(&self) -> KeyId {
        key_id_from_bytes(&self.0)
    }

    /// Validate the bytes and produce a [`PublicKey`].
    ///
    /// A key is well-formed when it is exactly 32 bytes, decompresses to a
    /// point on the curve, and that point is not of small order.
    pub fn to_public_key(&self) -> Result<PublicKey, CryptoError> {
        let bytes: &[u8; PUBLIC_KEY_LENGTH] = self
            .0
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength { len: self.0.len() })?;
        PublicKey::from_bytes(bytes)
    }
}

impl fmt::Debug for RawPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawPublicKey({})", hex::encode(&self.0))
    }
}

impl fmt::Display for RawPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl From<&PublicKey> for RawPublicKey {
    fn from(key: &PublicKey) -> Self {
        RawPublicKey(key.as_bytes().to_vec())
    }
}

impl From<PublicKey> for RawPublicKey {
    fn from(key: PublicKey) -> Self {
        RawPublicKey::from(&key)
    }
}

/// Validated Ed25519 public key with custom serialization.
///
/// The wrapper ensures deterministic binary serialization (raw bytes)
/// and that every deserialized key is well-formed.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Create a PublicKey from raw bytes, rejecting off-curve and
    /// small-order points.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> Result<Self, CryptoError> {
        let key = VerifyingKey::from_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        if key.is_weak() {
            return Err(CryptoError::WeakPublicKey);
        }
        Ok(PublicKey(key))
    }

    /// Get the raw bytes of the public key.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.0.as_bytes()
    }

    /// Get the inner VerifyingKey.
    #[inline]
    pub fn inner(&self) -> &VerifyingKey {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.as_bytes()))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_bytes())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PublicKeyVisitor;

        impl<'de> serde::de::Visitor<'de> for PublicKeyVisitor {
            type Value = PublicKey;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("32 bytes")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<PublicKey, E> {
                let bytes: [u8; PUBLIC_KEY_LENGTH] = v
                    .try_into()
                    .map_err(|_| E::invalid_length(v.len(), &self))?;
                PublicKey::from_bytes(&bytes).map_err(E::custom)
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<PublicKey, A::Error> {
                let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
                for (i, byte) in bytes.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
                }
                PublicKey::from_bytes(&bytes).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_bytes(PublicKeyVisitor)
    }
}

/// Ed25519 key pair.
///
/// The secret key should be kept secure and never transmitted.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random key pair using the OS random number generator.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        KeyPair { signing_key }
    }

    /// Create a key pair from a 32-byte secret seed.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        KeyPair {
            signing_key: SigningKey::from_bytes(bytes),
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key())
    }

    /// Get the public key as transaction-carried raw bytes.
    pub fn raw_public_key(&self) -> RawPublicKey {
        RawPublicKey::from(self.public_key())
    }

    /// Get the raw bytes of the secret key.
    ///
    /// Use with extreme caution - exposing these bytes compromises the account.
    pub fn secret_bytes(&self) -> &[u8; 32] {
        self.signing_key.as_bytes()
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        KeyPair::from_bytes(self.signing_key.as_bytes())
    }
}
