//! Participant identities.
//!
//! A transaction names its sender and its optional delegate through an
//! [`Identity`]. The set of identity kinds is closed; code that needs a
//! particular kind matches exhaustively.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{KeyId, RegId};
use crate::crypto::RawPublicKey;

/// The ways a ledger participant can be identified.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    /// No participant.
    Absent,
    /// A registered account, by its registration id.
    RegId(RegId),
    /// An account by its key id.
    KeyId(KeyId),
    /// A raw public key, possibly malformed.
    PublicKey(RawPublicKey),
}

/// Tag of an [`Identity`] without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentityKind {
    /// [`Identity::Absent`].
    Absent,
    /// [`Identity::RegId`].
    RegId,
    /// [`Identity::KeyId`].
    KeyId,
    /// [`Identity::PublicKey`].
    PublicKey,
}

impl Identity {
    /// The identity's kind.
    pub fn kind(&self) -> IdentityKind {
        match self {
            Identity::Absent => IdentityKind::Absent,
            Identity::RegId(_) => IdentityKind::RegId,
            Identity::KeyId(_) => IdentityKind::KeyId,
            Identity::PublicKey(_) => IdentityKind::PublicKey,
        }
    }

    /// The raw public key, if this identity is one.
    pub fn public_key(&self) -> Option<&RawPublicKey> {
        match self {
            Identity::PublicKey(key) => Some(key),
            Identity::Absent | Identity::RegId(_) | Identity::KeyId(_) => None,
        }
    }
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentityKind::Absent => "absent",
            IdentityKind::RegId => "regid",
            IdentityKind::KeyId => "keyid",
            IdentityKind::PublicKey => "pubkey",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Absent => f.write_str("absent"),
            Identity::RegId(id) => write!(f, "regid:{}", id),
            Identity::KeyId(key_id) => write!(f, "keyid:{}", hex::encode(key_id)),
            Identity::PublicKey(key) => write!(f, "pubkey:{}", key),
        }
    }
}

impl From<RegId> for Identity {
    fn from(id: RegId) -> Self {
        Identity::RegId(id)
    }
}

impl From<RawPublicKey> for Identity {
    fn from(key: RawPublicKey) -> Self {
        Identity::PublicKey(key)
    }
}
