//! Registration ids.
//!
//! A registration id names the ledger position at which an account's
//! registration was included: the block height and the transaction's index
//! within that block. Two registrations can never share a position, so the
//! id is unique for the lifetime of the ledger.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Length of the fixed binary encoding of a [`RegId`].
pub const REG_ID_BYTES: usize = 6;

/// Registration id: `(height, index)` of the including transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegId {
    /// Block height at which the registration was included.
    pub height: u32,
    /// Position of the registration transaction within the block.
    pub index: u16,
}

impl RegId {
    /// Mint a registration id for the given inclusion position.
    pub fn new(height: u32, index: u16) -> Self {
        Self { height, index }
    }

    /// Fixed-width big-endian encoding.
    ///
    /// Big-endian keeps byte order equal to `(height, index)` order, so
    /// storage keys built from it sort by inclusion position.
    pub fn to_bytes(&self) -> [u8; REG_ID_BYTES] {
        let mut out = [0u8; REG_ID_BYTES];
        out[..4].copy_from_slice(&self.height.to_be_bytes());
        out[4..].copy_from_slice(&self.index.to_be_bytes());
        out
    }
}

impl fmt::Display for RegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.height, self.index)
    }
}

/// Error parsing a `height-index` string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseRegIdError(String);

impl fmt::Display for ParseRegIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid regid '{}', expected <height>-<index>", self.0)
    }
}

impl std::error::Error for ParseRegIdError {}

impl FromStr for RegId {
    type Err = ParseRegIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRegIdError(s.to_string());
        let (height, index) = s.split_once('-').ok_or_else(err)?;
        Ok(RegId {
            height: height.parse().map_err(|_| err())?,
            index: index.parse().map_err(|_| err())?,
        })
    }
}
