//! The account registration transaction.

use serde::{Deserialize, Serialize};

use crate::crypto::sha256;
use crate::serialization::serialize;
use crate::types::Identity;

/// 32-byte transaction content hash.
pub type TxHash = [u8; 32];

/// Current transaction format version.
pub const CURRENT_TX_VERSION: u32 = 1;

/// Transaction type tags, part of every transaction's hash preimage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TxType {
    /// Bind a public key (and optional miner key) to an account.
    AccountRegister = 2,
}

/// Register the sender's account.
///
/// Binds `tx_uid`'s public key as the owner key of the sender account and,
/// when `miner_uid` is a public key, binds it as the block-production key.
/// `fees` are paid in the ledger's base currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRegisterTx {
    /// Transaction format version.
    pub version: u32,
    /// Last height at which the transaction may be included.
    pub valid_height: u32,
    /// Sender; must be a public key.
    pub tx_uid: Identity,
    /// Delegate block-production key; a public key or absent.
    pub miner_uid: Identity,
    /// Fee in the smallest unit of the base currency.
    pub fees: u64,
}

impl AccountRegisterTx {
    /// Create a registration transaction at the current version.
    pub fn new(tx_uid: Identity, miner_uid: Identity, fees: u64, valid_height: u32) -> Self {
        Self {
            version: CURRENT_TX_VERSION,
            valid_height,
            tx_uid,
            miner_uid,
            fees,
        }
    }

    /// Transaction type tag.
    #[inline]
    pub fn tx_type(&self) -> TxType {
        TxType::AccountRegister
    }

    /// Content hash: SHA-256 of the serialized `(type, body)` pair.
    pub fn hash(&self) -> TxHash {
        let bytes = serialize(&(self.tx_type(), self))
            .expect("AccountRegisterTx serialization should not fail");
        sha256(&bytes)
    }
}
