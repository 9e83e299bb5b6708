//! Balance receipts.
//!
//! Every balance change made while executing a transaction is recorded as a
//! receipt. Receipts are append-only and stored as one list per transaction
//! hash.

use serde::{Deserialize, Serialize};

use super::{KeyId, TokenSymbol};

/// Kind of balance-affecting event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptCode {
    /// Transaction fee paid into the block reward pool.
    FeeToBlockRewardPool,
}

impl ReceiptCode {
    /// Stable numeric code used when exporting receipts.
    pub fn code(&self) -> u16 {
        match self {
            ReceiptCode::FeeToBlockRewardPool => 1,
        }
    }
}

/// A single balance-affecting event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Event kind.
    pub code: ReceiptCode,
    /// Account whose balance was debited.
    pub from: KeyId,
    /// Account credited, if the funds went to an account.
    pub to: Option<KeyId>,
    /// Token moved.
    pub symbol: TokenSymbol,
    /// Amount moved, in the token's smallest unit.
    pub amount: u64,
}

impl Receipt {
    /// Receipt for a fee paid by `from` into the block reward pool.
    pub fn fee(from: KeyId, symbol: TokenSymbol, amount: u64) -> Self {
        Self {
            code: ReceiptCode::FeeToBlockRewardPool,
            from,
            to: None,
            symbol,
            amount,
        }
    }
}
