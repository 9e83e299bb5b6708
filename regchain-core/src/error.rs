//! Error types for the regchain core crate.

use std::fmt;

/// Top-level error type for regchain-core operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Cryptographic operation failed.
    Crypto(CryptoError),
    /// Serialization or deserialization failed.
    Serialization(SerializationError),
    /// Invalid token symbol string.
    Symbol(SymbolError),
    /// Account state transition rejected.
    Account(AccountError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Crypto(e) => write!(f, "crypto error: {}", e),
            CoreError::Serialization(e) => write!(f, "serialization error: {}", e),
            CoreError::Symbol(e) => write!(f, "symbol error: {}", e),
            CoreError::Account(e) => write!(f, "account error: {}", e),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<CryptoError> for CoreError {
    fn from(e: CryptoError) -> Self {
        CoreError::Crypto(e)
    }
}

impl From<SerializationError> for CoreError {
    fn from(e: SerializationError) -> Self {
        CoreError::Serialization(e)
    }
}

impl From<SymbolError> for CoreError {
    fn from(e: SymbolError) -> Self {
        CoreError::Symbol(e)
    }
}

impl From<AccountError> for CoreError {
    fn from(e: AccountError) -> Self {
        CoreError::Account(e)
    }
}

/// Errors related to cryptographic operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CryptoError {
    /// The public key has the wrong length.
    InvalidKeyLength {
        /// Length of the rejected key.
        len: usize,
    },
    /// The public key bytes do not decode to a curve point.
    InvalidPublicKey,
    /// The public key is a small-order point.
    WeakPublicKey,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InvalidKeyLength { len } => {
                write!(f, "public key must be 32 bytes, got {}", len)
            }
            CryptoError::InvalidPublicKey => write!(f, "invalid public key format"),
            CryptoError::WeakPublicKey => write!(f, "public key is a small-order point"),
        }
    }
}

impl std::error::Error for CryptoError {}

/// Errors related to serialization and deserialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to encode data to bytes.
    EncodeFailed(String),
    /// Failed to decode data from bytes.
    DecodeFailed(String),
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationError::EncodeFailed(msg) => write!(f, "encode failed: {}", msg),
            SerializationError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

impl std::error::Error for SerializationError {}

/// Errors related to token symbol parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolError {
    /// Symbol string is empty.
    Empty,
    /// Symbol string exceeds 8 bytes.
    TooLong,
}

impl fmt::Display for SymbolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolError::Empty => write!(f, "symbol is empty"),
            SymbolError::TooLong => write!(f, "symbol exceeds 8 bytes"),
        }
    }
}

impl std::error::Error for SymbolError {}

/// Errors raised by account state transitions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountError {
    /// The account already has an owner key bound.
    AlreadyRegistered,
    /// Free balance is lower than the requested debit.
    InsufficientFunds {
        /// Free balance held by the account.
        available: u64,
        /// Amount the operation tried to debit.
        required: u64,
    },
    /// Credit would overflow the free balance.
    BalanceOverflow,
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountError::AlreadyRegistered => write!(f, "account already registered"),
            AccountError::InsufficientFunds { available, required } => {
                write!(
                    f,
                    "insufficient funds: available {}, required {}",
                    available, required
                )
            }
            AccountError::BalanceOverflow => write!(f, "balance overflow"),
        }
    }
}

impl std::error::Error for AccountError {}
