//! # Regchain Core
//!
//! Core types, cryptography, and serialization for the regchain account ledger.
//!
//! This crate provides the foundation for the other regchain crates:
//! - Cryptographic primitives (Ed25519 keys, SHA-256 hashing, key-id derivation)
//! - Ledger data types (Identity, RegId, Account, Receipt, token symbols)
//! - The account registration transaction
//! - Deterministic binary serialization

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crypto;
pub mod error;
pub mod serialization;
pub mod transaction;
pub mod types;

// Re-export commonly used types at crate root
pub use crypto::{derive_key_id, KeyPair, PublicKey, RawPublicKey, SecretKey};
pub use error::{AccountError, CoreError, CryptoError, SerializationError, SymbolError};
pub use transaction::{AccountRegisterTx, TxHash, TxType};
pub use types::{
    Account, AccountToken, BalanceOp, Identity, IdentityKind, KeyId, Receipt, ReceiptCode,
    RegId, Registration, TokenSymbol,
};
pub use types::{symbol_from_str, symbol_to_string, NATIVE_SYMBOL};
