//! Error types for registration validation and execution.

use regchain_core::{CryptoError, IdentityKind, KeyId, RawPublicKey, RegId, TxHash};

use crate::validation::{RejectClass, ValidationState, REJECT_DOS_SCORE};

/// All validation and execution errors for account registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateError {
    // === Identity Errors ===
    /// Sender identity is not a public key.
    SenderNotPublicKey { kind: IdentityKind },
    /// Miner identity is neither a public key nor absent.
    MinerNotPublicKey { kind: IdentityKind },
    /// Sender public key fails the well-formedness predicate.
    BadSenderPublicKey { key_id: KeyId, reason: CryptoError },

    // === Registration Errors ===
    /// Account already has an owner key bound.
    DuplicateRegistration { key_id: KeyId },
    /// Free balance is lower than the fee.
    InsufficientFunds { key_id: KeyId, available: u64, required: u64 },
    /// Miner public key fails the well-formedness predicate.
    InvalidMinerPublicKey { miner_pubkey: RawPublicKey, reason: CryptoError },

    // === Store Errors ===
    /// Sender account could not be loaded.
    AccountReadFailed { key_id: KeyId, detail: String },
    /// Mutated account could not be persisted.
    AccountWriteFailed { reg_id: RegId, detail: String },
    /// Fee receipts could not be persisted.
    ReceiptSaveFailed { tx_hash: TxHash, detail: String },
    /// Registration id minted by the context already names another account.
    RegIdInUse { reg_id: RegId, holder: KeyId },
}

impl StateError {
    /// Machine-readable reason code.
    ///
    /// These strings are compared across nodes and must not change.
    pub fn reject_reason(&self) -> &'static str {
        match self {
            StateError::SenderNotPublicKey { .. } => "uid-type-error",
            StateError::MinerNotPublicKey { .. } => "minerUid-type-error",
            StateError::BadSenderPublicKey { .. } => "bad-tx-publickey",
            StateError::DuplicateRegistration { .. } => "duplicate-register-account",
            StateError::InsufficientFunds { .. } => "insufficent-funds",
            StateError::InvalidMinerPublicKey { .. } => "MinerPKey Is Invalid",
            StateError::AccountReadFailed { .. } => "bad-read-accountdb",
            StateError::AccountWriteFailed { .. } => "bad-read-accountdb",
            StateError::ReceiptSaveFailed { .. } => "bad-save-receipts",
            StateError::RegIdInUse { .. } => "duplicate-regid",
        }
    }

    /// Reject class reported with the reason code.
    pub fn reject_class(&self) -> RejectClass {
        match self {
            StateError::SenderNotPublicKey { .. }
            | StateError::MinerNotPublicKey { .. }
            | StateError::BadSenderPublicKey { .. } => RejectClass::Invalid,
            StateError::DuplicateRegistration { .. }
            | StateError::InsufficientFunds { .. }
            | StateError::InvalidMinerPublicKey { .. }
            | StateError::AccountReadFailed { .. }
            | StateError::AccountWriteFailed { .. }
            | StateError::ReceiptSaveFailed { .. }
            | StateError::RegIdInUse { .. } => RejectClass::UpdateAccountFail,
        }
    }

    /// Misbehavior score reported with the rejection.
    pub fn dos_score(&self) -> i32 {
        REJECT_DOS_SCORE
    }

    /// Check if the failure is a fault of this node's store rather than of
    /// the sender.
    pub fn is_local_fault(&self) -> bool {
        matches!(
            self,
            StateError::AccountReadFailed { .. }
                | StateError::AccountWriteFailed { .. }
                | StateError::ReceiptSaveFailed { .. }
                | StateError::RegIdInUse { .. }
        )
    }

    /// Report this error through the rejection channel.
    ///
    /// Returns `false`, the uniform "rejected" outcome.
    pub fn report(&self, state: &mut ValidationState) -> bool {
        let rejected = state.dos(
            self.dos_score(),
            self.to_string(),
            self.reject_class(),
            self.reject_reason(),
        );
        if self.is_local_fault() {
            state.set_corruption_possible();
        }
        rejected
    }
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Identity errors
            StateError::SenderNotPublicKey { kind } => {
                write!(f, "sender must be a public key, got {}", kind)
            }
            StateError::MinerNotPublicKey { kind } => {
                write!(f, "miner must be a public key or absent, got {}", kind)
            }
            StateError::BadSenderPublicKey { key_id, reason } => {
                write!(
                    f,
                    "sender public key of {} is invalid: {}",
                    hex::encode(key_id),
                    reason
                )
            }

            // Registration errors
            StateError::DuplicateRegistration { key_id } => {
                write!(f, "account {} is already registered", hex::encode(key_id))
            }
            StateError::InsufficientFunds {
                key_id,
                available,
                required,
            } => {
                write!(
                    f,
                    "insufficient funds in account {}: available {}, required {}",
                    hex::encode(key_id),
                    available,
                    required
                )
            }
            StateError::InvalidMinerPublicKey {
                miner_pubkey,
                reason,
            } => {
                write!(f, "miner public key {} is invalid: {}", miner_pubkey, reason)
            }

            // Store errors
            StateError::AccountReadFailed { key_id, detail } => {
                write!(
                    f,
                    "read account {} failed: {}",
                    hex::encode(key_id),
                    detail
                )
            }
            StateError::AccountWriteFailed { reg_id, detail } => {
                write!(f, "write account {} failed: {}", reg_id, detail)
            }
            StateError::ReceiptSaveFailed { tx_hash, detail } => {
                write!(
                    f,
                    "save receipts for tx {} failed: {}",
                    hex::encode(tx_hash),
                    detail
                )
            }
            StateError::RegIdInUse { reg_id, holder } => {
                write!(
                    f,
                    "reg id {} already belongs to account {}",
                    reg_id,
                    hex::encode(holder)
                )
            }
        }
    }
}

impl std::error::Error for StateError {}

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;
