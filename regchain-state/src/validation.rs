//! Rejection channel.
//!
//! [`ValidationState`] collects the outcome of validating one transaction.
//! Its fields (DoS score, reject class, reason code) are what peers compare
//! when they reject the same invalid transaction, so reason codes are fixed
//! strings and never derived from `Display` output.

use std::fmt;

/// Misbehavior score attached to every registration rejection.
pub const REJECT_DOS_SCORE: i32 = 100;

/// Reject class, carried on the wire as a one-byte code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectClass {
    /// The transaction itself is malformed or violates a rule.
    Invalid,
    /// Applying the transaction to an account failed.
    UpdateAccountFail,
}

impl RejectClass {
    /// Numeric reject code.
    pub fn code(&self) -> u8 {
        match self {
            RejectClass::Invalid => 0x10,
            RejectClass::UpdateAccountFail => 0x46,
        }
    }
}

impl fmt::Display for RejectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectClass::Invalid => write!(f, "invalid (0x{:02x})", self.code()),
            RejectClass::UpdateAccountFail => {
                write!(f, "update-account-fail (0x{:02x})", self.code())
            }
        }
    }
}

/// Validation outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Nothing rejected.
    #[default]
    Valid,
    /// Rejected.
    Invalid,
}

/// Rejection details for a single transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationState {
    mode: ValidationMode,
    dos_score: i32,
    reject_class: Option<RejectClass>,
    reject_reason: String,
    debug_message: String,
    corruption_possible: bool,
}

impl ValidationState {
    /// Create a state with nothing rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rejection.
    ///
    /// Scores accumulate across calls; class and reason are those of the
    /// latest rejection. Always returns `false` so callers can
    /// `return state.dos(...)`.
    pub fn dos(
        &mut self,
        level: i32,
        message: impl Into<String>,
        class: RejectClass,
        reason: &str,
    ) -> bool {
        self.mode = ValidationMode::Invalid;
        self.dos_score = self.dos_score.saturating_add(level);
        self.reject_class = Some(class);
        self.reject_reason = reason.to_string();
        self.debug_message = message.into();
        false
    }

    /// Flag the rejection as possibly caused by local storage corruption
    /// rather than by the sender.
    pub fn set_corruption_possible(&mut self) {
        self.corruption_possible = true;
    }

    /// Check if nothing was rejected.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.mode == ValidationMode::Valid
    }

    /// Check if a rejection was recorded.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.mode == ValidationMode::Invalid
    }

    /// Current mode.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Accumulated misbehavior score.
    pub fn dos_score(&self) -> i32 {
        self.dos_score
    }

    /// Score the driver should charge the sender.
    ///
    /// Zero when the rejection may stem from a local store fault.
    pub fn sender_penalty(&self) -> i32 {
        if self.corruption_possible {
            0
        } else {
            self.dos_score
        }
    }

    /// Reject class of the latest rejection.
    pub fn reject_class(&self) -> Option<RejectClass> {
        self.reject_class
    }

    /// Reason code of the latest rejection (empty when valid).
    pub fn reject_reason(&self) -> &str {
        &self.reject_reason
    }

    /// Diagnostic message of the latest rejection.
    pub fn debug_message(&self) -> &str {
        &self.debug_message
    }

    /// Check if the rejection may stem from local storage corruption.
    pub fn corruption_possible(&self) -> bool {
        self.corruption_possible
    }
}
