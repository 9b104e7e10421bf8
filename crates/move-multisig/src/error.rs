//! Error types for the multisig core.
//!
//! This module provides a unified error type [`MultisigError`] covering the
//! codec, payload decoding, chain-client and lifecycle-orchestration layers.

use thiserror::Error;

/// A specialized Result type for multisig core operations.
pub type MultisigResult<T> = Result<T, MultisigError>;

/// The main error type for the multisig core.
#[derive(Error, Debug)]
pub enum MultisigError {
    /// Error occurred during HTTP communication
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error occurred during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error occurred during URL parsing
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Error occurred during hex encoding/decoding
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Invalid account address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// An argument's bytes ran out (or had leftovers) relative to its type tag
    #[error("Malformed argument: {0}")]
    MalformedArgument(String),

    /// A boolean byte was neither 0x00 nor 0x01
    #[error("Invalid bool encoding: byte {0:#04x}")]
    InvalidBoolEncoding(u8),

    /// An option tag byte was neither 0 (absent) nor 1 (present)
    #[error("Invalid option tag: byte {0:#04x}")]
    InvalidOptionTag(u8),

    /// String bytes were not valid UTF-8
    #[error("Invalid string encoding: {0}")]
    InvalidStringEncoding(String),

    /// Encode-side shape mismatch between a value and its declared type tag
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The declared type tag
        expected: String,
        /// The shape of the value that was provided
        actual: String,
    },

    /// The ABI references a type outside the closed supported set
    #[error("Unsupported type tag: {0}")]
    UnsupportedTypeTag(String),

    /// The function's parameter types could not be resolved from the chain
    #[error("ABI resolution failed for {function_id}: {reason}")]
    AbiResolutionFailed {
        /// Full function id (`0xaddr::module::function`)
        function_id: String,
        /// Why resolution failed
        reason: String,
    },

    /// The requested action is not yet legal according to on-chain vote tallies
    #[error("Insufficient votes to {action} transaction {sequence_number}{hint}")]
    InsufficientVotes {
        /// The attempted action ("execute" or "reject")
        action: &'static str,
        /// The sequence number the action targeted
        sequence_number: u64,
        /// Extra guidance, e.g. pointing at the action that *is* available
        hint: String,
    },

    /// The user declined the interactive confirmation
    #[error("Cancelled {action} of transaction {sequence_number}")]
    UserCancelled {
        /// The action that was declined
        action: &'static str,
        /// The sequence number that was targeted
        sequence_number: u64,
    },

    /// Pre-submission simulation predicted failure
    #[error("Simulation failed: {0}")]
    SimulationFailed(String),

    /// Transaction submission failed
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// The committed transaction was not a user transaction
    #[error("Expected a user transaction, got: {0}")]
    NonUserTransaction(String),

    /// Transaction timed out waiting for finality
    #[error("Transaction {hash} timed out after {timeout_secs} seconds")]
    TransactionTimeout {
        /// The hash of the transaction that timed out
        hash: String,
        /// How long we waited before timing out
        timeout_secs: u64,
    },

    /// API returned an error response
    #[error("API error ({status_code}): {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
        /// Optional error code from the API
        error_code: Option<String>,
        /// Optional VM error code
        vm_error_code: Option<u64>,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal invariant violation (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Any other error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl MultisigError {
    /// Creates a malformed-argument error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedArgument(msg.into())
    }

    /// Creates an encode-side type-mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an ABI-resolution error.
    pub fn abi(function_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AbiResolutionFailed {
            function_id: function_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new API error from response details.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
            error_code: None,
            vm_error_code: None,
        }
    }

    /// Creates a new API error with additional details.
    pub fn api_with_details(
        status_code: u16,
        message: impl Into<String>,
        error_code: Option<String>,
        vm_error_code: Option<u64>,
    ) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
            error_code,
            vm_error_code,
        }
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Api {
                    status_code: 404,
                    ..
                }
        )
    }

    /// Returns true if this is a codec-level decoding error.
    ///
    /// The aggregator uses this to mark a single proposal as undecodable
    /// while continuing with its siblings.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedArgument(_)
                | Self::InvalidBoolEncoding(_)
                | Self::InvalidOptionTag(_)
                | Self::InvalidStringEncoding(_)
                | Self::UnsupportedTypeTag(_)
                | Self::AbiResolutionFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MultisigError::InvalidAddress("bad address".to_string());
        assert_eq!(err.to_string(), "Invalid address: bad address");
    }

    #[test]
    fn test_bool_encoding_display() {
        let err = MultisigError::InvalidBoolEncoding(0x02);
        assert!(err.to_string().contains("0x02"));
    }

    #[test]
    fn test_type_mismatch() {
        let err = MultisigError::type_mismatch("u64", "bool");
        assert!(err.to_string().contains("expected u64"));
        assert!(err.to_string().contains("got bool"));
    }

    #[test]
    fn test_insufficient_votes_includes_context() {
        let err = MultisigError::InsufficientVotes {
            action: "execute",
            sequence_number: 5,
            hint: String::new(),
        };
        let msg = err.to_string();
        assert!(msg.contains("execute"));
        assert!(msg.contains('5'));
    }

    #[test]
    fn test_insufficient_votes_hint() {
        let err = MultisigError::InsufficientVotes {
            action: "execute",
            sequence_number: 5,
            hint: " (it can be rejected instead)".to_string(),
        };
        assert!(err.to_string().contains("rejected instead"));
    }

    #[test]
    fn test_user_cancelled_includes_context() {
        let err = MultisigError::UserCancelled {
            action: "reject",
            sequence_number: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("reject"));
        assert!(msg.contains('9'));
    }

    #[test]
    fn test_is_not_found() {
        assert!(MultisigError::NotFound("test".to_string()).is_not_found());
        assert!(MultisigError::api(404, "not found").is_not_found());
        assert!(!MultisigError::api(500, "server error").is_not_found());
    }

    #[test]
    fn test_is_decode_error() {
        assert!(MultisigError::malformed("cursor underrun").is_decode_error());
        assert!(MultisigError::InvalidOptionTag(7).is_decode_error());
        assert!(MultisigError::abi("0x1::coin::transfer", "node error").is_decode_error());
        assert!(!MultisigError::SimulationFailed("aborted".to_string()).is_decode_error());
    }

    #[test]
    fn test_api_error_with_details() {
        let err = MultisigError::api_with_details(
            400,
            "invalid argument",
            Some("INVALID_ARGUMENT".to_string()),
            Some(42),
        );
        if let MultisigError::Api {
            status_code,
            message,
            error_code,
            vm_error_code,
        } = err
        {
            assert_eq!(status_code, 400);
            assert_eq!(message, "invalid argument");
            assert_eq!(error_code, Some("INVALID_ARGUMENT".to_string()));
            assert_eq!(vm_error_code, Some(42));
        } else {
            panic!("Expected Api error variant");
        }
    }
}
