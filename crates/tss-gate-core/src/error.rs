//! Error types for the TSS gateway core

use thiserror::Error;

/// Result type alias using GateError
pub type Result<T> = std::result::Result<T, GateError>;

/// Errors raised while loading keys, handling envelopes or decoding requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Key file path does not exist or cannot be read
    #[error("Key file not found: {0}")]
    KeyFileNotFound(String),

    /// PEM content is not a well-formed key of the expected type
    #[error("Invalid key format: {0}")]
    KeyFormatInvalid(String),

    /// Attempted to sign an empty payload
    #[error("payload is empty")]
    EmptyPayload,

    /// Attempted to verify an empty token
    #[error("token is empty")]
    EmptyToken,

    /// Token signature does not match the counterparty key
    #[error("token signature is invalid: {0}")]
    SignatureInvalid(String),

    /// Token expiry is at or before the current time
    #[error("token is expired")]
    TokenExpired,

    /// Token cannot be parsed as a signed envelope
    #[error("token is malformed: {0}")]
    TokenMalformed(String),

    /// Verified token carries no payload
    #[error("Token missing package_data claim")]
    MissingPayloadClaim,

    /// Token issuer is not the configured counterparty
    #[error("token issuer mismatch: expected '{expected}', got '{actual}'")]
    IssuerMismatch { expected: String, actual: String },

    /// Signing with the service key failed
    #[error("failed to sign token: {0}")]
    SigningFailed(String),

    /// Decision could not be serialized before signing
    #[error("failed to encode decision: {0}")]
    DecisionEncoding(String),

    /// Request kind is absent or not one this gateway knows
    #[error("not support to process request type {kind}")]
    UnknownRequestKind {
        kind: String,
        request_id: Option<String>,
    },

    /// Request JSON is not a well-formed request envelope
    #[error("failed to parse raw request: {0}")]
    RequestMalformed(String),
}

impl GateError {
    /// Whether this error belongs to the INVALID_TOKEN family
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            GateError::EmptyToken
                | GateError::SignatureInvalid(_)
                | GateError::TokenExpired
                | GateError::TokenMalformed(_)
                | GateError::MissingPayloadClaim
                | GateError::IssuerMismatch { .. }
        )
    }
}

impl From<jsonwebtoken::errors::Error> for GateError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => GateError::TokenExpired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                GateError::SignatureInvalid(err.to_string())
            }
            ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
                GateError::KeyFormatInvalid(err.to_string())
            }
            _ => GateError::TokenMalformed(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::RequestMalformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_error_family() {
        assert!(GateError::EmptyToken.is_token_error());
        assert!(GateError::TokenExpired.is_token_error());
        assert!(GateError::MissingPayloadClaim.is_token_error());
        assert!(!GateError::EmptyPayload.is_token_error());
        assert!(!GateError::RequestMalformed("x".into()).is_token_error());
        assert!(!GateError::SigningFailed("x".into()).is_token_error());
        assert!(!GateError::DecisionEncoding("x".into()).is_token_error());
    }

    #[test]
    fn test_decision_encoding_is_not_a_signing_failure() {
        let err = GateError::DecisionEncoding("key must be a string".into());
        assert_eq!(err.to_string(), "failed to encode decision: key must be a string");
        assert_ne!(err, GateError::SigningFailed("key must be a string".into()));
    }

    #[test]
    fn test_unknown_kind_message_carries_value() {
        let err = GateError::UnknownRequestKind {
            kind: "FOO".into(),
            request_id: Some("r1".into()),
        };
        assert_eq!(err.to_string(), "not support to process request type FOO");
    }
}
