//! Rejection reasons produced by the verification dispatcher

use thiserror::Error;
use tss_gate_core::RequestKind;

/// Outcome of dispatching one request: approve, or reject with a reason
pub type Verdict = std::result::Result<(), Rejection>;

/// Why a ceremony request was not approved
///
/// The `Display` text is what the cluster sees in the decision's `error` field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No request reached the dispatcher
    #[error("request is nil")]
    NilRequest,

    /// No handler is registered for the request kind
    #[error("not support to process request type {0}")]
    UnsupportedKind(String),

    /// A ceremony request arrived without detail or extra info
    #[error("request detail or extra info is empty")]
    EmptySubDocument,

    /// Detail or extra info could not be decoded for the ceremony
    #[error("failed to handle {ceremony}: {cause}")]
    DecodeFailed {
        ceremony: &'static str,
        cause: String,
    },

    /// A business rule declined the ceremony
    #[error("{0}")]
    Declined(String),
}

impl Rejection {
    pub fn decode_failed(kind: RequestKind, document: &str, err: impl std::fmt::Display) -> Self {
        Rejection::DecodeFailed {
            ceremony: kind.ceremony_name(),
            cause: format!("invalid {}: {}", document, err),
        }
    }

    pub fn declined(reason: impl Into<String>) -> Self {
        Rejection::Declined(reason.into())
    }
}
