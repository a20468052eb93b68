//! Decision returned to the cluster

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{GateError, Result};

/// Reason used when a rejection arrives without one
const UNSPECIFIED_REJECTION: &str = "request rejected";

/// Protocol status of a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Ok,
    InvalidRequest,
    InvalidToken,
    InternalError,
}

impl Status {
    pub fn code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::InvalidRequest => 10,
            Status::InvalidToken => 20,
            Status::InternalError => 30,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Status::Ok),
            10 => Some(Status::InvalidRequest),
            20 => Some(Status::InvalidToken),
            30 => Some(Status::InternalError),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Ok => "OK",
            Status::InvalidRequest => "INVALID_REQUEST",
            Status::InvalidToken => "INVALID_TOKEN",
            Status::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}({})", name, self.code())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = i32::deserialize(deserializer)?;
        Status::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown decision status {}", code)))
    }
}

/// Verdict on the ceremony
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Approve,
    Reject,
}

/// Signed answer to a ceremony request
///
/// `status == Ok` implies `action == Some(Approve)` and no error; any other
/// status carries a non-empty error. `action` is `Reject` only when the request
/// parsed and was then declined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Absent on the wire means OK
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Decision {
    pub fn approve(request_id: Option<String>) -> Self {
        Self {
            status: Status::Ok,
            request_id: non_empty(request_id),
            action: Some(Action::Approve),
            error: None,
        }
    }

    /// Parsed request declined by the dispatcher
    pub fn reject(request_id: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            status: Status::InvalidRequest,
            request_id: non_empty(request_id),
            action: Some(Action::Reject),
            error: Some(error_text(reason.into())),
        }
    }

    /// Missing or empty input at the outer boundary
    pub fn invalid_request(error: impl Into<String>) -> Self {
        Self {
            status: Status::InvalidRequest,
            request_id: None,
            action: None,
            error: Some(error_text(error.into())),
        }
    }

    pub fn invalid_token(error: impl Into<String>) -> Self {
        Self {
            status: Status::InvalidToken,
            request_id: None,
            action: None,
            error: Some(error_text(error.into())),
        }
    }

    pub fn internal_error(request_id: Option<String>, error: impl Into<String>) -> Self {
        Self {
            status: Status::InternalError,
            request_id: non_empty(request_id),
            action: None,
            error: Some(error_text(error.into())),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == Status::Ok && self.action == Some(Action::Approve)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| GateError::DecisionEncoding(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(GateError::from)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn error_text(error: String) -> String {
    if error.is_empty() {
        UNSPECIFIED_REJECTION.to_string()
    } else {
        error
    }
}
