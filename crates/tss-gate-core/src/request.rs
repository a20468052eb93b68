//! Ceremony request model
//!
//! A request names a ceremony kind and carries two opaque JSON documents:
//! `request_detail` (protocol parameters) and `extra_info` (business context).
//! The documents are kept as strings here and decoded per kind by the dispatcher.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::error::{GateError, Result};

/// Rendering used when `request_type` is absent or null
pub const MISSING_KIND: &str = "<missing>";

/// Ceremony kinds the cluster may ask about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestKind {
    Ping,
    KeyGen,
    KeySign,
    KeyReshare,
}

impl RequestKind {
    pub const ALL: [RequestKind; 4] = [
        RequestKind::Ping,
        RequestKind::KeyGen,
        RequestKind::KeySign,
        RequestKind::KeyReshare,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Ping => "PING",
            RequestKind::KeyGen => "KEYGEN",
            RequestKind::KeySign => "KEYSIGN",
            RequestKind::KeyReshare => "KEYRESHARE",
        }
    }

    /// Legacy integer code
    pub fn code(&self) -> i64 {
        match self {
            RequestKind::Ping => 0,
            RequestKind::KeyGen => 1,
            RequestKind::KeySign => 2,
            RequestKind::KeyReshare => 3,
        }
    }

    /// Human-readable ceremony name used in rejection reasons
    pub fn ceremony_name(&self) -> &'static str {
        match self {
            RequestKind::Ping => "ping",
            RequestKind::KeyGen => "key gen",
            RequestKind::KeySign => "key sign",
            RequestKind::KeyReshare => "key reshare",
        }
    }

    /// Accepts the wire name or the legacy integer code
    pub fn from_wire(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Self::ALL.into_iter().find(|k| k.as_str() == name.trim()),
            Value::Number(n) => n
                .as_i64()
                .and_then(|code| Self::ALL.into_iter().find(|k| k.code() == code)),
            _ => None,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RequestKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Top-level request as it appears on the wire
#[derive(Debug, Deserialize)]
struct WireRequest {
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    request_type: Option<Value>,
    #[serde(default)]
    request_detail: Option<Value>,
    #[serde(default)]
    extra_info: Option<Value>,
}

/// A parsed ceremony request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CeremonyRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_id: String,
    #[serde(rename = "request_type")]
    pub kind: RequestKind,
    #[serde(rename = "request_detail", skip_serializing_if = "String::is_empty")]
    pub detail: String,
    #[serde(rename = "extra_info", skip_serializing_if = "String::is_empty")]
    pub extra: String,
}

impl CeremonyRequest {
    pub fn new(request_id: impl Into<String>, kind: RequestKind) -> Self {
        Self {
            request_id: request_id.into(),
            kind,
            detail: String::new(),
            extra: String::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }

    /// Request id, or `None` when the caller sent none
    pub fn id(&self) -> Option<&str> {
        Some(self.request_id.as_str()).filter(|id| !id.is_empty())
    }

    /// Parse a request; a JSON `null` payload yields `Ok(None)`
    ///
    /// # Errors
    /// * `UnknownRequestKind` - if `request_type` is absent or not a known kind
    /// * `RequestMalformed` - if the payload is not a request object
    pub fn decode_optional(raw: &str) -> Result<Option<Self>> {
        let wire: Option<WireRequest> = serde_json::from_str(raw)?;
        let Some(wire) = wire else {
            return Ok(None);
        };

        let request_id = wire.request_id.unwrap_or_default();
        let kind = wire
            .request_type
            .as_ref()
            .and_then(RequestKind::from_wire)
            .ok_or_else(|| GateError::UnknownRequestKind {
                kind: describe_kind(wire.request_type.as_ref()),
                request_id: Some(request_id.clone()).filter(|id| !id.is_empty()),
            })?;

        Ok(Some(Self {
            request_id,
            kind,
            detail: sub_document("request_detail", wire.request_detail)?,
            extra: sub_document("extra_info", wire.extra_info)?,
        }))
    }

    /// Parse a request that must be present
    pub fn decode(raw: &str) -> Result<Self> {
        Self::decode_optional(raw)?
            .ok_or_else(|| GateError::RequestMalformed("request is null".into()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(GateError::from)
    }
}

fn describe_kind(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_KIND.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Sub-documents normally arrive as JSON strings; embedded objects are re-serialized
fn sub_document(field: &str, value: Option<Value>) -> Result<String> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(doc @ (Value::Object(_) | Value::Array(_))) => Ok(doc.to_string()),
        Some(other) => Err(GateError::RequestMalformed(format!(
            "{} must be a JSON string, got {}",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ping() {
        let request = CeremonyRequest::decode(r#"{"request_id":"r1","request_type":"PING"}"#).unwrap();
        assert_eq!(request.kind, RequestKind::Ping);
        assert_eq!(request.id(), Some("r1"));
        assert!(request.detail.is_empty());
        assert!(request.extra.is_empty());
    }

    #[test]
    fn test_decode_legacy_numeric_kind() {
        let request = CeremonyRequest::decode(
            r#"{"request_id":"r2","request_type":2,"request_detail":"{\"group_id\":\"g\"}","extra_info":"{}"}"#,
        )
        .unwrap();
        assert_eq!(request.kind, RequestKind::KeySign);
        assert_eq!(request.detail, r#"{"group_id":"g"}"#);
        assert_eq!(request.extra, "{}");
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let request =
            CeremonyRequest::decode(r#"{"request_type":"KEYGEN","trace":"x","version":3}"#).unwrap();
        assert_eq!(request.kind, RequestKind::KeyGen);
        assert_eq!(request.id(), None);
    }

    #[test]
    fn test_decode_embedded_object_detail() {
        let request = CeremonyRequest::decode(
            r#"{"request_type":"KEYGEN","request_detail":{"threshold":2},"extra_info":null}"#,
        )
        .unwrap();
        assert_eq!(request.detail, r#"{"threshold":2}"#);
        assert!(request.extra.is_empty());
    }

    #[test]
    fn test_unknown_kind_keeps_value_and_request_id() {
        let err = CeremonyRequest::decode(r#"{"request_id":"r9","request_type":"KEYBURN"}"#).unwrap_err();
        assert_eq!(
            err,
            GateError::UnknownRequestKind {
                kind: "KEYBURN".into(),
                request_id: Some("r9".into()),
            }
        );

        let err = CeremonyRequest::decode(r#"{"request_type":7}"#).unwrap_err();
        assert!(err.to_string().ends_with("request type 7"));
    }

    #[test]
    fn test_missing_kind_is_not_ping() {
        let err = CeremonyRequest::decode(r#"{"request_id":"r1"}"#).unwrap_err();
        assert!(matches!(err, GateError::UnknownRequestKind { ref kind, .. } if kind == MISSING_KIND));
    }

    #[test]
    fn test_null_request() {
        assert_eq!(CeremonyRequest::decode_optional("null").unwrap(), None);
        assert!(matches!(
            CeremonyRequest::decode("null"),
            Err(GateError::RequestMalformed(_))
        ));
    }

    #[test]
    fn test_malformed_request() {
        assert!(matches!(
            CeremonyRequest::decode("[1,2]"),
            Err(GateError::RequestMalformed(_))
        ));
        assert!(matches!(
            CeremonyRequest::decode(r#"{"request_type":"PING","request_detail":5}"#),
            Err(GateError::RequestMalformed(_))
        ));
    }

    #[test]
    fn test_to_json_roundtrip_shape() {
        let json = CeremonyRequest::new("r1", RequestKind::KeyGen)
            .with_detail("{}")
            .to_json()
            .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["request_type"], "KEYGEN");
        assert_eq!(value["request_detail"], "{}");
        assert!(value.get("extra_info").is_none());
    }
}
