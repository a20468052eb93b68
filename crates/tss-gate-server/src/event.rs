//! TSS event intake
//!
//! The cluster also pushes fire-and-forget events once a ceremony settles.
//! They use the same signed envelope as requests but expect no answer.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tss_gate_core::{GateError, KeyGenExtra, KeyReshareExtra, KeyShareSignExtra, KeySignExtra};

/// Errors that can occur while ingesting an event
#[derive(Error, Debug)]
pub enum EventError {
    /// Envelope failed verification
    #[error(transparent)]
    Token(#[from] GateError),

    /// Payload is not a TSS event
    #[error("Failed to decode event: {0}")]
    Malformed(String),

    /// Extra info did not match the event's data type
    #[error("Failed to decode {kind} extra info: {cause}")]
    ExtraInfo { kind: EventKind, cause: String },
}

impl EventError {
    pub fn is_token_error(&self) -> bool {
        matches!(self, EventError::Token(err) if err.is_token_error())
    }
}

/// What the event is about, taken from `data.data_type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    KeyGen,
    KeySign,
    KeyReshare,
    KeyShareSign,
    Other(String),
}

impl EventKind {
    fn from_data_type(data_type: &str) -> Self {
        let normalized: String = data_type
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "keygen" => EventKind::KeyGen,
            "keysign" => EventKind::KeySign,
            "keyreshare" => EventKind::KeyReshare,
            "keysharesign" => EventKind::KeyShareSign,
            _ => EventKind::Other(data_type.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::KeyGen => f.write_str("KeyGen"),
            EventKind::KeySign => f.write_str("KeySign"),
            EventKind::KeyReshare => f.write_str("KeyReshare"),
            EventKind::KeyShareSign => f.write_str("KeyShareSign"),
            EventKind::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Event payload data; only the routing fields are typed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TssEventData {
    pub data_type: Option<String>,
    pub extra_info: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A TSS event pushed by the cluster
#[derive(Debug, Clone, Deserialize)]
pub struct TssEvent {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    pub data: TssEventData,
}

/// Extra info decoded for the event's data type
#[derive(Debug, Clone, PartialEq)]
pub enum EventExtra {
    KeyGen(KeyGenExtra),
    KeySign(KeySignExtra),
    KeyReshare(KeyReshareExtra),
    KeyShareSign(KeyShareSignExtra),
    /// No extra info, or a data type this gateway does not know
    None,
}

impl TssEvent {
    pub fn decode(raw: &str) -> Result<Self, EventError> {
        serde_json::from_str(raw).map_err(|e| EventError::Malformed(e.to_string()))
    }

    pub fn kind(&self) -> EventKind {
        self.data
            .data_type
            .as_deref()
            .map(EventKind::from_data_type)
            .unwrap_or_else(|| EventKind::Other(String::new()))
    }

    /// Decode `data.extra_info` with the type matching `data.data_type`
    pub fn decode_extra(&self) -> Result<EventExtra, EventError> {
        let Some(raw) = self.data.extra_info.as_deref().filter(|raw| !raw.is_empty()) else {
            return Ok(EventExtra::None);
        };

        let kind = self.kind();
        let wrap = {
            let kind = kind.clone();
            move |e: serde_json::Error| EventError::ExtraInfo {
                kind: kind.clone(),
                cause: e.to_string(),
            }
        };

        Ok(match kind {
            EventKind::KeyGen => EventExtra::KeyGen(serde_json::from_str(raw).map_err(wrap)?),
            EventKind::KeySign => EventExtra::KeySign(serde_json::from_str(raw).map_err(wrap)?),
            EventKind::KeyReshare => EventExtra::KeyReshare(serde_json::from_str(raw).map_err(wrap)?),
            EventKind::KeyShareSign => {
                EventExtra::KeyShareSign(serde_json::from_str(raw).map_err(wrap)?)
            }
            EventKind::Other(_) => EventExtra::None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_key_sign_event() {
        let event = TssEvent::decode(
            r#"{
                "type": "TSSKeySignCompleted",
                "data": {
                    "data_type": "KeySign",
                    "tss_request_id": "req-1",
                    "extra_info": "{\"org\":{\"org_id\":\"o1\"},\"transaction\":{\"token_id\":\"ETH\"}}"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(event.event_type.as_deref(), Some("TSSKeySignCompleted"));
        assert_eq!(event.kind(), EventKind::KeySign);
        assert_eq!(event.data.fields["tss_request_id"], "req-1");
        match event.decode_extra().unwrap() {
            EventExtra::KeySign(extra) => {
                assert_eq!(extra.org.unwrap().org_id.as_deref(), Some("o1"));
                assert_eq!(extra.transaction.unwrap().token_id.as_deref(), Some("ETH"));
            }
            other => panic!("unexpected extra {:?}", other),
        }
    }

    #[test]
    fn test_data_type_spellings() {
        assert_eq!(EventKind::from_data_type("KEY_SHARE_SIGN"), EventKind::KeyShareSign);
        assert_eq!(EventKind::from_data_type("keygen"), EventKind::KeyGen);
        assert_eq!(EventKind::from_data_type("Sweep"), EventKind::Other("Sweep".into()));
    }

    #[test]
    fn test_missing_extra_info() {
        let event = TssEvent::decode(r#"{"type":"x","data":{"data_type":"KeyGen","extra_info":""}}"#).unwrap();
        assert_eq!(event.decode_extra().unwrap(), EventExtra::None);
    }

    #[test]
    fn test_bad_extra_info() {
        let event =
            TssEvent::decode(r#"{"type":"x","data":{"data_type":"KeyReshare","extra_info":"{oops"}}"#).unwrap();
        let err = event.decode_extra().unwrap_err();
        assert!(err.to_string().starts_with("Failed to decode KeyReshare extra info"));
    }

    #[test]
    fn test_event_without_data_is_malformed() {
        assert!(matches!(TssEvent::decode(r#"{"type":"x"}"#), Err(EventError::Malformed(_))));
        assert!(matches!(TssEvent::decode("not json"), Err(EventError::Malformed(_))));
    }
}
