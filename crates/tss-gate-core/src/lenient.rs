//! Permissive decoding helpers for caller-supplied sub-documents
//!
//! Detail and extra documents may come from a newer cluster release, so
//! decoding tolerates nulls, empty strings and enum values we do not know.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Optional object field where `null` and `""` both mean absent
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        other => T::deserialize(other).map(Some).map_err(de::Error::custom),
    }
}

/// Field where `null` decodes to the type's default
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Declare a wire enum that accepts either its integer code or its name
///
/// Unknown codes and names decode to `Unrecognized` carrying the raw value;
/// `null` decodes to the declared default.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = ($code:literal, $label:literal), )+
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
        #[serde(from = "serde_json::Value")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Value not known to this gateway, kept verbatim
            Unrecognized(String),
        }

        impl $name {
            /// Integer wire code, if recognized
            pub fn code(&self) -> Option<i64> {
                match self {
                    $( Self::$variant => Some($code), )+
                    Self::Unrecognized(_) => None,
                }
            }

            pub fn is_recognized(&self) -> bool {
                !matches!(self, Self::Unrecognized(_))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $( Self::$variant => f.write_str($label), )+
                    Self::Unrecognized(raw) => write!(f, "UNRECOGNIZED({})", raw),
                }
            }
        }

        impl From<serde_json::Value> for $name {
            fn from(value: serde_json::Value) -> Self {
                match value {
                    serde_json::Value::Null => Self::default(),
                    serde_json::Value::Number(n) => match n.as_i64() {
                        $( Some($code) => Self::$variant, )+
                        _ => Self::Unrecognized(n.to_string()),
                    },
                    serde_json::Value::String(s) => {
                        $(
                            if s.eq_ignore_ascii_case($label) {
                                return Self::$variant;
                            }
                        )+
                        Self::Unrecognized(s)
                    }
                    other => Self::Unrecognized(other.to_string()),
                }
            }
        }
    };
}

pub(crate) use wire_enum;

#[cfg(test)]
mod tests {
    use super::*;

    wire_enum! {
        pub enum Color {
            Red = (0, "RED"),
            Blue = (4, "BLUE"),
        }
        default = Red;
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Inner {
        name: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Outer {
        #[serde(deserialize_with = "empty_as_none")]
        inner: Option<Inner>,
        #[serde(deserialize_with = "null_as_default")]
        items: Vec<String>,
        color: Color,
    }

    #[test]
    fn test_wire_enum_codes_and_names() {
        assert_eq!(Color::from(serde_json::json!(4)), Color::Blue);
        assert_eq!(Color::from(serde_json::json!("blue")), Color::Blue);
        assert_eq!(Color::from(serde_json::json!(null)), Color::Red);
        assert_eq!(Color::from(serde_json::json!(9)), Color::Unrecognized("9".into()));
        assert_eq!(Color::from(serde_json::json!("GREEN")), Color::Unrecognized("GREEN".into()));
        assert_eq!(Color::Blue.code(), Some(4));
        assert!(!Color::Unrecognized("x".into()).is_recognized());
    }

    #[test]
    fn test_empty_string_object_is_absent() {
        let outer: Outer = serde_json::from_str(r#"{"inner": ""}"#).unwrap();
        assert!(outer.inner.is_none());

        let outer: Outer = serde_json::from_str(r#"{"inner": null}"#).unwrap();
        assert!(outer.inner.is_none());

        let outer: Outer = serde_json::from_str(r#"{"inner": {"name": "x", "extra": 1}}"#).unwrap();
        assert_eq!(outer.inner.unwrap().name.as_deref(), Some("x"));
    }

    #[test]
    fn test_null_list_is_empty() {
        let outer: Outer = serde_json::from_str(r#"{"items": null, "color": 17}"#).unwrap();
        assert!(outer.items.is_empty());
        assert_eq!(outer.color, Color::Unrecognized("17".into()));
    }

    #[test]
    fn test_wrong_object_type_still_fails() {
        let result: Result<Outer, _> = serde_json::from_str(r#"{"inner": 5}"#);
        assert!(result.is_err());
    }
}
