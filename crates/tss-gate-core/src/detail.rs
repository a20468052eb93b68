//! Kind-specific projections of a request's `request_detail` document

use serde::Deserialize;

use crate::lenient::{null_as_default, wire_enum};

wire_enum! {
    /// Elliptic curve used by the key being generated or reshared
    pub enum CurveType {
        Secp256k1 = (0, "SECP256K1"),
        Ed25519 = (2, "ED25519"),
    }
    default = Secp256k1;
}

wire_enum! {
    /// Signature scheme requested for a signing ceremony
    pub enum SignatureType {
        Unknown = (0, "UNKNOWN_TYPE"),
        Ecdsa = (1, "ECDSA"),
        Eddsa = (2, "EDDSA"),
        Schnorr = (3, "SCHNORR"),
    }
    default = Unknown;
}

wire_enum! {
    /// Threshold protocol executing the ceremony
    pub enum TssProtocol {
        Unknown = (0, "UNKNOWN_PROTOCOL"),
        Gg18 = (1, "GG18"),
        Lindell = (2, "LINDELL"),
        EddsaTss = (3, "EDDSA_TSS"),
    }
    default = Unknown;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyGenDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub threshold: i64,
    pub curve: CurveType,
    #[serde(deserialize_with = "null_as_default")]
    pub node_ids: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub task_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub biz_task_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeySignDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub root_pub_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub used_node_ids: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub bip32_path_list: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub msg_hash_list: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tweak_list: Vec<String>,
    pub signature_type: SignatureType,
    pub tss_protocol: TssProtocol,
    #[serde(deserialize_with = "null_as_default")]
    pub task_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub biz_task_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyReshareDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub old_group_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub root_pub_key: String,
    pub curve: CurveType,
    #[serde(deserialize_with = "null_as_default")]
    pub used_node_ids: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub old_threshold: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub new_threshold: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub new_node_ids: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub task_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub biz_task_id: String,
}
