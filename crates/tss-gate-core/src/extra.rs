//! Kind-specific projections of a request's `extra_info` document
//!
//! These mirror the WaaS business objects the cluster attaches to a ceremony.
//! Only the fields a policy is likely to inspect are typed; everything else
//! is ignored on read.

use serde::Deserialize;
use serde_json::Value;

use crate::lenient::{empty_as_none, null_as_default};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrgInfo {
    pub org_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MpcProject {
    pub project_id: Option<String>,
    pub org_id: Option<String>,
    pub name: Option<String>,
    pub participants: Option<i64>,
    pub threshold: Option<i64>,
    pub created_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MpcVault {
    pub vault_id: Option<String>,
    pub project_id: Option<String>,
    pub org_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub vault_type: Option<String>,
    pub created_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WalletInfo {
    pub wallet_id: Option<String>,
    pub wallet_type: Option<String>,
    pub wallet_subtype: Option<String>,
    pub name: Option<String>,
    pub org_id: Option<String>,
    pub project_id: Option<String>,
    pub vault_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyShareHolder {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub holder_type: Option<String>,
    pub tss_node_id: Option<String>,
    pub online: Option<bool>,
    pub signer: Option<bool>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyShareHolderGroup {
    pub key_share_holder_group_id: Option<String>,
    #[serde(rename = "type")]
    pub group_type: Option<String>,
    pub participants: Option<i64>,
    pub threshold: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub key_share_holders: Vec<KeyShareHolder>,
    pub status: Option<String>,
    pub created_timestamp: Option<i64>,
}

impl KeyShareHolderGroup {
    /// TSS node ids of every holder in the group
    pub fn node_ids(&self) -> Vec<&str> {
        self.key_share_holders
            .iter()
            .filter_map(|holder| holder.tss_node_id.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TssRequest {
    pub tss_request_id: Option<String>,
    pub source_key_share_holder_group: Option<Value>,
    pub target_key_share_holder_group_id: Option<String>,
    #[serde(rename = "type")]
    pub request_type: Option<String>,
    pub status: Option<String>,
    pub created_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AddressInfo {
    pub address: Option<String>,
    pub chain_id: Option<String>,
    pub memo: Option<String>,
    pub path: Option<String>,
    pub encoding: Option<String>,
    pub pubkey: Option<String>,
    pub x_only_pubkey: Option<String>,
    pub root_pubkey: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AccountOutput {
    pub address: Option<String>,
    pub memo: Option<String>,
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UtxoOutput {
    pub address: Option<String>,
    pub amount: Option<String>,
}

/// Where a transaction sends value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransactionDestination {
    pub destination_type: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub account_output: Option<AccountOutput>,
    #[serde(deserialize_with = "null_as_default")]
    pub utxo_outputs: Vec<UtxoOutput>,
    /// Contract call target
    pub address: Option<String>,
    pub calldata: Option<String>,
    pub value: Option<String>,
}

impl TransactionDestination {
    /// Every non-empty destination address, in wire order, duplicates kept
    pub fn addresses(&self) -> Vec<String> {
        let account = self.account_output.iter().filter_map(|o| o.address.clone());
        let utxo = self.utxo_outputs.iter().filter_map(|o| o.address.clone());
        account
            .chain(utxo)
            .chain(self.address.clone())
            .filter(|address| !address.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub transaction_id: Option<String>,
    pub cobo_id: Option<String>,
    pub request_id: Option<String>,
    pub wallet_id: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub status: Option<String>,
    pub chain_id: Option<String>,
    pub token_id: Option<String>,
    pub asset_id: Option<String>,
    pub source: Option<Value>,
    #[serde(deserialize_with = "empty_as_none")]
    pub destination: Option<TransactionDestination>,
    pub raw_tx_info: Option<Value>,
    pub fee: Option<Value>,
    pub initiator: Option<String>,
    pub created_timestamp: Option<i64>,
    pub updated_timestamp: Option<i64>,
}

impl Transaction {
    pub fn destination_addresses(&self) -> Vec<String> {
        self.destination
            .as_ref()
            .map(TransactionDestination::addresses)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyGenExtra {
    #[serde(deserialize_with = "empty_as_none")]
    pub org: Option<OrgInfo>,
    #[serde(deserialize_with = "empty_as_none")]
    pub project: Option<MpcProject>,
    #[serde(deserialize_with = "empty_as_none")]
    pub vault: Option<MpcVault>,
    #[serde(deserialize_with = "empty_as_none")]
    pub target_key_share_holder_group: Option<KeyShareHolderGroup>,
    #[serde(deserialize_with = "empty_as_none")]
    pub tss_request: Option<TssRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeySignExtra {
    #[serde(deserialize_with = "empty_as_none")]
    pub org: Option<OrgInfo>,
    #[serde(deserialize_with = "empty_as_none")]
    pub project: Option<MpcProject>,
    #[serde(deserialize_with = "empty_as_none")]
    pub vault: Option<MpcVault>,
    #[serde(deserialize_with = "empty_as_none")]
    pub wallet: Option<WalletInfo>,
    #[serde(deserialize_with = "empty_as_none")]
    pub signer_key_share_holder_group: Option<KeyShareHolderGroup>,
    #[serde(deserialize_with = "null_as_default")]
    pub source_addresses: Vec<AddressInfo>,
    #[serde(deserialize_with = "empty_as_none")]
    pub transaction: Option<Transaction>,
    /// Staking activity, kept opaque
    #[serde(deserialize_with = "empty_as_none")]
    pub staking_activity: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyReshareExtra {
    #[serde(deserialize_with = "empty_as_none")]
    pub org: Option<OrgInfo>,
    #[serde(deserialize_with = "empty_as_none")]
    pub project: Option<MpcProject>,
    #[serde(deserialize_with = "empty_as_none")]
    pub vault: Option<MpcVault>,
    #[serde(deserialize_with = "empty_as_none")]
    pub source_key_share_holder_group: Option<KeyShareHolderGroup>,
    #[serde(deserialize_with = "empty_as_none")]
    pub target_key_share_holder_group: Option<KeyShareHolderGroup>,
    #[serde(deserialize_with = "empty_as_none")]
    pub tss_request: Option<TssRequest>,
}

/// Extra info attached to key-share signing events
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyShareSignExtra {
    #[serde(deserialize_with = "empty_as_none")]
    pub org: Option<OrgInfo>,
    #[serde(deserialize_with = "empty_as_none")]
    pub project: Option<MpcProject>,
    #[serde(deserialize_with = "empty_as_none")]
    pub vault: Option<MpcVault>,
    #[serde(deserialize_with = "empty_as_none")]
    pub signer_key_share_holder_group: Option<KeyShareHolderGroup>,
    #[serde(deserialize_with = "empty_as_none")]
    pub tss_request: Option<TssRequest>,
}
