//! Destination address whitelist for signing ceremonies

use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;
use tss_gate_core::{CeremonyRequest, KeySignDetail, KeySignExtra};

use crate::error::{Rejection, Verdict};
use crate::rules::{CeremonyRule, KeySign};

/// Rejects signing ceremonies that send to an address outside the whitelist
///
/// An empty whitelist approves everything.
#[derive(Debug, Clone, Default)]
pub struct AddressWhitelist {
    addresses: HashSet<String>,
}

impl AddressWhitelist {
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            addresses: addresses
                .into_iter()
                .map(Into::into)
                .filter(|address: &String| !address.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }
}

#[async_trait]
impl CeremonyRule<KeySign> for AddressWhitelist {
    async fn evaluate(&self, request: &CeremonyRequest, _detail: &KeySignDetail, extra: &KeySignExtra) -> Verdict {
        if self.addresses.is_empty() {
            return Ok(());
        }

        let transaction = extra
            .transaction
            .as_ref()
            .ok_or_else(|| Rejection::declined("verify sign error: transaction is nil"))?;

        let destinations = transaction.destination_addresses();
        debug!(
            request_id = %request.request_id,
            destinations = ?destinations,
            "Checking destination addresses against whitelist"
        );

        if destinations.iter().all(|address| self.contains(address)) {
            Ok(())
        } else {
            Err(Rejection::declined(format!(
                "verify sign error: destination addresses [{}] is not part of address whitelist",
                destinations.join(", ")
            )))
        }
    }

    fn description(&self) -> &str {
        "destination address whitelist"
    }
}
