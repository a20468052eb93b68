//! Decode-then-rule handler shared by every ceremony kind

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use tss_gate_core::{CeremonyRequest, RequestKind};

use crate::dispatcher::RequestHandler;
use crate::error::{Rejection, Verdict};
use crate::rules::{Ceremony, CeremonyRule};

/// Handler for one ceremony kind
///
/// Requires both documents, decodes them into the kind's detail and extra
/// views, then hands them to the configured rule. Decode failures come back
/// as rejections, never as faults.
pub struct CeremonyHandler<C: Ceremony> {
    rule: Arc<dyn CeremonyRule<C>>,
    description: String,
}

impl<C: Ceremony> CeremonyHandler<C> {
    pub fn new<R: CeremonyRule<C> + 'static>(rule: R) -> Self {
        let description = format!("{} handler ({})", C::KIND.ceremony_name(), rule.description());
        Self {
            rule: Arc::new(rule),
            description,
        }
    }
}

#[async_trait]
impl<C: Ceremony> RequestHandler for CeremonyHandler<C> {
    fn request_kind(&self) -> RequestKind {
        C::KIND
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn handle(&self, request: &CeremonyRequest) -> Verdict {
        if request.detail.is_empty() || request.extra.is_empty() {
            return Err(Rejection::EmptySubDocument);
        }

        let detail: C::Detail = serde_json::from_str(&request.detail)
            .map_err(|e| Rejection::decode_failed(C::KIND, "request detail", e))?;
        let extra: C::Extra = serde_json::from_str(&request.extra)
            .map_err(|e| Rejection::decode_failed(C::KIND, "extra info", e))?;

        debug!(
            request_id = %request.request_id,
            request_kind = %C::KIND,
            ?detail,
            ?extra,
            "Decoded ceremony request"
        );

        self.rule.evaluate(request, &detail, &extra).await
    }
}
