//! Liveness probe from the cluster

use async_trait::async_trait;
use tracing::debug;
use tss_gate_core::{CeremonyRequest, RequestKind};

use crate::dispatcher::RequestHandler;
use crate::error::Verdict;

/// Approves PING requests without looking at their documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PingHandler;

#[async_trait]
impl RequestHandler for PingHandler {
    fn request_kind(&self) -> RequestKind {
        RequestKind::Ping
    }

    fn description(&self) -> &str {
        "ping handler"
    }

    async fn handle(&self, request: &CeremonyRequest) -> Verdict {
        debug!(request_id = %request.request_id, "Got ping request");
        Ok(())
    }
}
