//! Verification dispatcher - routes ceremony requests to per-kind handlers

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use tss_gate_core::{CeremonyRequest, RequestKind};

use crate::error::{Rejection, Verdict};
use crate::handlers::{CeremonyHandler, PingHandler};
use crate::rules::{ApproveAll, Ceremony, CeremonyRule, KeyGen, KeyReshare, KeySign};

/// Trait for request handlers
///
/// Each handler evaluates one request kind and never fails with anything
/// other than a rejection.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Get the kind of request this handler evaluates
    fn request_kind(&self) -> RequestKind;

    /// Approve with `Ok(())` or reject with a reason
    async fn handle(&self, request: &CeremonyRequest) -> Verdict;

    /// Get a description of this handler (for logging)
    fn description(&self) -> &str {
        "request handler"
    }
}

/// Verification dispatcher - routes requests to handlers
///
/// Holds one handler per request kind. The table is built at startup and only
/// read afterwards, so a shared dispatcher needs no locking.
pub struct Dispatcher {
    handlers: HashMap<RequestKind, Arc<dyn RequestHandler>>,
}

impl Dispatcher {
    /// Create a new empty dispatcher
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Dispatcher with PING plus every ceremony kind approving once decoded
    pub fn with_defaults() -> Self {
        DispatcherBuilder::new().with_defaults().build()
    }

    /// Register a request handler, replacing any handler for the same kind
    pub fn register_handler<H: RequestHandler + 'static>(&mut self, handler: H) {
        let request_kind = handler.request_kind();
        info!(
            request_kind = %request_kind,
            description = handler.description(),
            "Registered request handler"
        );
        self.handlers.insert(request_kind, Arc::new(handler));
    }

    /// Install a business rule for a ceremony kind
    pub fn register_rule<C: Ceremony, R: CeremonyRule<C> + 'static>(&mut self, rule: R) {
        self.register_handler(CeremonyHandler::<C>::new(rule));
    }

    /// Get a handler for a request kind
    pub fn get_handler(&self, request_kind: RequestKind) -> Option<Arc<dyn RequestHandler>> {
        self.handlers.get(&request_kind).cloned()
    }

    /// Check if a handler is registered for a request kind
    pub fn has_handler(&self, request_kind: RequestKind) -> bool {
        self.handlers.contains_key(&request_kind)
    }

    /// List all registered request kinds
    pub fn registered_kinds(&self) -> Vec<RequestKind> {
        let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Evaluate a request
    ///
    /// # Returns
    /// * `Ok(())` - approve
    /// * `Err(Rejection)` - reject; the display text is the reason sent back
    pub async fn dispatch(&self, request: Option<&CeremonyRequest>) -> Verdict {
        let Some(request) = request else {
            warn!("Dispatcher received no request");
            return Err(Rejection::NilRequest);
        };

        let handler = self.handlers.get(&request.kind).ok_or_else(|| {
            warn!(request_kind = %request.kind, "No handler for request kind");
            Rejection::UnsupportedKind(request.kind.to_string())
        })?;

        let verdict = handler.handle(request).await;

        match &verdict {
            Ok(()) => {
                info!(
                    request_id = %request.request_id,
                    request_kind = %request.kind,
                    "Request approved"
                );
            }
            Err(rejection) => {
                warn!(
                    request_id = %request.request_id,
                    request_kind = %request.kind,
                    reason = %rejection,
                    "Request rejected"
                );
            }
        }

        verdict
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating a Dispatcher with handlers
pub struct DispatcherBuilder {
    dispatcher: Dispatcher,
}

impl DispatcherBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            dispatcher: Dispatcher::new(),
        }
    }

    /// Register PING and the three ceremony kinds with the approve-on-decode rule
    pub fn with_defaults(self) -> Self {
        self.with_handler(PingHandler)
            .with_rule::<KeyGen, _>(ApproveAll)
            .with_rule::<KeySign, _>(ApproveAll)
            .with_rule::<KeyReshare, _>(ApproveAll)
    }

    /// Add a request handler
    pub fn with_handler<H: RequestHandler + 'static>(mut self, handler: H) -> Self {
        self.dispatcher.register_handler(handler);
        self
    }

    /// Replace the business rule of one ceremony kind
    pub fn with_rule<C: Ceremony, R: CeremonyRule<C> + 'static>(mut self, rule: R) -> Self {
        self.dispatcher.register_rule::<C, R>(rule);
        self
    }

    /// Build the dispatcher
    pub fn build(self) -> Dispatcher {
        self.dispatcher
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
