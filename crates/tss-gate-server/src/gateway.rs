//! Gateway context - decide-and-answer pipeline
//!
//! inbound token -> envelope verify -> request decode -> dispatch -> decision -> signed token
//!
//! The gateway owns its codec and dispatcher outright. Nothing is global, so
//! tests can run several gateways with different keys side by side.

use tracing::{debug, info, warn};
use tss_gate_core::{CeremonyRequest, Decision, EnvelopeCodec, GateError, KeyPair, Result};
use tss_gate_policy::{AddressWhitelist, Dispatcher, DispatcherBuilder, KeySign};

use crate::config::GatewayConfig;
use crate::event::{EventError, TssEvent};

/// Error text for a call that carried no token
pub const EMPTY_TOKEN_INPUT: &str = "request token is empty";

pub struct Gateway {
    codec: EnvelopeCodec,
    dispatcher: Dispatcher,
}

impl Gateway {
    pub fn new(codec: EnvelopeCodec, dispatcher: Dispatcher) -> Self {
        Self { codec, dispatcher }
    }

    /// Load keys and build the dispatcher described by `config`
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let server = &config.callback_server;
        let keys = KeyPair::load(&server.service_private_key_path, &server.client_public_key_path)?;
        info!(
            service_key_bits = keys.service().bits(),
            client_key_bits = keys.counterparty().bits(),
            "Loaded key material"
        );

        let mut builder = DispatcherBuilder::new().with_defaults();
        if !config.address_whitelist.is_empty() {
            info!(
                addresses = config.address_whitelist.len(),
                "Enabling destination address whitelist for key sign"
            );
            builder = builder.with_rule::<KeySign, _>(AddressWhitelist::new(
                config.address_whitelist.iter().cloned(),
            ));
        }

        Ok(Self::new(
            EnvelopeCodec::new(keys, config.envelope_config()),
            builder.build(),
        ))
    }

    pub fn codec(&self) -> &EnvelopeCodec {
        &self.codec
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Turn an inbound token into a decision; never fails
    pub async fn evaluate(&self, token: &str) -> Decision {
        if token.trim().is_empty() {
            warn!("Callback carried no token");
            return Decision::invalid_request(EMPTY_TOKEN_INPUT);
        }

        let payload = match self.codec.verify(token) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "Inbound token rejected");
                return Decision::invalid_token(err.to_string());
            }
        };
        debug!(payload = %payload, "Verified inbound request");

        let request = match CeremonyRequest::decode_optional(&payload) {
            Ok(request) => request,
            Err(err) => return Self::decode_failure(err),
        };

        let request_id = request.as_ref().and_then(|r| r.id()).map(str::to_owned);
        match self.dispatcher.dispatch(request.as_ref()).await {
            Ok(()) => Decision::approve(request_id),
            Err(rejection) => Decision::reject(request_id, rejection.to_string()),
        }
    }

    fn decode_failure(err: GateError) -> Decision {
        match &err {
            GateError::UnknownRequestKind { kind, request_id } => {
                warn!(request_kind = %kind, request_id = ?request_id, "Unknown request kind");
                Decision::reject(request_id.clone(), err.to_string())
            }
            _ => {
                warn!(error = %err, "Failed to decode request");
                Decision::internal_error(None, err.to_string())
            }
        }
    }

    /// Sign a decision for the cluster
    ///
    /// # Errors
    /// * `DecisionEncoding` - the decision could not be serialized
    /// * `SigningFailed` - the service key could not sign it
    ///
    /// These are the only ways a caller can end up without a token.
    pub fn seal(&self, decision: &Decision) -> Result<String> {
        let json = decision.to_json()?;
        self.codec.sign(&json)
    }

    /// Decide on a signed request and return the signed decision
    pub async fn decide(&self, token: &str) -> Result<String> {
        let decision = self.evaluate(token).await;
        self.seal(&decision)
    }

    /// Verify and decode a pushed event
    pub fn ingest_event(&self, token: &str) -> std::result::Result<TssEvent, EventError> {
        let payload = self.codec.verify(token)?;
        let event = TssEvent::decode(&payload)?;
        let extra = event.decode_extra()?;
        info!(
            event_type = ?event.event_type,
            event_kind = %event.kind(),
            "Received TSS event"
        );
        debug!(extra = ?extra, "Event extra info");
        Ok(event)
    }
}
