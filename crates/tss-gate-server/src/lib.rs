//! TSS Gate Server
//!
//! Policy gateway for a threshold-signature node cluster. Before the cluster
//! runs a key generation, signing or resharing ceremony it calls this server
//! with a signed request and proceeds only on a signed APPROVE.
//!
//! ## API Endpoints
//!
//! - `GET /ping` - Service name and server time
//! - `GET /health` - Liveness check
//! - `POST /v2/check` - Decide on a ceremony request (form field `TSS_JWT_MSG`)
//! - `POST /v2/event` - Accept a ceremony event; no decision is returned
//!
//! ## Trust Model
//!
//! Inbound tokens must verify against the cluster's public key. Decisions are
//! signed with the gateway's private key. Every request the gateway can read
//! gets a signed answer, including ones it refuses.

pub mod api;
pub mod config;
pub mod event;
pub mod gateway;

pub use api::create_router;
pub use api::handlers::{AppState, TOKEN_FIELD};
pub use config::{ConfigError, GatewayConfig};
pub use event::{EventError, EventExtra, EventKind, TssEvent};
pub use gateway::Gateway;
