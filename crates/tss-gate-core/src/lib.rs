//! # TSS Gate Core
//!
//! Envelope and request primitives for a policy gateway that sits in front of
//! a threshold-signature node cluster.
//!
//! ## Key Concepts
//!
//! - **Envelope**: an expiring RS256 token carrying a base64 JSON payload
//! - **Ceremony request**: a key generation, signing or resharing proposal
//! - **Detail / Extra**: the request's protocol parameters and business context
//! - **Decision**: the signed APPROVE/REJECT answer returned to the cluster
//!
//! ## Key Roles
//!
//! Outbound envelopes are signed with the gateway's own private key. Inbound
//! envelopes are verified with the cluster's public key. The two directions
//! never share a key.

pub mod decision;
pub mod detail;
pub mod envelope;
pub mod error;
pub mod extra;
pub mod keys;
mod lenient;
pub mod request;

pub use decision::{Action, Decision, Status};
pub use detail::{CurveType, KeyGenDetail, KeyReshareDetail, KeySignDetail, SignatureType, TssProtocol};
pub use envelope::{Envelope, EnvelopeCodec, EnvelopeConfig};
pub use error::{GateError, Result};
pub use extra::{KeyGenExtra, KeyReshareExtra, KeyShareSignExtra, KeySignExtra};
pub use keys::{CounterpartyKey, KeyPair, ServiceKey};
pub use request::{CeremonyRequest, RequestKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
