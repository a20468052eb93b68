//! Shared fixtures for the server tests
//!
//! Each party's RSA key is generated once per test binary.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;
use std::sync::{Arc, OnceLock};
use tower::ServiceExt;
use tss_gate_core::{Decision, EnvelopeCodec, EnvelopeConfig, KeyPair};
use tss_gate_policy::Dispatcher;
use tss_gate_server::{create_router, AppState, Gateway};

pub const GATEWAY_NAME: &str = "tss-gate";
pub const CLUSTER_NAME: &str = "cobo-tss-node";

pub struct Party {
    pub private: String,
    pub public: String,
}

fn generate_party() -> Party {
    let mut rng = rand::thread_rng();
    let key = RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate test key");
    Party {
        private: key.to_pkcs8_pem(LineEnding::LF).unwrap().to_string(),
        public: key.to_public_key().to_public_key_pem(LineEnding::LF).unwrap(),
    }
}

pub fn gateway_party() -> &'static Party {
    static PARTY: OnceLock<Party> = OnceLock::new();
    PARTY.get_or_init(generate_party)
}

pub fn cluster_party() -> &'static Party {
    static PARTY: OnceLock<Party> = OnceLock::new();
    PARTY.get_or_init(generate_party)
}

pub fn intruder_party() -> &'static Party {
    static PARTY: OnceLock<Party> = OnceLock::new();
    PARTY.get_or_init(generate_party)
}

/// Codec held by `own`, verifying tokens from `peer`
pub fn codec(own: &Party, peer: &Party, config: EnvelopeConfig) -> EnvelopeCodec {
    let keys = KeyPair::from_pem(&own.private, &peer.public).unwrap();
    EnvelopeCodec::new(keys, config)
}

/// The cluster's side of the wire
pub fn cluster() -> EnvelopeCodec {
    codec(cluster_party(), gateway_party(), EnvelopeConfig::new(CLUSTER_NAME, 2))
}

pub fn gateway_with(config: EnvelopeConfig, dispatcher: Dispatcher) -> Gateway {
    Gateway::new(codec(gateway_party(), cluster_party(), config), dispatcher)
}

pub fn gateway() -> Gateway {
    gateway_with(EnvelopeConfig::new(GATEWAY_NAME, 2), Dispatcher::with_defaults())
}

pub fn router(gateway: Gateway) -> Router {
    create_router(Arc::new(AppState {
        gateway,
        service_name: GATEWAY_NAME.into(),
    }))
}

/// POST a form body and return the status plus raw body
pub async fn post_form(app: Router, path: &str, body: String) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

/// POST a token in `TSS_JWT_MSG`
pub async fn post_token(app: Router, path: &str, token: &str) -> (StatusCode, Vec<u8>) {
    post_form(app, path, format!("TSS_JWT_MSG={}", token)).await
}

/// Read a signed decision body the way the cluster does
pub fn open_decision(body: &[u8]) -> Decision {
    let token: String = serde_json::from_slice(body).unwrap();
    Decision::from_json(&cluster().verify(&token).unwrap()).unwrap()
}
