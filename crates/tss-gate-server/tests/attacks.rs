//! Attack Scenario Tests
//!
//! Each test is a way someone other than the cluster might try to get a
//! ceremony approved. None of them may produce an APPROVE.

mod common;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use common::*;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use serde_json::json;
use tss_gate_core::{EnvelopeConfig, Status};
use tss_gate_policy::Dispatcher;

// =============================================================================
// Test Helpers
// =============================================================================

const PING: &str = r#"{"request_id":"r1","request_type":"PING"}"#;

fn claims(payload: &str) -> serde_json::Value {
    json!({
        "iss": CLUSTER_NAME,
        "exp": chrono::Utc::now().timestamp() + 120,
        "package_data": base64::engine::general_purpose::STANDARD.encode(payload),
    })
}

async fn assert_invalid_token(token: &str) {
    let decision = gateway().evaluate(token).await;
    assert_eq!(decision.status, Status::InvalidToken, "{:?}", decision);
    assert!(!decision.is_approved());
    assert!(decision.request_id.is_none());
}

// =============================================================================
// ATTACK: Forged Signer
// =============================================================================

/// A party holding its own RSA key signs a well-formed request.
#[tokio::test]
async fn attack_forged_signer_rejected() {
    let forger = codec(intruder_party(), gateway_party(), EnvelopeConfig::new(CLUSTER_NAME, 2));
    let token = forger.sign(PING).unwrap();
    assert_invalid_token(&token).await;
}

/// The gateway's own decision replayed as a request. Decisions are signed
/// with the gateway key, which never verifies inbound traffic.
#[tokio::test]
async fn attack_reflected_decision_rejected() {
    let decision = gateway().decide(&cluster().sign(PING).unwrap()).await.unwrap();
    assert_invalid_token(&decision).await;
}

// =============================================================================
// ATTACK: Stale Token
// =============================================================================

#[tokio::test]
async fn attack_expired_request_rejected() {
    let stale = codec(cluster_party(), gateway_party(), EnvelopeConfig::new(CLUSTER_NAME, -1));
    let token = stale.sign(PING).unwrap();

    let decision = gateway().evaluate(&token).await;
    assert_eq!(decision.status, Status::InvalidToken);
    assert_eq!(decision.error.as_deref(), Some("token is expired"));
}

// =============================================================================
// ATTACK: Tampering
// =============================================================================

/// Swap the claims of a genuine token for a different request.
#[tokio::test]
async fn attack_swapped_claims_rejected() {
    let genuine = cluster().sign(PING).unwrap();
    let parts: Vec<&str> = genuine.split('.').collect();
    let forged_claims = URL_SAFE_NO_PAD.encode(
        claims(r#"{"request_id":"r2","request_type":"KEYSIGN","request_detail":"{}","extra_info":"{}"}"#)
            .to_string(),
    );
    let token = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);
    assert_invalid_token(&token).await;
}

#[tokio::test]
async fn attack_stripped_signature_rejected() {
    let genuine = cluster().sign(PING).unwrap();
    let unsigned = genuine.rsplit_once('.').unwrap().0.to_string() + ".";
    assert_invalid_token(&unsigned).await;
}

// =============================================================================
// ATTACK: Algorithm Confusion
// =============================================================================

/// HMAC keyed with the cluster's public key, which anyone can read.
#[tokio::test]
async fn attack_hmac_with_public_key_rejected() {
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims(PING),
        &EncodingKey::from_secret(cluster_party().public.as_bytes()),
    )
    .unwrap();
    assert_invalid_token(&token).await;
}

#[tokio::test]
async fn attack_alg_none_rejected() {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(claims(PING).to_string());
    assert_invalid_token(&format!("{}.{}.", header, body)).await;
}

// =============================================================================
// ATTACK: Wrong Issuer
// =============================================================================

/// A token signed with the cluster key but naming another issuer. Only
/// enforced when the gateway is configured with an expected issuer.
#[tokio::test]
async fn attack_wrong_issuer_rejected() {
    let strict = gateway_with(
        EnvelopeConfig::new(GATEWAY_NAME, 2).with_expected_issuer(CLUSTER_NAME),
        Dispatcher::with_defaults(),
    );
    let impostor = codec(cluster_party(), gateway_party(), EnvelopeConfig::new("mallory", 2));

    let decision = strict.evaluate(&impostor.sign(PING).unwrap()).await;
    assert_eq!(decision.status, Status::InvalidToken);

    let decision = strict.evaluate(&cluster().sign(PING).unwrap()).await;
    assert!(decision.is_approved());
}

// =============================================================================
// ATTACK: Missing Payload
// =============================================================================

#[tokio::test]
async fn attack_token_without_package_data_rejected() {
    let mut bare = claims(PING);
    bare.as_object_mut().unwrap().remove("package_data");
    // Signed with the real cluster key, so only the missing claim can fail it.
    let private = RsaPrivateKey::from_pkcs8_pem(&cluster_party().private).unwrap();
    let key = EncodingKey::from_rsa_der(private.to_pkcs1_der().unwrap().as_bytes());
    let token = encode(&Header::new(Algorithm::RS256), &bare, &key).unwrap();

    let decision = gateway().evaluate(&token).await;
    assert_eq!(decision.status, Status::InvalidToken);
    assert_eq!(
        decision.error.as_deref(),
        Some("Token missing package_data claim")
    );
}
