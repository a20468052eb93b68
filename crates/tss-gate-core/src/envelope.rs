//! Signed envelope codec
//!
//! An envelope is an RS256 JWT whose claims are
//! `{"iss": <service name>, "exp": <unix seconds>, "package_data": <base64 payload>}`.
//! Outbound envelopes are signed with the service key; inbound envelopes are
//! verified with the counterparty key.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{GateError, Result};
use crate::keys::KeyPair;

/// Wire claims carried inside the signed token
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PackageClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iss: Option<String>,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    package_data: Option<String>,
}

/// A verified envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub issuer: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub payload: String,
}

/// Codec settings
#[derive(Debug, Clone)]
pub struct EnvelopeConfig {
    /// Issuer stamped on outbound envelopes
    pub issuer: String,
    /// Lifetime of outbound envelopes; zero or negative yields already-expired tokens
    pub ttl: Duration,
    /// When set, inbound envelopes must carry exactly this issuer
    pub expected_issuer: Option<String>,
}

impl EnvelopeConfig {
    pub fn new(issuer: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            issuer: issuer.into(),
            ttl: Duration::minutes(ttl_minutes),
            expected_issuer: None,
        }
    }

    pub fn with_expected_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }
}

/// Signs and verifies envelopes with an immutable key pair
///
/// Holds no mutable state, so one codec can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct EnvelopeCodec {
    keys: KeyPair,
    config: EnvelopeConfig,
    validation: Validation,
}

impl EnvelopeCodec {
    pub fn new(keys: KeyPair, config: EnvelopeConfig) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = vec![Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            keys,
            config,
            validation,
        }
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// Sign a payload into a compact token
    ///
    /// # Errors
    /// * `EmptyPayload` - if `payload` is empty
    /// * `SigningFailed` - if the service key cannot produce a signature
    pub fn sign(&self, payload: &str) -> Result<String> {
        self.sign_at(payload, Utc::now())
    }

    /// Sign with an explicit issue time
    pub fn sign_at(&self, payload: &str, issued_at: DateTime<Utc>) -> Result<String> {
        if payload.is_empty() {
            return Err(GateError::EmptyPayload);
        }

        let claims = PackageClaims {
            iss: Some(self.config.issuer.clone()),
            exp: (issued_at + self.config.ttl).timestamp(),
            package_data: Some(STANDARD.encode(payload.as_bytes())),
        };

        encode(
            &Header::new(Algorithm::RS256),
            &claims,
            self.keys.service().encoding_key(),
        )
        .map_err(|e| GateError::SigningFailed(e.to_string()))
    }

    /// Verify a token and return its payload
    pub fn verify(&self, token: &str) -> Result<String> {
        self.open(token).map(|envelope| envelope.payload)
    }

    /// Verify a token and return the full envelope
    ///
    /// # Errors
    /// * `EmptyToken` - if `token` is empty
    /// * `SignatureInvalid` - if the signature does not match the counterparty key
    /// * `TokenExpired` - if now is at or after `exp`
    /// * `TokenMalformed` - if the token cannot be parsed
    /// * `IssuerMismatch` - if an expected issuer is configured and differs
    /// * `MissingPayloadClaim` - if `package_data` is absent or empty
    pub fn open(&self, token: &str) -> Result<Envelope> {
        let token = token.trim();
        if token.is_empty() {
            return Err(GateError::EmptyToken);
        }

        let data = decode::<PackageClaims>(
            token,
            self.keys.counterparty().decoding_key(),
            &self.validation,
        )
        .map_err(|err| classify_decode_error(token, err))?;
        let claims = data.claims;

        let now = Utc::now().timestamp();
        if now >= claims.exp {
            return Err(GateError::TokenExpired);
        }

        if let Some(expected) = &self.config.expected_issuer {
            let actual = claims.iss.clone().unwrap_or_default();
            if &actual != expected {
                return Err(GateError::IssuerMismatch {
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        let encoded = claims
            .package_data
            .filter(|data| !data.is_empty())
            .ok_or(GateError::MissingPayloadClaim)?;
        let bytes = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| GateError::TokenMalformed(format!("package_data is not base64: {}", e)))?;
        let payload = String::from_utf8(bytes)
            .map_err(|e| GateError::TokenMalformed(format!("package_data is not utf-8: {}", e)))?;
        if payload.is_empty() {
            return Err(GateError::MissingPayloadClaim);
        }

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| GateError::TokenMalformed(format!("exp {} out of range", claims.exp)))?;

        Ok(Envelope {
            issuer: claims.iss,
            expires_at,
            payload,
        })
    }
}

/// A base64 failure confined to the signature segment is a bad signature
fn classify_decode_error(token: &str, err: jsonwebtoken::errors::Error) -> GateError {
    if matches!(err.kind(), ErrorKind::Base64(_)) && signing_input_decodes(token) {
        return GateError::SignatureInvalid(format!("signature is not valid base64url: {}", err));
    }
    err.into()
}

fn signing_input_decodes(token: &str) -> bool {
    let mut segments = token.split('.');
    match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(claims), Some(_), None) => {
            URL_SAFE_NO_PAD.decode(header).is_ok() && URL_SAFE_NO_PAD.decode(claims).is_ok()
        }
        _ => false,
    }
}
