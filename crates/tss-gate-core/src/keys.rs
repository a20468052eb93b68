//! Key material loading
//!
//! The gateway holds two asymmetric keys with distinct roles:
//! - `ServiceKey`: the gateway's RSA private key, used to sign outbound decisions
//! - `CounterpartyKey`: the caller's RSA public key, used to verify inbound requests
//!
//! Both are parsed once at startup and never mutated afterwards.

use jsonwebtoken::{DecodingKey, EncodingKey};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::path::Path;
use tracing::debug;

use crate::error::{GateError, Result};

/// Smallest RSA modulus accepted for either direction
pub const MIN_RSA_BITS: usize = 2048;

/// The gateway's private signing key
#[derive(Clone)]
pub struct ServiceKey {
    encoding: EncodingKey,
    bits: usize,
}

impl std::fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceKey")
            .field("bits", &self.bits)
            .field("encoding", &"[redacted]")
            .finish()
    }
}

impl ServiceKey {
    /// Parse a PKCS8 ("PRIVATE KEY") or PKCS1 ("RSA PRIVATE KEY") PEM document
    pub fn from_pem(pem: &str) -> Result<Self> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| GateError::KeyFormatInvalid(format!("service private key: {}", e)))?;

        let bits = check_strength(key.size(), "service private key")?;
        let der = key
            .to_pkcs1_der()
            .map_err(|e| GateError::KeyFormatInvalid(format!("service private key: {}", e)))?;

        Ok(Self {
            encoding: EncodingKey::from_rsa_der(der.as_bytes()),
            bits,
        })
    }

    /// Read and parse a private key file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_pem(&read_pem(path.as_ref())?)
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.bits
    }
}

/// The caller's public verification key
#[derive(Clone)]
pub struct CounterpartyKey {
    decoding: DecodingKey,
    bits: usize,
}

impl std::fmt::Debug for CounterpartyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterpartyKey")
            .field("bits", &self.bits)
            .finish_non_exhaustive()
    }
}

impl CounterpartyKey {
    /// Parse an X.509 SPKI ("PUBLIC KEY") or PKCS1 ("RSA PUBLIC KEY") PEM document
    pub fn from_pem(pem: &str) -> Result<Self> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| GateError::KeyFormatInvalid(format!("counterparty public key: {}", e)))?;

        let bits = check_strength(key.size(), "counterparty public key")?;
        let der = key
            .to_pkcs1_der()
            .map_err(|e| GateError::KeyFormatInvalid(format!("counterparty public key: {}", e)))?;

        Ok(Self {
            decoding: DecodingKey::from_rsa_der(der.as_bytes()),
            bits,
        })
    }

    /// Read and parse a public key file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_pem(&read_pem(path.as_ref())?)
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.bits
    }
}

/// Service private key plus counterparty public key
#[derive(Debug, Clone)]
pub struct KeyPair {
    service: ServiceKey,
    counterparty: CounterpartyKey,
}

impl KeyPair {
    pub fn new(service: ServiceKey, counterparty: CounterpartyKey) -> Self {
        Self {
            service,
            counterparty,
        }
    }

    /// Load both keys from PEM files
    ///
    /// # Errors
    /// * `KeyFileNotFound` - if either path cannot be read
    /// * `KeyFormatInvalid` - if either file is not an RSA key of the expected kind
    pub fn load(
        service_private_key_path: impl AsRef<Path>,
        counterparty_public_key_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let service = ServiceKey::from_file(service_private_key_path)?;
        let counterparty = CounterpartyKey::from_file(counterparty_public_key_path)?;
        Ok(Self::new(service, counterparty))
    }

    /// Build from in-memory PEM documents
    pub fn from_pem(service_private_pem: &str, counterparty_public_pem: &str) -> Result<Self> {
        Ok(Self::new(
            ServiceKey::from_pem(service_private_pem)?,
            CounterpartyKey::from_pem(counterparty_public_pem)?,
        ))
    }

    pub fn service(&self) -> &ServiceKey {
        &self.service
    }

    pub fn counterparty(&self) -> &CounterpartyKey {
        &self.counterparty
    }
}

fn read_pem(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "Reading key file");
    std::fs::read_to_string(path)
        .map_err(|e| GateError::KeyFileNotFound(format!("{}: {}", path.display(), e)))
}

fn check_strength(size_bytes: usize, what: &str) -> Result<usize> {
    let bits = size_bytes * 8;
    if bits < MIN_RSA_BITS {
        return Err(GateError::KeyFormatInvalid(format!(
            "{} is {} bits, need at least {}",
            what, bits, MIN_RSA_BITS
        )));
    }
    Ok(bits)
}
