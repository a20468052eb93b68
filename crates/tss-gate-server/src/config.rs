//! Gateway configuration
//!
//! Loaded from a YAML file, then adjusted by environment overrides:
//!
//! ```yaml
//! callback_server:
//!   service_name: "tss-gate"
//!   endpoint: "0.0.0.0:11020"
//!   token_expire_minutes: 2
//!   client_public_key_path: "configs/cobo-public.pem"
//!   service_private_key_path: "configs/callback-private.pem"
//!   enable_debug: false
//! address_whitelist: []
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use tss_gate_core::EnvelopeConfig;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "TSS_GATE_CONFIG";
/// Overrides `callback_server.endpoint`
pub const ENDPOINT_ENV: &str = "TSS_GATE_ENDPOINT";
/// Overrides `callback_server.service_name`
pub const SERVICE_NAME_ENV: &str = "TSS_GATE_SERVICE_NAME";
/// Log level for the binary
pub const LOG_LEVEL_ENV: &str = "TSS_GATE_LOG_LEVEL";

/// Used when neither a CLI argument nor the environment names a config file
pub const DEFAULT_CONFIG_PATH: &str = "configs/callback-server-config.yaml";

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub callback_server: CallbackServerConfig,

    /// Destination addresses KEYSIGN may pay to; empty disables the check
    #[serde(default)]
    pub address_whitelist: Vec<String>,
}

/// Settings for the callback endpoint and its envelopes
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackServerConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Lifetime of signed decisions in minutes
    #[serde(default = "default_token_expire_minutes")]
    pub token_expire_minutes: i64,

    pub client_public_key_path: PathBuf,

    pub service_private_key_path: PathBuf,

    /// Issuer inbound tokens must carry; empty disables the check
    #[serde(default)]
    pub expected_client_issuer: Option<String>,

    #[serde(default)]
    pub enable_debug: bool,
}

fn default_service_name() -> String {
    "tss-gate".into()
}

fn default_endpoint() -> String {
    "0.0.0.0:11020".into()
}

fn default_token_expire_minutes() -> i64 {
    2
}

impl GatewayConfig {
    /// Pick the config path: CLI argument, then environment, then default
    pub fn resolve_path(cli_arg: Option<String>, env_value: Option<String>) -> PathBuf {
        cli_arg
            .or(env_value)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Read, override from the process environment and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = &mut self.callback_server;
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            server.endpoint = endpoint;
        }
        if let Some(name) = lookup(SERVICE_NAME_ENV).filter(|v| !v.is_empty()) {
            server.service_name = name;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let server = &self.callback_server;
        if server.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("callback_server.endpoint is empty".into()));
        }
        if server.service_name.trim().is_empty() {
            return Err(ConfigError::Invalid("callback_server.service_name is empty".into()));
        }
        if server.client_public_key_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "callback_server.client_public_key_path is empty".into(),
            ));
        }
        if server.service_private_key_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "callback_server.service_private_key_path is empty".into(),
            ));
        }
        if server.token_expire_minutes <= 0 {
            warn!(
                token_expire_minutes = server.token_expire_minutes,
                "Decisions will be issued already expired"
            );
        }
        Ok(())
    }

    /// Socket address to bind; a bare `:port` binds every interface
    pub fn bind_address(&self) -> String {
        let endpoint = self.callback_server.endpoint.trim();
        if endpoint.starts_with(':') {
            format!("0.0.0.0{}", endpoint)
        } else {
            endpoint.to_string()
        }
    }

    pub fn envelope_config(&self) -> EnvelopeConfig {
        let server = &self.callback_server;
        let config = EnvelopeConfig::new(server.service_name.clone(), server.token_expire_minutes);
        match server
            .expected_client_issuer
            .as_deref()
            .map(str::trim)
            .filter(|issuer| !issuer.is_empty())
        {
            Some(issuer) => config.with_expected_issuer(issuer),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
callback_server:
  service_name: "callback-server"
  endpoint: ":11020"
  token_expire_minutes: 2
  client_public_key_path: "configs/cobo-public.pem"
  service_private_key_path: "configs/callback-private.pem"
  enable_debug: true
address_whitelist:
  - "0xabc"
  - "bc1qxyz"
"#;

    #[test]
    fn test_parse_sample() {
        let config = GatewayConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.callback_server.service_name, "callback-server");
        assert_eq!(config.callback_server.token_expire_minutes, 2);
        assert!(config.callback_server.enable_debug);
        assert_eq!(config.address_whitelist, vec!["0xabc", "bc1qxyz"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_yaml(
            "callback_server:\n  client_public_key_path: a.pem\n  service_private_key_path: b.pem\n",
        )
        .unwrap();
        assert_eq!(config.callback_server.service_name, "tss-gate");
        assert_eq!(config.callback_server.endpoint, "0.0.0.0:11020");
        assert_eq!(config.callback_server.token_expire_minutes, 2);
        assert!(config.address_whitelist.is_empty());
        assert!(config.envelope_config().expected_issuer.is_none());
    }

    #[test]
    fn test_missing_key_paths_fail_to_parse() {
        let result = GatewayConfig::from_yaml("callback_server:\n  endpoint: \":1\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_bind_address_expands_bare_port() {
        let config = GatewayConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:11020");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GatewayConfig::from_yaml(SAMPLE).unwrap();
        let env: HashMap<&str, &str> = [(ENDPOINT_ENV, "127.0.0.1:9000"), (SERVICE_NAME_ENV, "")].into();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.callback_server.endpoint, "127.0.0.1:9000");
        assert_eq!(config.callback_server.service_name, "callback-server");
    }

    #[test]
    fn test_empty_endpoint_invalid() {
        let mut config = GatewayConfig::from_yaml(SAMPLE).unwrap();
        config.callback_server.endpoint = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_negative_ttl_allowed() {
        let mut config = GatewayConfig::from_yaml(SAMPLE).unwrap();
        config.callback_server.token_expire_minutes = -1;
        assert!(config.validate().is_ok());
        assert_eq!(config.envelope_config().ttl, chrono::Duration::minutes(-1));
    }

    #[test]
    fn test_expected_issuer() {
        let mut config = GatewayConfig::from_yaml(SAMPLE).unwrap();
        config.callback_server.expected_client_issuer = Some(" cobo ".into());
        assert_eq!(config.envelope_config().expected_issuer.as_deref(), Some("cobo"));
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            GatewayConfig::resolve_path(Some("a.yaml".into()), Some("b.yaml".into())),
            PathBuf::from("a.yaml")
        );
        assert_eq!(
            GatewayConfig::resolve_path(None, Some("b.yaml".into())),
            PathBuf::from("b.yaml")
        );
        assert_eq!(
            GatewayConfig::resolve_path(None, None),
            PathBuf::from(DEFAULT_CONFIG_PATH)
        );
    }

    #[test]
    fn test_shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(DEFAULT_CONFIG_PATH);
        let config = GatewayConfig::from_file(path).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.address_whitelist.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = GatewayConfig::load(dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
