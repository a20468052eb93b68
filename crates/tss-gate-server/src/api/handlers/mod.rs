//! API request handlers

pub mod check;
pub mod event;

use serde::Deserialize;

use crate::gateway::Gateway;

pub use check::check;
pub use event::event;

/// Form field carrying the signed envelope
pub const TOKEN_FIELD: &str = "TSS_JWT_MSG";

/// Application state shared across handlers
pub struct AppState {
    /// Codec and dispatcher
    pub gateway: Gateway,
    /// Reported by `/ping`
    pub service_name: String,
}

/// Form body posted by the cluster
#[derive(Debug, Default, Deserialize)]
pub struct TokenForm {
    #[serde(rename = "TSS_JWT_MSG", default)]
    pub token: String,
}
