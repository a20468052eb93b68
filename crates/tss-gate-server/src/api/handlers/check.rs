//! Ceremony callback handler
//!
//! The cluster posts a signed request and waits for a signed decision.
//! Every outcome the gateway can sign is answered with a token; only a
//! signing failure falls back to a plain error body.

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    Form, Json,
};
use std::sync::Arc;
use tracing::{info, warn};
use tss_gate_core::{Decision, Status};

use super::{AppState, TokenForm};
use crate::api::error::ApiError;

/// Decide on a ceremony request
///
/// POST /v2/check
pub async fn check(
    State(state): State<Arc<AppState>>,
    form: Result<Form<TokenForm>, FormRejection>,
) -> Result<(StatusCode, Json<String>), ApiError> {
    let token = match form {
        Ok(Form(form)) => form.token,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable callback form");
            String::new()
        }
    };

    let decision = state.gateway.evaluate(token.trim()).await;
    let sealed = state.gateway.seal(&decision)?;
    info!(
        status = %decision.status,
        request_id = ?decision.request_id,
        action = ?decision.action,
        "Decision sealed"
    );
    Ok((http_status(&decision), Json(sealed)))
}

/// HTTP status that accompanies a signed decision
pub fn http_status(decision: &Decision) -> StatusCode {
    match decision.status {
        Status::Ok | Status::InvalidToken => StatusCode::OK,
        // empty input is answered, not refused
        Status::InvalidRequest if decision.action.is_none() => StatusCode::OK,
        Status::InvalidRequest | Status::InternalError => StatusCode::BAD_REQUEST,
    }
}
