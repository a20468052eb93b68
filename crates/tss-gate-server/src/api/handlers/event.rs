//! Event intake handler

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    Form, Json,
};
use std::sync::Arc;
use tracing::warn;

use super::{AppState, TokenForm};

/// Accept a pushed TSS event; the body is always `""`
///
/// POST /v2/event
pub async fn event(
    State(state): State<Arc<AppState>>,
    form: Result<Form<TokenForm>, FormRejection>,
) -> (StatusCode, Json<String>) {
    let token = match form {
        Ok(Form(form)) => form.token,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable event form");
            String::new()
        }
    };

    match state.gateway.ingest_event(token.trim()) {
        Ok(_) => (StatusCode::OK, Json(String::new())),
        Err(err) if err.is_token_error() => {
            warn!(error = %err, "Event token rejected");
            (StatusCode::OK, Json(String::new()))
        }
        Err(err) => {
            warn!(error = %err, "Failed to decode event");
            (StatusCode::BAD_REQUEST, Json(String::new()))
        }
    }
}
