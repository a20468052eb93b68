//! API module for the callback server

pub mod error;
pub mod handlers;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Ping response
#[derive(Serialize)]
pub struct PingResponse {
    pub server: String,
    /// Unix milliseconds, as a string
    pub timestamp: String,
}

/// Health check endpoint
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Liveness probe used by the cluster
///
/// GET /ping
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    Json(PingResponse {
        server: state.service_name.clone(),
        timestamp: Utc::now().timestamp_millis().to_string(),
    })
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/ping", get(ping))
        .route("/health", get(health))
        // Cluster callbacks
        .route("/v2/check", post(handlers::check))
        .route("/v2/event", post(handlers::event))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
