//! Health check endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub uptime_seconds: u64,
    /// Whether an upstream API key was resolved at startup.
    pub chat_configured: bool,
}

/// Liveness probe. The only dependency is the upstream service, which is
/// probed lazily per chat request, so this never makes a network call.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        chat_configured: state.backend.is_some(),
    })
}
