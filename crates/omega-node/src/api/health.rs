//! Health check endpoint with runtime detail.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,

    /// Whether decks come from the provider or are always drafted locally.
    pub provider_configured: bool,
    pub live_sessions: usize,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "omega-node",
        version: env!("CARGO_PKG_VERSION"),
        provider_configured: state.config.api_key.is_some(),
        live_sessions: state.sessions.len().await,
    })
}
