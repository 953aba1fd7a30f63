//! Session state endpoints.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use omega_state::SessionDeckState;
use tracing::debug;

use crate::state::AppState;

/// Snapshot of the caller's session.
pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<SessionDeckState> {
    Json(state.session(&headers).await.snapshot().await)
}

/// Drop the caller's session; in-flight generations will not commit.
pub async fn clear_session(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if state.end_session(&headers).await {
        debug!("Session ended");
    }
    StatusCode::NO_CONTENT
}
