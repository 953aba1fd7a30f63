//! Presentation export endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use omega_core::OmegaError;
use omega_export::{export_pptx, ExportDocument, ExportError};
use omega_state::{build_export_payload, ExportPayload};
use serde_json::Value;
use tracing::error;

use super::{api_error, json_rejection, ApiError};
use crate::state::AppState;

/// Header carrying the suggested file name.
pub const FILENAME_HEADER: &str = "x-omega-filename";

/// Turn an export payload into a `.pptx` download.
pub async fn export_deck(body: Result<Json<Value>, JsonRejection>) -> Result<Response, ApiError> {
    let Json(payload) = body.map_err(json_rejection)?;
    let doc = ExportDocument::from_value(&payload);

    let file = export_pptx(&doc, Utc::now()).map_err(|e| match e {
        ExportError::EmptyDeck => api_error(StatusCode::BAD_REQUEST, &OmegaError::EmptyDeck),
        other => {
            error!("Failed to export PPTX: {}", other);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, &OmegaError::from(other))
        }
    })?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ),
        (header::CACHE_CONTROL, "no-store".to_string()),
        (HeaderName::from_static(FILENAME_HEADER), file.filename),
    ];
    Ok((headers, file.bytes).into_response())
}

/// Export payload for the caller's current session deck.
pub async fn session_export_payload(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ExportPayload>, ApiError> {
    let snapshot = state.session(&headers).await.snapshot().await;
    build_export_payload(&snapshot)
        .map(Json)
        .map_err(|e| api_error(StatusCode::NOT_FOUND, &OmegaError::from(e)))
}
