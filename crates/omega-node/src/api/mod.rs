//! HTTP API handlers.

pub mod export;
pub mod generate;
pub mod health;
pub mod session;

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use omega_core::{ErrorInfo, OmegaError};
use serde::Serialize;
use tracing::debug;

/// Code reported for request bodies that are not the expected JSON.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

/// Error body: `{ "error": { "message", "code" } }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorInfo,
}

/// Handler error.
pub type ApiError = (StatusCode, Json<ErrorBody>);

/// Map an error to its status and body.
pub fn api_error(status: StatusCode, err: &OmegaError) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: ErrorInfo::from(err),
        }),
    )
}

/// Map a body extraction failure onto the JSON error shape, keeping axum's status.
pub fn json_rejection(rejection: JsonRejection) -> ApiError {
    debug!("Rejected request body: {}", rejection.body_text());
    (
        rejection.status(),
        Json(ErrorBody {
            error: ErrorInfo::new(rejection.body_text(), INVALID_REQUEST),
        }),
    )
}
