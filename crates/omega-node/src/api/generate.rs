//! Deck generation endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use omega_core::{Deck, ErrorInfo, ProviderKind, ThemeSelection, ThemeUpload};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::{api_error, json_rejection, ApiError};
use crate::state::AppState;

/// Request to generate a deck.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateRequest {
    pub brief: String,

    /// Use the bundled example template.
    pub include_example_theme: bool,

    /// Base64 bytes of an uploaded template.
    pub custom_theme: Option<String>,

    /// File name of the uploaded template.
    pub custom_theme_name: Option<String>,
}

impl GenerateRequest {
    /// Theme for this request; a complete upload overrides the example toggle.
    pub fn theme(&self) -> ThemeSelection {
        let upload = match (&self.custom_theme_name, &self.custom_theme) {
            (Some(name), Some(data)) => Some(ThemeUpload::new(name.as_str(), data.as_str())),
            _ => None,
        };
        ThemeSelection::resolve(upload.as_ref(), self.include_example_theme)
    }
}

/// Generation outcome.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub provider: ProviderKind,
    pub deck: Deck,
    pub theme_key: String,
    pub custom_theme_name: Option<String>,
    pub model_used: Option<String>,

    /// Capped diagnostic copy of the provider answer.
    pub raw_model: Option<serde_json::Value>,
    pub error: Option<ErrorInfo>,
}

/// Generate a deck and store it in the caller's session.
pub async fn generate_deck(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(req) = body.map_err(json_rejection)?;
    let theme = req.theme();
    let store = state.session(&headers).await;

    let deck_state = state
        .orchestrator
        .run(&store, &req.brief, theme)
        .await
        .map_err(|e| {
            if e.is_validation() {
                api_error(StatusCode::BAD_REQUEST, &e)
            } else {
                error!("Generation failed: {}", e);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, &e)
            }
        })?;

    Ok(Json(GenerateResponse {
        provider: deck_state.provider.unwrap_or(ProviderKind::Fallback),
        theme_key: deck_state.theme.theme_key().to_string(),
        custom_theme_name: deck_state.theme.custom_name().map(str::to_string),
        deck: deck_state.deck,
        model_used: deck_state.model_used,
        raw_model: deck_state.raw_provider_response,
        error: deck_state.last_error,
    }))
}
