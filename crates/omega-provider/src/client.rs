//! Provider client with a bounded retry over model candidates.

use std::sync::Arc;
use std::time::Duration;

use omega_core::ThemeSelection;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ProviderError, Result};
use crate::extract::extract_payload;
use crate::raw::RawDeck;
use crate::request::ResponsesRequest;
use crate::transport::{ResponsesTransport, TransportResponse};

/// Models tried after the configured one, in order.
pub const FALLBACK_MODELS: [&str; 3] = ["gpt-4o-mini", "gpt-4o", "gpt-4.1-mini"];

/// Default deadline for a single attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(45);

/// Configuration for the provider client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Explicitly configured model, tried first.
    pub model: Option<String>,

    /// Models tried when earlier candidates are unavailable.
    pub fallback_models: Vec<String>,

    /// Deadline for each attempt.
    pub attempt_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: None,
            fallback_models: FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

/// Ordered, de-duplicated candidate list: configured model first.
pub fn model_candidates(configured: Option<&str>, fallbacks: &[String]) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let configured = configured.map(str::trim).filter(|m| !m.is_empty());

    for model in configured.into_iter().chain(fallbacks.iter().map(|m| m.trim())) {
        if !model.is_empty() && !candidates.iter().any(|c| c == model) {
            candidates.push(model.to_string());
        }
    }
    candidates
}

/// What a successful attempt produced.
#[derive(Debug, Clone)]
pub struct RawProviderOutput {
    /// Model that answered.
    pub model_used: String,

    /// Leniently decoded deck payload.
    pub deck: RawDeck,

    /// Full provider answer, kept for diagnostics only.
    pub raw: Value,
}

/// Client issuing structured-generation requests.
#[derive(Clone)]
pub struct ProviderClient {
    transport: Arc<dyn ResponsesTransport>,
    candidates: Vec<String>,
    attempt_timeout: Duration,
}

impl ProviderClient {
    /// Create a client over `transport`.
    pub fn new(transport: Arc<dyn ResponsesTransport>, config: &ProviderConfig) -> Self {
        Self {
            transport,
            candidates: model_candidates(config.model.as_deref(), &config.fallback_models),
            attempt_timeout: config.attempt_timeout,
        }
    }

    /// Models that will be tried, in order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Generate a deck, advancing through candidates only while models are unavailable.
    pub async fn generate(&self, brief: &str, theme: &ThemeSelection) -> Result<RawProviderOutput> {
        let mut last_error = None;

        for model in &self.candidates {
            match self.request_deck(model, brief, theme).await {
                Ok(output) => {
                    info!("Provider answered with model {}", model);
                    return Ok(output);
                }
                Err(err) if err.should_try_next_model() => {
                    warn!("Provider model {} unavailable: {}", model, err);
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or(ProviderError::NoCandidates))
    }

    /// One attempt against one model.
    async fn request_deck(
        &self,
        model: &str,
        brief: &str,
        theme: &ThemeSelection,
    ) -> Result<RawProviderOutput> {
        debug!("Requesting deck from model {}", model);
        let request = ResponsesRequest::new(model, brief, theme);

        let response = tokio::time::timeout(self.attempt_timeout, self.transport.send(&request))
            .await
            .map_err(|_| ProviderError::Timeout {
                duration_ms: self.attempt_timeout.as_millis() as u64,
                model: model.to_string(),
            })?
            .map_err(|e| e.for_model(model))?;

        if !response.is_success() || response.body.is_none() {
            return Err(api_error(&response, model));
        }
        let data = response.body.unwrap_or(Value::Null);

        let payload = extract_payload(&data, model)?;

        Ok(RawProviderOutput {
            model_used: model.to_string(),
            deck: RawDeck::from_value(&payload),
            raw: data,
        })
    }
}

fn api_error(response: &TransportResponse, model: &str) -> ProviderError {
    let error = response.body.as_ref().and_then(|body| body.get("error"));

    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| response.reason.clone())
        .unwrap_or_else(|| "Unknown provider API error".to_string());

    let code = error.and_then(|e| e.get("code")).and_then(|code| match code {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    ProviderError::api(response.status, code, message, model)
}
