//! Provider error types and their classification.

use omega_core::OmegaError;
use thiserror::Error;

/// Closed classification of provider failures.
///
/// Computed once where the failure is created; the retry loop dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The requested model does not exist or is not available to this key.
    ModelUnavailable,
    /// The provider answered but the content could not be used.
    MalformedResponse,
    /// The provider could not be reached, or did not answer in time.
    Transport,
    /// The request was rejected before any call was made.
    Validation,
    /// Any other non-success answer from the provider (auth, rate limits, outages).
    Upstream,
}

/// Errors produced by the provider client.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// Non-success HTTP answer from the provider.
    #[error("Provider API error ({status}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        model: String,
        class: ErrorClass,
    },

    /// No output item carried usable content.
    #[error("Provider response did not include JSON content.")]
    EmptyResponse { model: String },

    /// A text part was selected but carried no string payload.
    #[error("Provider response text payload missing.")]
    MissingText { model: String },

    /// The payload was not a JSON object.
    #[error("Provider response JSON payload malformed: {reason}")]
    InvalidJson { model: String, reason: String },

    /// The request could not be issued or no response arrived.
    #[error("Provider request failed: {message}")]
    Transport {
        message: String,
        model: Option<String>,
    },

    /// An attempt exceeded its deadline.
    #[error("Provider request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64, model: String },

    /// The candidate list is empty.
    #[error("No provider models configured.")]
    NoCandidates,
}

impl ProviderError {
    /// Build an API error, classifying it from its code and message.
    pub fn api(status: u16, code: Option<String>, message: String, model: &str) -> Self {
        let code = code
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| status.to_string());
        let class = if is_model_unavailable(&code, &message) {
            ErrorClass::ModelUnavailable
        } else {
            ErrorClass::Upstream
        };
        ProviderError::Api {
            status,
            code,
            message,
            model: model.to_string(),
            class,
        }
    }

    /// Classification of this failure.
    pub fn class(&self) -> ErrorClass {
        match self {
            ProviderError::Api { class, .. } => *class,
            ProviderError::EmptyResponse { .. }
            | ProviderError::MissingText { .. }
            | ProviderError::InvalidJson { .. } => ErrorClass::MalformedResponse,
            ProviderError::Transport { .. } | ProviderError::Timeout { .. } => ErrorClass::Transport,
            ProviderError::NoCandidates => ErrorClass::Validation,
        }
    }

    /// Code surfaced to callers; upstream codes pass through verbatim.
    pub fn code(&self) -> String {
        match self {
            ProviderError::Api { code, .. } => code.clone(),
            ProviderError::EmptyResponse { .. } => "EMPTY_PROVIDER_RESPONSE".to_string(),
            ProviderError::MissingText { .. } => "MISSING_PROVIDER_TEXT".to_string(),
            ProviderError::InvalidJson { .. } => "INVALID_PROVIDER_JSON".to_string(),
            ProviderError::Transport { .. } => "TRANSPORT_ERROR".to_string(),
            ProviderError::Timeout { .. } => "PROVIDER_TIMEOUT".to_string(),
            ProviderError::NoCandidates => "NO_PROVIDER_MODELS".to_string(),
        }
    }

    /// Model the failed attempt targeted.
    pub fn model(&self) -> Option<&str> {
        match self {
            ProviderError::Api { model, .. }
            | ProviderError::EmptyResponse { model }
            | ProviderError::MissingText { model }
            | ProviderError::InvalidJson { model, .. }
            | ProviderError::Timeout { model, .. } => Some(model.as_str()),
            ProviderError::Transport { model, .. } => model.as_deref(),
            ProviderError::NoCandidates => None,
        }
    }

    /// Attach the attempted model to a transport failure.
    pub fn for_model(self, attempted: &str) -> Self {
        match self {
            ProviderError::Transport { message, model: None } => ProviderError::Transport {
                message,
                model: Some(attempted.to_string()),
            },
            other => other,
        }
    }

    /// Returns true if the next candidate model should be tried.
    pub fn should_try_next_model(&self) -> bool {
        self.class() == ErrorClass::ModelUnavailable
    }
}

impl From<&ProviderError> for OmegaError {
    fn from(err: &ProviderError) -> Self {
        OmegaError::Provider {
            message: err.to_string(),
            code: err.code(),
            model: err.model().map(str::to_string),
        }
    }
}

/// Convenience Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

fn is_model_unavailable(code: &str, message: &str) -> bool {
    let code = code.to_lowercase();
    if matches!(code.as_str(), "model_not_found" | "invalid_model" | "404") {
        return true;
    }
    let message = message.to_lowercase();
    message.contains("model") && (message.contains("not found") || message.contains("does not exist"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_not_found_code() {
        let err = ProviderError::api(400, Some("model_not_found".into()), "nope".into(), "gpt-x");
        assert_eq!(err.class(), ErrorClass::ModelUnavailable);
        assert!(err.should_try_next_model());
    }

    #[test]
    fn test_missing_code_uses_status() {
        let err = ProviderError::api(404, None, "Not Found".into(), "gpt-x");
        assert_eq!(err.code(), "404");
        assert_eq!(err.class(), ErrorClass::ModelUnavailable);
    }

    #[test]
    fn test_message_mentions_model_does_not_exist() {
        let err = ProviderError::api(
            400,
            Some("bad_request".into()),
            "The model `gpt-9` does not exist".into(),
            "gpt-9",
        );
        assert!(err.should_try_next_model());
    }

    #[test]
    fn test_not_found_without_model_is_upstream() {
        let err = ProviderError::api(400, Some("bad_request".into()), "file not found".into(), "m");
        assert_eq!(err.class(), ErrorClass::Upstream);
        assert!(!err.should_try_next_model());
    }

    #[test]
    fn test_malformed_classes() {
        let err = ProviderError::InvalidJson {
            model: "m".into(),
            reason: "eof".into(),
        };
        assert_eq!(err.class(), ErrorClass::MalformedResponse);
        assert_eq!(err.code(), "INVALID_PROVIDER_JSON");
        assert_eq!(
            ProviderError::Timeout {
                duration_ms: 10,
                model: "m".into()
            }
            .class(),
            ErrorClass::Transport
        );
    }

    #[test]
    fn test_into_omega_error_keeps_code_and_model() {
        let err = ProviderError::api(429, Some("rate_limit_exceeded".into()), "slow down".into(), "gpt-4o");
        let omega = OmegaError::from(&err);
        assert_eq!(omega.code(), "rate_limit_exceeded");
        assert_eq!(omega.model(), Some("gpt-4o"));
        assert_eq!(omega.to_string(), err.to_string());
    }

    #[test]
    fn test_for_model_fills_transport_model() {
        let err = ProviderError::Transport {
            message: "refused".into(),
            model: None,
        }
        .for_model("gpt-4o");
        assert_eq!(err.model(), Some("gpt-4o"));
    }
}
