//! Error types for Omega deck generation and export.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Omega operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OmegaError {
    /// The brief was empty or whitespace only.
    #[error("Brief is required.")]
    BriefRequired,

    /// No provider API key is configured.
    #[error("Provider API key missing. Generated a quick draft locally instead.")]
    MissingApiKey,

    /// A deck without slides cannot be exported.
    #[error("Cannot export a deck without slides.")]
    EmptyDeck,

    /// The provider path failed; carries the provider's own code.
    #[error("{message}")]
    Provider {
        message: String,
        code: String,
        model: Option<String>,
    },

    /// The presentation file could not be produced.
    #[error("Unable to generate presentation file: {0}")]
    Export(String),

}

impl OmegaError {
    /// Stable machine-readable code surfaced to callers.
    pub fn code(&self) -> &str {
        match self {
            OmegaError::BriefRequired => "BRIEF_REQUIRED",
            OmegaError::MissingApiKey => "MISSING_PROVIDER_API_KEY",
            OmegaError::EmptyDeck => "EMPTY_DECK",
            OmegaError::Provider { code, .. } => code,
            OmegaError::Export(_) => "EXPORT_FAILURE",
        }
    }

    /// Returns true if this error is rejected input rather than a runtime failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, OmegaError::BriefRequired | OmegaError::EmptyDeck)
    }

    /// Model the error is attributed to, if any.
    pub fn model(&self) -> Option<&str> {
        match self {
            OmegaError::Provider { model, .. } => model.as_deref(),
            _ => None,
        }
    }
}

/// Convenience Result type for Omega operations.
pub type Result<T> = std::result::Result<T, OmegaError>;

/// Wire form of an error: `{ message, code, model? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

impl From<&OmegaError> for ErrorInfo {
    fn from(err: &OmegaError) -> Self {
        ErrorInfo::new(err.to_string(), err.code()).with_model(err.model().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(OmegaError::BriefRequired.code(), "BRIEF_REQUIRED");
        assert_eq!(OmegaError::MissingApiKey.code(), "MISSING_PROVIDER_API_KEY");
        assert_eq!(OmegaError::EmptyDeck.code(), "EMPTY_DECK");
        assert_eq!(OmegaError::Export("zip".into()).code(), "EXPORT_FAILURE");
    }

    #[test]
    fn test_provider_error_info_keeps_upstream_code() {
        let err = OmegaError::Provider {
            message: "rate limited".into(),
            code: "rate_limit_exceeded".into(),
            model: Some("gpt-4o".into()),
        };
        let info = ErrorInfo::from(&err);
        assert_eq!(info.code, "rate_limit_exceeded");
        assert_eq!(info.message, "rate limited");
        assert_eq!(info.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_error_info_omits_missing_model() {
        let json = serde_json::to_value(ErrorInfo::new("x", "EMPTY_DECK")).unwrap();
        assert!(json.get("model").is_none());
    }
}
