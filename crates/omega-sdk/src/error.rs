//! SDK error types.

use thiserror::Error;

/// Errors returned by [`crate::OmegaClient`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SdkError {
    /// The brief was empty or whitespace only.
    #[error("Brief is required.")]
    BriefRequired,

    /// There is no deck to export.
    #[error("Cannot export a deck without slides.")]
    EmptyDeck,

    /// The node could not be reached.
    #[error("Server request failed: {0}")]
    Connection(String),

    /// The node answered a generation request with a non-success status.
    #[error("Server responded with {status}: {message}")]
    Server { status: u16, message: String },

    /// The node rejected an export request.
    #[error("{message}")]
    Export { message: String, code: String },

    /// A response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SdkError {
    pub fn code(&self) -> &str {
        match self {
            SdkError::BriefRequired => "BRIEF_REQUIRED",
            SdkError::EmptyDeck => "EMPTY_DECK",
            SdkError::Connection(_) => "CLIENT_FETCH_ERROR",
            SdkError::Server { .. } => "SERVER_ERROR",
            SdkError::Export { code, .. } => code,
            SdkError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SdkError::Serialization(err.to_string())
        } else {
            SdkError::Connection(err.to_string())
        }
    }
}

impl From<omega_state::StateError> for SdkError {
    fn from(err: omega_state::StateError) -> Self {
        match err {
            omega_state::StateError::EmptyDeck => SdkError::EmptyDeck,
        }
    }
}

/// Convenience Result type for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;
