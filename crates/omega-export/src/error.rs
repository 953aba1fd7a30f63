//! Error types for presentation export.

use omega_core::OmegaError;
use thiserror::Error;

/// Errors that can occur while producing a presentation file.
#[derive(Error, Debug)]
pub enum ExportError {
    /// No slides survived shaping.
    #[error("At least one slide is required to export.")]
    EmptyDeck,

    /// Writing the package failed.
    #[error("Packaging error: {0}")]
    Package(String),

    /// The uploaded template could not be used.
    #[error("Invalid theme template: {0}")]
    InvalidTheme(String),

    /// I/O error while writing the package.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::EmptyDeck => "EMPTY_DECK",
            _ => "EXPORT_FAILURE",
        }
    }
}

/// Convenience Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::Package(err.to_string())
    }
}

impl From<ExportError> for OmegaError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::EmptyDeck => OmegaError::EmptyDeck,
            other => OmegaError::Export(other.to_string()),
        }
    }
}
