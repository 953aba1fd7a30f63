//! Error types for session state.

use omega_core::OmegaError;
use thiserror::Error;

/// Errors raised by session state operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Nothing has been generated yet, or the deck has no slides.
    #[error("Cannot build export payload before generating a deck outline.")]
    EmptyDeck,
}

impl StateError {
    pub fn code(&self) -> &'static str {
        match self {
            StateError::EmptyDeck => "EMPTY_DECK",
        }
    }
}

/// Convenience Result type for state operations.
pub type Result<T> = std::result::Result<T, StateError>;

impl From<StateError> for OmegaError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::EmptyDeck => OmegaError::EmptyDeck,
        }
    }
}
