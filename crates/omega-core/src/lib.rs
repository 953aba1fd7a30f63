//! # Omega Core
//!
//! Core primitives shared by every Omega crate.
//!
//! This crate provides:
//! - [`Slide`] and [`Deck`] - the canonical outline shape
//! - [`ThemeSelection`] - which theme governs generation and export
//! - [`GenerationResult`] - a deck plus where it came from
//! - [`summarize`] - the deterministic local outline synthesizer
//! - [`OmegaError`] - error taxonomy with stable wire codes

pub mod deck;
pub mod error;
pub mod summarizer;
pub mod theme;
pub mod types;

// Re-exports for convenience
pub use deck::{Deck, Slide, MAX_BULLETS, MAX_INSIGHTS, MAX_SLIDES, MIN_SLIDES};
pub use error::{ErrorInfo, OmegaError, Result};
pub use summarizer::{summarize, synthesize_insights, CANONICAL_TITLES};
pub use theme::{ThemeSelection, ThemeUpload};
pub use types::{GenerationResult, ProviderKind};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::deck::{Deck, Slide};
    pub use crate::error::{ErrorInfo, OmegaError, Result};
    pub use crate::theme::{ThemeSelection, ThemeUpload};
    pub use crate::types::{GenerationResult, ProviderKind};
}
