//! The presentation-file builder capability.

use crate::error::Result;

/// Accumulates slides and serializes them into a presentation file.
pub trait PresentationBuilder {
    /// Start an empty presentation.
    fn create() -> Self
    where
        Self: Sized;

    /// Append a content slide.
    fn add_slide(&mut self, title: &str, bullets: &[String], notes: Option<&str>);

    /// Append a summary slide listing `bullets`.
    fn add_summary_slide(&mut self, title: &str, bullets: &[String]);

    /// Produce the file bytes.
    fn serialize(&self) -> Result<Vec<u8>>;
}
