//! # Omega Export
//!
//! Turns an export payload into a presentation file.
//!
//! - [`ExportDocument`] reshapes a payload (typed or raw JSON)
//! - [`PresentationBuilder`] is the file-builder capability; [`PptxBuilder`] implements it
//! - [`assemble`] emits content slides and the optional Key Takeaways slide

pub mod assembly;
pub mod builder;
pub mod document;
pub mod error;
pub mod pptx;
pub mod theme;

pub use assembly::{assemble, export_filename, export_pptx, ExportedFile, KEY_TAKEAWAYS_TITLE, PPTX_CONTENT_TYPE};
pub use builder::PresentationBuilder;
pub use document::{ExportDocument, ShapedSlide};
pub use error::{ExportError, Result};
pub use pptx::PptxBuilder;
