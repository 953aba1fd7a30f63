//! # Omega SDK
//!
//! Client SDK for Omega nodes. Generation always yields a deck: when the
//! node is unreachable the outline is drafted locally.

pub mod client;
pub mod error;

pub use client::{ExportedDeck, OmegaClient};
pub use error::{Result, SdkError};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::client::{ExportedDeck, OmegaClient};
    pub use crate::error::SdkError;
    pub use omega_core::prelude::*;
}
