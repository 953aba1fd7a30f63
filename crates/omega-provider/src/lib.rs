//! # Omega Provider
//!
//! Structured deck generation against a Responses-style text-generation API.
//!
//! - [`ProviderClient`] walks an ordered list of model candidates
//! - [`ResponsesTransport`] is the network seam ([`HttpTransport`] in production)
//! - [`normalize`] maps whatever the provider returned onto the canonical deck

pub mod client;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod raw;
pub mod request;
pub mod transport;

pub use client::{model_candidates, ProviderClient, ProviderConfig, RawProviderOutput};
pub use error::{ErrorClass, ProviderError, Result};
pub use normalize::normalize;
pub use raw::{RawDeck, RawSlide};
pub use request::ResponsesRequest;
pub use transport::{HttpTransport, ResponsesTransport, TransportResponse};
