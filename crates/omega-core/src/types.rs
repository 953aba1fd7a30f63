//! Common types describing a generation outcome.

use serde::{Deserialize, Serialize};

use crate::deck::Deck;
use crate::error::ErrorInfo;

/// Where a deck came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    /// The remote text-generation provider produced the deck.
    #[serde(rename = "provider")]
    Provider,
    /// The node synthesized the deck locally after a provider failure.
    #[serde(rename = "fallback")]
    Fallback,
    /// The provider could not be reached at all; synthesized locally.
    #[serde(rename = "fallback-client")]
    FallbackClient,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Provider => "provider",
            ProviderKind::Fallback => "fallback",
            ProviderKind::FallbackClient => "fallback-client",
        }
    }

    /// Returns true for either fallback path.
    pub fn is_fallback(&self) -> bool {
        !matches!(self, ProviderKind::Provider)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deck together with how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub deck: Deck,
    pub provider: ProviderKind,
    pub model_used: Option<String>,

    /// Diagnostic copy of the provider answer. Never parsed downstream.
    pub raw_provider_response: Option<serde_json::Value>,

    /// Populated whenever `provider` is a fallback.
    pub error: Option<ErrorInfo>,
}

impl GenerationResult {
    /// A deck the provider produced.
    pub fn succeeded(deck: Deck, model_used: String, raw: serde_json::Value) -> Self {
        Self {
            deck,
            provider: ProviderKind::Provider,
            model_used: Some(model_used),
            raw_provider_response: Some(raw),
            error: None,
        }
    }

    /// A locally synthesized deck after a failure.
    pub fn fell_back(kind: ProviderKind, deck: Deck, error: ErrorInfo) -> Self {
        debug_assert!(kind.is_fallback());
        let raw = serde_json::json!({ "error": &error });
        Self {
            deck,
            provider: kind,
            model_used: error.model.clone(),
            raw_provider_response: Some(raw),
            error: Some(error),
        }
    }
}
