//! Export payload assembled from a session snapshot.

use chrono::{DateTime, Utc};
use omega_core::{ErrorInfo, ProviderKind, Slide};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StateError};
use crate::session::SessionDeckState;

/// Theme options carried with an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub include_example_theme: bool,
    pub theme_key: String,
    pub custom_theme_name: Option<String>,
}

/// Provenance of the exported deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    pub generated_at: Option<DateTime<Utc>>,
    pub provider: Option<ProviderKind>,
    pub model_used: Option<String>,
    pub last_error: Option<ErrorInfo>,
}

/// Body of an export request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub brief: String,
    pub outline: Vec<String>,
    pub slides: Vec<Slide>,

    /// Deck-level insights.
    pub speaker_notes: Vec<String>,
    pub options: ExportOptions,
    pub meta: ExportMeta,

    /// Diagnostic only.
    pub raw_model_response: Option<serde_json::Value>,

    /// Base64 template bytes, only for custom uploads.
    pub custom_theme: Option<String>,
}

/// Build the export payload for a session snapshot.
///
/// Fails without producing anything when the deck has no slides.
pub fn build_export_payload(state: &SessionDeckState) -> Result<ExportPayload> {
    if state.deck.slides.is_empty() {
        return Err(StateError::EmptyDeck);
    }

    Ok(ExportPayload {
        brief: state.brief.clone(),
        outline: state.deck.outline.clone(),
        slides: state.deck.slides.clone(),
        speaker_notes: state.deck.insights.clone(),
        options: ExportOptions {
            include_example_theme: state.theme.is_theme_aware(),
            theme_key: state.theme.theme_key().to_string(),
            custom_theme_name: state.theme.custom_name().map(str::to_string),
        },
        meta: ExportMeta {
            generated_at: state.generated_at,
            provider: state.provider,
            model_used: state.model_used.clone(),
            last_error: state.last_error.clone(),
        },
        raw_model_response: state.raw_provider_response.clone(),
        custom_theme: state.theme.custom_data().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use omega_core::{summarize, GenerationResult, ThemeSelection};

    fn generated(theme: ThemeSelection) -> SessionDeckState {
        let result = GenerationResult::succeeded(
            summarize("Launch a budgeting app. Target young professionals."),
            "gpt-4o-mini".into(),
            serde_json::json!({ "id": "resp_1" }),
        );
        SessionDeckState::from_generation("Launch a budgeting app", theme, result, Utc::now())
    }

    #[test]
    fn test_empty_state_fails() {
        assert_eq!(
            build_export_payload(&SessionDeckState::default()),
            Err(StateError::EmptyDeck)
        );
    }

    #[test]
    fn test_payload_mirrors_state() {
        let state = generated(ThemeSelection::BuiltInExample);
        let payload = build_export_payload(&state).unwrap();

        assert_eq!(payload.slides, state.deck.slides);
        assert_eq!(payload.outline, state.deck.outline);
        assert_eq!(payload.speaker_notes, state.deck.insights);
        assert_eq!(payload.options.theme_key, "example-pptx");
        assert!(payload.options.include_example_theme);
        assert!(payload.options.custom_theme_name.is_none());
        assert!(payload.custom_theme.is_none());
        assert_eq!(payload.meta.provider, Some(ProviderKind::Provider));
        assert_eq!(payload.meta.model_used.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_custom_upload_carries_bytes() {
        let state = generated(ThemeSelection::CustomUpload {
            name: "brand.pptx".into(),
            data: "UEsDBA==".into(),
        });
        let payload = build_export_payload(&state).unwrap();
        assert_eq!(payload.options.theme_key, "custom-upload");
        assert_eq!(payload.options.custom_theme_name.as_deref(), Some("brand.pptx"));
        assert_eq!(payload.custom_theme.as_deref(), Some("UEsDBA=="));
    }

    #[test]
    fn test_payload_independent_of_later_mutation() {
        let mut state = generated(ThemeSelection::Default);
        let payload = build_export_payload(&state).unwrap();
        state.deck.slides[0].title = "Changed".into();
        state.deck.insights.push("late".into());
        assert_eq!(payload.slides[0].title, "Opening");
        assert!(!payload.speaker_notes.contains(&"late".to_string()));
    }

    #[test]
    fn test_wire_names() {
        let payload = build_export_payload(&generated(ThemeSelection::Default)).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["speakerNotes"].is_array());
        assert_eq!(json["options"]["themeKey"], "default");
        assert_eq!(json["meta"]["provider"], "provider");
        assert_eq!(json["rawModelResponse"]["id"], "resp_1");
    }
}
