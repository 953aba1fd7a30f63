//! Lenient decoding of provider deck payloads.
//!
//! Providers name the same concept differently (`title`/`heading`,
//! `keyPoints`/`bullets`, `speakerNotes`/`insights`). Decoding never fails:
//! wrong-typed fields are treated as absent.

use serde_json::Value;

/// One slide as the provider described it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSlide {
    pub id: Option<String>,
    pub title: Option<String>,
    pub heading: Option<String>,

    /// String entries of `keyPoints`, or of `bullets` when `keyPoints` is absent.
    pub key_points: Vec<String>,

    /// Present only when the provider sent a string.
    pub speaker_notes: Option<String>,
}

/// A provider deck payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDeck {
    pub slides: Vec<RawSlide>,

    /// Top-level presenter notes (`speakerNotes`, else `insights`), string entries only.
    pub speaker_notes: Vec<String>,
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn first_array<'a>(value: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| value.get(*field))
        .find(|candidate| candidate.is_array())
}

impl RawSlide {
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: string_field(value, "id").filter(|id| !id.trim().is_empty()),
            title: string_field(value, "title"),
            heading: string_field(value, "heading"),
            key_points: first_array(value, &["keyPoints", "bullets"])
                .map(string_list)
                .unwrap_or_default(),
            speaker_notes: string_field(value, "speakerNotes"),
        }
    }
}

impl RawDeck {
    pub fn from_value(value: &Value) -> Self {
        let slides = value
            .get("slides")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(RawSlide::from_value).collect())
            .unwrap_or_default();

        let speaker_notes = first_array(value, &["speakerNotes", "insights"])
            .map(string_list)
            .unwrap_or_default();

        Self {
            slides,
            speaker_notes,
        }
    }
}
