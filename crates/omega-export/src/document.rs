//! Export-side reshaping of slides and insights.
//!
//! Export requests may come from any client, so shaping is lenient: titles
//! default per slide, bullets are trimmed and capped, notes are optional.

use omega_core::{MAX_BULLETS, MAX_INSIGHTS};
use omega_state::ExportPayload;
use serde_json::Value;

/// A slide ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedSlide {
    pub title: String,
    pub bullets: Vec<String>,
    pub notes: Option<String>,
}

/// Everything the assembly step needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportDocument {
    pub brief: String,
    pub slides: Vec<ShapedSlide>,

    /// Trimmed, non-empty, at most eight.
    pub insights: Vec<String>,

    /// Base64 template bytes of a custom upload.
    pub custom_theme: Option<String>,
}

fn clean_list<'a>(items: impl Iterator<Item = &'a str>, limit: usize) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

fn json_strings(value: Option<&Value>) -> impl Iterator<Item = &str> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

fn first_present<'a>(value: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| value.get(*field))
        .find(|candidate| !candidate.is_null())
}

impl ShapedSlide {
    fn shape<'a>(
        title: Option<&str>,
        bullets: impl Iterator<Item = &'a str>,
        notes: Option<&str>,
        position: usize,
    ) -> Self {
        Self {
            title: title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Slide {}", position)),
            bullets: clean_list(bullets, MAX_BULLETS),
            notes: notes
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        }
    }

    /// Shape one raw slide object.
    pub fn from_value(slide: &Value, position: usize) -> Self {
        Self::shape(
            slide.get("title").and_then(Value::as_str),
            json_strings(first_present(slide, &["bullets", "keyPoints"])),
            slide.get("speakerNotes").and_then(Value::as_str),
            position,
        )
    }
}

impl ExportDocument {
    /// Shape a raw export request body.
    pub fn from_value(value: &Value) -> Self {
        let slides = value
            .get("slides")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .enumerate()
                    .map(|(index, slide)| ShapedSlide::from_value(slide, index + 1))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            brief: value
                .get("brief")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            slides,
            insights: clean_list(
                json_strings(first_present(value, &["speakerNotes", "insights"])),
                MAX_INSIGHTS,
            ),
            custom_theme: value
                .get("customTheme")
                .and_then(Value::as_str)
                .filter(|data| !data.is_empty())
                .map(str::to_string),
        }
    }
}

impl From<&ExportPayload> for ExportDocument {
    fn from(payload: &ExportPayload) -> Self {
        Self {
            brief: payload.brief.clone(),
            slides: payload
                .slides
                .iter()
                .enumerate()
                .map(|(index, slide)| {
                    ShapedSlide::shape(
                        Some(slide.title.as_str()),
                        slide.bullets.iter().map(String::as_str),
                        slide.speaker_notes.as_deref(),
                        index + 1,
                    )
                })
                .collect(),
            insights: clean_list(payload.speaker_notes.iter().map(String::as_str), MAX_INSIGHTS),
            custom_theme: payload.custom_theme.clone().filter(|data| !data.is_empty()),
        }
    }
}
