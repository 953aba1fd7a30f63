//! Maps decoded provider payloads onto the canonical [`Deck`].

use omega_core::{synthesize_insights, Deck, Slide, MAX_INSIGHTS, MAX_SLIDES};

use crate::raw::{RawDeck, RawSlide};

/// Maximum bullets kept from a provider slide.
pub const MAX_PROVIDER_BULLETS: usize = 5;

/// Bullet used when a provider slide has no usable key points.
pub const FALLBACK_BULLET: &str = "Highlight the key takeaway for this section.";

fn non_empty_trimmed(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn normalize_slide(raw: &RawSlide, position: usize) -> Slide {
    let title = non_empty_trimmed(raw.title.as_ref())
        .or_else(|| non_empty_trimmed(raw.heading.as_ref()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Slide {}", position));

    let mut bullets: Vec<String> = raw
        .key_points
        .iter()
        .map(|point| point.trim())
        .filter(|point| !point.is_empty())
        .take(MAX_PROVIDER_BULLETS)
        .map(str::to_string)
        .collect();
    if bullets.is_empty() {
        bullets.push(FALLBACK_BULLET.to_string());
    }

    let id = raw
        .id
        .clone()
        .unwrap_or_else(|| format!("slide-{}", position));
    let notes = non_empty_trimmed(raw.speaker_notes.as_ref()).map(str::to_string);

    Slide::new(id, title, position, bullets).with_notes(notes)
}

/// Deck-level insights, in precedence order: explicit notes list, one note
/// per slide, then sentences of the brief.
fn collect_insights(raw: &RawDeck, brief: &str) -> Vec<String> {
    let direct: Vec<String> = raw
        .speaker_notes
        .iter()
        .map(|note| note.trim())
        .filter(|note| !note.is_empty())
        .take(MAX_INSIGHTS)
        .map(str::to_string)
        .collect();
    if !direct.is_empty() {
        return direct;
    }

    let from_slides: Vec<String> = raw
        .slides
        .iter()
        .filter_map(|slide| match &slide.speaker_notes {
            Some(notes) => Some(notes.trim()),
            None => slide
                .key_points
                .iter()
                .map(|point| point.trim())
                .find(|point| !point.is_empty()),
        })
        .filter(|note| !note.is_empty())
        .take(MAX_INSIGHTS)
        .map(str::to_string)
        .collect();
    if !from_slides.is_empty() {
        return from_slides;
    }

    synthesize_insights(brief)
}

/// Normalize a provider payload. Never fails; yields no slides when the
/// payload carried none.
pub fn normalize(raw: &RawDeck, brief: &str) -> Deck {
    let slides = raw
        .slides
        .iter()
        .take(MAX_SLIDES)
        .enumerate()
        .map(|(index, slide)| normalize_slide(slide, index + 1))
        .collect();

    Deck::from_slides(slides, collect_insights(raw, brief))
}
