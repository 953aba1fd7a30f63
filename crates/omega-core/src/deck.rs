//! Slide and Deck types.
//!
//! A [`Deck`] is the canonical outline every generation path converges on.
//! Positions are always the 1-based index of a slide and the display title
//! is always derived from position and title, never authored independently.

use serde::{Deserialize, Serialize};

/// Maximum number of slides accepted from a provider.
pub const MAX_SLIDES: usize = 12;

/// Minimum number of slides in a generated deck.
pub const MIN_SLIDES: usize = 6;

/// Maximum bullets kept on an exported slide.
pub const MAX_BULLETS: usize = 8;

/// Maximum number of deck-level insights.
pub const MAX_INSIGHTS: usize = 8;

/// A single slide of an outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Identifier, unique within a deck.
    pub id: String,

    /// Non-empty slide title.
    pub title: String,

    /// 1-based position in the deck.
    pub position: usize,

    /// `"<position>. <title>"`.
    pub display_title: String,

    /// Ordered, non-empty bullet points.
    pub bullets: Vec<String>,

    /// Optional presenter notes for this slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_notes: Option<String>,
}

impl Slide {
    /// Create a slide at `position` with a derived display title.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        position: usize,
        bullets: Vec<String>,
    ) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            display_title: display_title(position, &title),
            title,
            position,
            bullets,
            speaker_notes: None,
        }
    }

    /// Attach speaker notes.
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.speaker_notes = notes;
        self
    }

    /// Move the slide to `position`, re-deriving its display title.
    pub fn renumber(&mut self, position: usize) {
        self.position = position;
        self.display_title = display_title(position, &self.title);
    }

    /// Returns true if position and display title agree.
    pub fn is_consistent(&self) -> bool {
        self.position >= 1 && self.display_title == display_title(self.position, &self.title)
    }
}

/// Format a display title.
pub fn display_title(position: usize, title: &str) -> String {
    format!("{}. {}", position, title)
}

/// Canonical outline: slides, presenter insights and the derived title list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub outline: Vec<String>,
}

impl Deck {
    /// Build a deck, renumbering slides and deriving the outline.
    pub fn from_slides(mut slides: Vec<Slide>, insights: Vec<String>) -> Self {
        for (index, slide) in slides.iter_mut().enumerate() {
            slide.renumber(index + 1);
        }
        let outline = slides.iter().map(|s| s.title.clone()).collect();
        Self {
            slides,
            insights,
            outline,
        }
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Check if the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Returns true if positions, display titles and outline all agree.
    pub fn is_consistent(&self) -> bool {
        self.outline.len() == self.slides.len()
            && self.slides.iter().enumerate().all(|(i, slide)| {
                slide.position == i + 1 && slide.is_consistent() && self.outline[i] == slide.title
            })
    }
}
