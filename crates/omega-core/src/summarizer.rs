//! Deterministic local outline synthesis.
//!
//! Used whenever the provider path is unavailable. No I/O, never fails.

use crate::deck::{Deck, Slide};

/// Title sequence used for locally synthesized decks.
pub const CANONICAL_TITLES: [&str; 10] = [
    "Opening", "Problem", "Solution", "Product", "Proof", "Demo", "Metrics", "Roadmap", "Pricing",
    "CTA",
];

/// Bullet used when a slide has no keywords of its own.
pub const GENERIC_BULLET: &str = "Highlight the most important takeaways for this section.";

const MAX_SUMMARY_INSIGHTS: usize = 4;
const MIN_SUMMARY_SLIDES: usize = 6;
const MAX_SUMMARY_SLIDES: usize = 10;
const KEYWORDS_PER_SLIDE: usize = 2;

fn split_trimmed<'a>(text: &'a str, separators: &'a [char]) -> impl Iterator<Item = &'a str> {
    text.split(separators)
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// Split text on sentence and line boundaries, keeping at most four entries.
pub fn synthesize_insights(text: &str) -> Vec<String> {
    split_trimmed(text, &['.', '\n'])
        .take(MAX_SUMMARY_INSIGHTS)
        .map(str::to_string)
        .collect()
}

fn keywords(text: &str) -> Vec<&str> {
    split_trimmed(text, &[',', '\n']).collect()
}

/// Turn a brief into a draft deck.
pub fn summarize(brief: &str) -> Deck {
    let insights = synthesize_insights(brief);
    let slide_count = (insights.len() + 4)
        .clamp(MIN_SUMMARY_SLIDES, MAX_SUMMARY_SLIDES)
        .min(CANONICAL_TITLES.len());
    let keywords = keywords(brief);

    let slides = CANONICAL_TITLES
        .iter()
        .take(slide_count)
        .enumerate()
        .map(|(index, title)| {
            let segment = keywords
                .iter()
                .skip(index * KEYWORDS_PER_SLIDE)
                .take(KEYWORDS_PER_SLIDE);
            let mut bullets: Vec<String> = segment
                .map(|keyword| format!("Focus on {}.", keyword.to_lowercase()))
                .collect();
            if bullets.is_empty() {
                bullets.push(GENERIC_BULLET.to_string());
            }
            Slide::new(format!("slide-{}", index + 1), *title, index + 1, bullets)
        })
        .collect();

    Deck::from_slides(slides, insights)
}
