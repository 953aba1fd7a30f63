//! Presentation assembly.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

use crate::builder::PresentationBuilder;
use crate::document::ExportDocument;
use crate::error::{ExportError, Result};
use crate::pptx::PptxBuilder;
use crate::theme::extract_theme_xml;

/// Title of the trailing summary slide.
pub const KEY_TAKEAWAYS_TITLE: &str = "Key Takeaways";

pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

const DEFAULT_FILENAME_BASE: &str = "omega-deck";
const FILENAME_WORDS: usize = 8;

/// A finished presentation file.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Feed `doc` into `builder` and serialize it.
///
/// One content slide per shaped slide, in order, followed by exactly one
/// summary slide when the document carries insights.
pub fn assemble<B: PresentationBuilder>(doc: &ExportDocument, mut builder: B) -> Result<Vec<u8>> {
    if doc.slides.is_empty() {
        return Err(ExportError::EmptyDeck);
    }

    for slide in &doc.slides {
        builder.add_slide(&slide.title, &slide.bullets, slide.notes.as_deref());
    }
    if !doc.insights.is_empty() {
        builder.add_summary_slide(KEY_TAKEAWAYS_TITLE, &doc.insights);
    }

    builder.serialize()
}

/// Build a `.pptx` for `doc`, reusing the theme of a custom upload when it has a usable one.
pub fn export_pptx(doc: &ExportDocument, now: DateTime<Utc>) -> Result<ExportedFile> {
    let mut builder = PptxBuilder::create();
    if let Some(data) = &doc.custom_theme {
        match extract_theme_xml(data) {
            Ok(xml) => builder = builder.with_theme_xml(xml),
            Err(e) => warn!("Custom theme ignored, using default: {}", e),
        }
    }

    let bytes = assemble(doc, builder)?;
    let filename = export_filename(&doc.brief, now);
    info!(
        "Exported {} ({} slides, {} bytes)",
        filename,
        doc.slides.len() + usize::from(!doc.insights.is_empty()),
        bytes.len()
    );

    Ok(ExportedFile {
        filename,
        bytes,
        content_type: PPTX_CONTENT_TYPE,
    })
}

/// `<slug of the brief's first words>-<timestamp>.pptx`.
pub fn export_filename(brief: &str, now: DateTime<Utc>) -> String {
    let cleaned: String = brief
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();
    let slug = cleaned
        .split_whitespace()
        .take(FILENAME_WORDS)
        .collect::<Vec<_>>()
        .join("-");
    let base = if slug.is_empty() {
        DEFAULT_FILENAME_BASE
    } else {
        slug.as_str()
    };

    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}-{}.pptx", base, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ShapedSlide;
    use chrono::TimeZone;
    use omega_core::summarize;
    use omega_state::{build_export_payload, SessionDeckState};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    const BUDGETING_BRIEF: &str =
        "Launch a budgeting app. Target young professionals. Freemium pricing.";

    #[derive(Default)]
    struct RecordingBuilder {
        slides: Vec<(String, Vec<String>, Option<String>)>,
        summaries: Vec<(String, Vec<String>)>,
    }

    impl PresentationBuilder for RecordingBuilder {
        fn create() -> Self {
            Self::default()
        }

        fn add_slide(&mut self, title: &str, bullets: &[String], notes: Option<&str>) {
            self.slides
                .push((title.into(), bullets.to_vec(), notes.map(str::to_string)));
        }

        fn add_summary_slide(&mut self, title: &str, bullets: &[String]) {
            self.summaries.push((title.into(), bullets.to_vec()));
        }

        fn serialize(&self) -> Result<Vec<u8>> {
            let mut out = Vec::new();
            for (title, _, _) in &self.slides {
                out.extend_from_slice(title.as_bytes());
                out.push(b'\n');
            }
            for (title, bullets) in &self.summaries {
                out.extend_from_slice(format!("{}:{}\n", title, bullets.join("|")).as_bytes());
            }
            Ok(out)
        }
    }

    fn document(count: usize, insights: &[&str]) -> ExportDocument {
        ExportDocument {
            brief: "Launch a budgeting app".into(),
            slides: (1..=count)
                .map(|i| ShapedSlide {
                    title: format!("Slide {}", i),
                    bullets: vec!["point".into()],
                    notes: None,
                })
                .collect(),
            insights: insights.iter().map(|s| s.to_string()).collect(),
            custom_theme: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 15).unwrap()
    }

    fn session_document(state: &SessionDeckState) -> ExportDocument {
        let payload = build_export_payload(state).unwrap();
        ExportDocument::from(&payload)
    }

    fn read_part(bytes: &[u8], name: &str) -> Option<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).ok()?;
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        Some(content)
    }

    #[test]
    fn test_seven_slides_without_summary() {
        let out = assemble(&document(7, &[]), RecordingBuilder::create()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 7);
        assert!(!text.contains(KEY_TAKEAWAYS_TITLE));
    }

    #[test]
    fn test_insights_add_one_summary() {
        let out = assemble(&document(6, &["a", "b", "c"]), RecordingBuilder::create()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[6], "Key Takeaways:a|b|c");
    }

    #[test]
    fn test_empty_deck_rejected() {
        let err = assemble(&document(0, &["a"]), RecordingBuilder::create()).unwrap_err();
        assert!(matches!(err, ExportError::EmptyDeck));
        assert_eq!(err.code(), "EMPTY_DECK");
    }

    #[test]
    fn test_session_deck_without_insights_to_pptx() {
        let mut deck = summarize(BUDGETING_BRIEF);
        deck.insights.clear();
        let state = SessionDeckState {
            brief: BUDGETING_BRIEF.into(),
            deck,
            ..Default::default()
        };

        let doc = session_document(&state);
        let bytes = assemble(&doc, PptxBuilder::create()).unwrap();

        let presentation = read_part(&bytes, "ppt/presentation.xml").unwrap();
        assert_eq!(presentation.matches("<p:sldId ").count(), 7);
        assert!(read_part(&bytes, "ppt/slides/slide8.xml").is_none());
        for n in 1..=7 {
            let slide = read_part(&bytes, &format!("ppt/slides/slide{}.xml", n)).unwrap();
            assert!(!slide.contains(KEY_TAKEAWAYS_TITLE));
        }
    }

    #[test]
    fn test_session_deck_insights_become_key_takeaways() {
        let state = SessionDeckState {
            brief: BUDGETING_BRIEF.into(),
            deck: summarize(BUDGETING_BRIEF),
            ..Default::default()
        };
        assert_eq!(state.deck.len(), 7);

        let doc = session_document(&state);
        assert_eq!(doc.slides[0].title, "Opening");
        let bytes = assemble(&doc, PptxBuilder::create()).unwrap();

        let presentation = read_part(&bytes, "ppt/presentation.xml").unwrap();
        assert_eq!(presentation.matches("<p:sldId ").count(), 8);

        let summary = read_part(&bytes, "ppt/slides/slide8.xml").unwrap();
        let positions: Vec<usize> = [
            "<a:t>Key Takeaways</a:t>",
            "<a:t>Launch a budgeting app</a:t>",
            "<a:t>Target young professionals</a:t>",
            "<a:t>Freemium pricing</a:t>",
        ]
        .iter()
        .map(|needle| summary.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_filename() {
        assert_eq!(
            export_filename("Launch a Budgeting App!", now()),
            "launch-a-budgeting-app-2024-05-01T09-30-15-000Z.pptx"
        );
        assert_eq!(
            export_filename("one two three four five six seven eight nine", now()),
            "one-two-three-four-five-six-seven-eight-2024-05-01T09-30-15-000Z.pptx"
        );
        assert_eq!(
            export_filename("  ¡¿!! ", now()),
            "omega-deck-2024-05-01T09-30-15-000Z.pptx"
        );
    }

    #[test]
    fn test_export_pptx_with_bad_custom_theme() {
        let mut doc = document(2, &["x"]);
        doc.custom_theme = Some("not a package".into());
        let file = export_pptx(&doc, now()).unwrap();
        assert_eq!(file.content_type, PPTX_CONTENT_TYPE);
        assert!(file.filename.starts_with("launch-a-budgeting-app-"));
        assert_eq!(&file.bytes[..2], b"PK");
    }
}
