//! Request body for one structured-generation attempt.

use omega_core::{ThemeSelection, MAX_SLIDES, MIN_SLIDES};
use serde::Serialize;

/// Fixed system instruction.
pub const SYSTEM_PROMPT: &str = "You are an expert presentation designer. Create concise Google Slides outlines with strong storytelling. Always respond with compact JSON that matches the requested structure. Do not include commentary outside JSON.";

const SAMPLING_TEMPERATURE: f32 = 0.5;

/// Output-shape contract appended to every user instruction.
pub fn output_guide() -> String {
    format!(
        r#"Return a JSON object with the following structure:
{{
  "slides": [
    {{
      "id": "slide-1",
      "title": "Concise slide title",
      "keyPoints": [
        "Bullet point 1",
        "Bullet point 2"
      ],
      "speakerNotes": "Optional concise speaker note for presenters."
    }}
  ],
  "insights": ["Optional list of key insights for the presenter"],
  "outline": ["Array listing slide titles in order"],
  "summary": "Optional single paragraph summary of the deck"
}}
Rules:
- Provide between {} and {} slides.
- keyPoints must contain 2 to 5 short bullet strings.
- speakerNotes is optional but preferred; omit it when not relevant.
- Use plain text only. Do not include markdown, explanations, or additional keys."#,
        MIN_SLIDES, MAX_SLIDES
    )
}

/// User instruction: brief, theme directive and output contract.
pub fn user_prompt(brief: &str, theme: &ThemeSelection) -> String {
    format!(
        "Slide deck brief:\n{}\n\nTheme request: {}\n\n{}",
        brief,
        theme.directive(),
        output_guide()
    )
}

/// Body of `POST /responses`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
    pub text: TextOptions,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: String,
    pub content: Vec<InputContent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextOptions {
    pub format: TextFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl InputMessage {
    fn text(role: &str, text: String) -> Self {
        Self {
            role: role.to_string(),
            content: vec![InputContent {
                kind: "input_text".to_string(),
                text,
            }],
        }
    }
}

impl ResponsesRequest {
    /// Build the request for one model candidate.
    pub fn new(model: &str, brief: &str, theme: &ThemeSelection) -> Self {
        Self {
            model: model.to_string(),
            input: vec![
                InputMessage::text("system", SYSTEM_PROMPT.to_string()),
                InputMessage::text("user", user_prompt(brief, theme)),
            ],
            text: TextOptions {
                format: TextFormat {
                    kind: "json_object".to_string(),
                },
            },
            temperature: SAMPLING_TEMPERATURE,
        }
    }
}
