//! Theme selection and resolution.

use serde::{Deserialize, Serialize};

/// Theme key of the default Omega look.
pub const DEFAULT_THEME_KEY: &str = "default";

/// Theme key of the bundled example template.
pub const EXAMPLE_THEME_KEY: &str = "example-pptx";

/// Theme key of a user-uploaded template.
pub const CUSTOM_THEME_KEY: &str = "custom-upload";

/// A template uploaded by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeUpload {
    /// Original file name.
    pub name: String,

    /// File contents, base64 encoded.
    pub data: String,
}

impl ThemeUpload {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// The theme governing one generation/export cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "themeKey")]
pub enum ThemeSelection {
    /// Default Omega theme.
    #[default]
    #[serde(rename = "default")]
    Default,

    /// The bundled example template.
    #[serde(rename = "example-pptx")]
    BuiltInExample,

    /// A user-uploaded template carried through export.
    #[serde(rename = "custom-upload")]
    CustomUpload { name: String, data: String },
}

impl ThemeSelection {
    /// Pick the active theme from upload state and the example toggle.
    ///
    /// An upload wins when both its name and data are non-empty.
    pub fn resolve(upload: Option<&ThemeUpload>, use_example: bool) -> Self {
        if let Some(upload) = upload {
            let name = upload.name.trim();
            if !name.is_empty() && !upload.data.is_empty() {
                return ThemeSelection::CustomUpload {
                    name: name.to_string(),
                    data: upload.data.clone(),
                };
            }
        }

        if use_example {
            ThemeSelection::BuiltInExample
        } else {
            ThemeSelection::Default
        }
    }

    /// Wire key of this theme.
    pub fn theme_key(&self) -> &'static str {
        match self {
            ThemeSelection::Default => DEFAULT_THEME_KEY,
            ThemeSelection::BuiltInExample => EXAMPLE_THEME_KEY,
            ThemeSelection::CustomUpload { .. } => CUSTOM_THEME_KEY,
        }
    }

    /// Returns true if generation prompts should be theme-aware.
    pub fn is_theme_aware(&self) -> bool {
        !matches!(self, ThemeSelection::Default)
    }

    /// Uploaded template name, only for custom uploads.
    pub fn custom_name(&self) -> Option<&str> {
        match self {
            ThemeSelection::CustomUpload { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Uploaded template bytes (base64), only for custom uploads.
    pub fn custom_data(&self) -> Option<&str> {
        match self {
            ThemeSelection::CustomUpload { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Theme sentence appended to the generation prompt.
    pub fn directive(&self) -> String {
        match self {
            ThemeSelection::Default => {
                "Use the default Omega theme: modern, minimal, data-forward, and easy to adapt."
                    .to_string()
            }
            ThemeSelection::BuiltInExample => "Match the mood, palette, and typography of the example pptx theme. Reference slide roles that benefit from that style.".to_string(),
            ThemeSelection::CustomUpload { name, .. } => format!(
                "Adapt the outline to align with the uploaded PowerPoint template named \"{}\". Assume vibrant, on-brand visuals that mirror that deck's structure.",
                name
            ),
        }
    }
}
