use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Placeholder in a prompt template that receives the clinical text.
pub const INPUT_PLACEHOLDER: &str = "{INPUT}";

/// A prompt template bound to its version tag (e.g. `"v1"`, `"v2"`).
///
/// Resolved once per run and shared read-only across every input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSpec {
    pub version: String,
    pub template: String,
}

impl PromptSpec {
    pub fn new(version: impl Into<String>, template: impl Into<String>) -> Result<Self, CoreError> {
        let version = version.into();
        if version.trim().is_empty() || version.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidPromptVersion(version));
        }
        Ok(Self {
            version,
            template: template.into(),
        })
    }

    /// Build the full prompt for one input.
    ///
    /// Every `{INPUT}` occurrence is replaced by `text`. A template without
    /// the placeholder gets the text appended after a blank line.
    pub fn render(&self, text: &str) -> String {
        if self.template.contains(INPUT_PLACEHOLDER) {
            self.template.replace(INPUT_PLACEHOLDER, text)
        } else {
            format!("{}\n\n{}", self.template.trim_end(), text)
        }
    }
}
