use serde::{Deserialize, Serialize};

/// One clinical text to analyse, identified by its source name.
///
/// The text may be empty; judging whether it carries enough clinical
/// content is left to validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalInput {
    pub id: String,
    pub text: String,
}

impl ClinicalInput {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A source entry whose text could not be read, e.g. not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadableInput {
    pub id: String,
    pub reason: String,
}

/// One entry of an input source: the text, or why it could not be read.
pub type LoadedInput = Result<ClinicalInput, UnreadableInput>;
