use serde::{Serialize, Serializer};

use super::artifact::ClinicalAnalysisArtifact;
use super::token_count::TokenUsage;
use crate::contract::{Rule, ValidationError};
use crate::generate::CallFailure;

/// Terminal state of one input.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeStatus {
    /// The candidate satisfied every contract rule.
    Success(ClinicalAnalysisArtifact),
    /// The candidate was unparseable or violated the contract. Never empty.
    Failure(Vec<ValidationError>),
    /// Generation itself failed; there was no candidate to validate.
    Errored(CallFailure),
    /// The input text could not be read, so generation never ran.
    Unreadable { reason: String },
}

/// The fate of one input in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct InputOutcome {
    pub input_id: String,
    pub prompt_version: String,
    pub status: OutcomeStatus,
    /// Token usage of the generation call, when one completed.
    pub usage: Option<TokenUsage>,
}

impl InputOutcome {
    pub fn errored(
        input_id: impl Into<String>,
        prompt_version: impl Into<String>,
        failure: CallFailure,
    ) -> Self {
        Self {
            input_id: input_id.into(),
            prompt_version: prompt_version.into(),
            status: OutcomeStatus::Errored(failure),
            usage: None,
        }
    }

    pub fn unreadable(
        input_id: impl Into<String>,
        prompt_version: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            input_id: input_id.into(),
            prompt_version: prompt_version.into(),
            status: OutcomeStatus::Unreadable {
                reason: reason.into(),
            },
            usage: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success(_))
    }

    pub fn artifact(&self) -> Option<&ClinicalAnalysisArtifact> {
        match &self.status {
            OutcomeStatus::Success(artifact) => Some(artifact),
            _ => None,
        }
    }

    /// Validation errors, empty unless the outcome is a `Failure`.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match &self.status {
            OutcomeStatus::Failure(errors) => errors,
            _ => &[],
        }
    }

    pub fn call_failure(&self) -> Option<&CallFailure> {
        match &self.status {
            OutcomeStatus::Errored(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self.status {
            OutcomeStatus::Success(_) => "success",
            OutcomeStatus::Failure(_) => "failure",
            OutcomeStatus::Errored(_) => "errored",
            OutcomeStatus::Unreadable { .. } => "unreadable",
        }
    }
}

// ── Report shape ─────────────────────────────────────────────────────────────
//
// `{id, ok, status, errors?, output?, usage?}` — `errors` present iff the
// input did not succeed, `output` present iff it did.

#[derive(Serialize)]
struct OutcomeEntry<'a> {
    id: &'a str,
    ok: bool,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<ErrorEntry<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a ClinicalAnalysisArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<&'a TokenUsage>,
}

#[derive(Serialize)]
struct ErrorEntry<'a> {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<Rule>,
    message: String,
}

impl<'a> From<&'a ValidationError> for ErrorEntry<'a> {
    fn from(e: &'a ValidationError) -> Self {
        ErrorEntry {
            kind: e.kind.as_str(),
            path: Some(e.path.as_str()),
            rule: e.rule,
            message: e.message.clone(),
        }
    }
}

impl<'a> From<&'a CallFailure> for ErrorEntry<'a> {
    fn from(f: &'a CallFailure) -> Self {
        ErrorEntry {
            kind: "call_failure",
            path: None,
            rule: None,
            message: f.to_string(),
        }
    }
}

impl Serialize for InputOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (errors, output) = match &self.status {
            OutcomeStatus::Success(artifact) => (None, Some(artifact)),
            OutcomeStatus::Failure(errors) => {
                (Some(errors.iter().map(ErrorEntry::from).collect()), None)
            }
            OutcomeStatus::Errored(failure) => (Some(vec![ErrorEntry::from(failure)]), None),
            OutcomeStatus::Unreadable { reason } => (
                Some(vec![ErrorEntry {
                    kind: "read_failure",
                    path: None,
                    rule: None,
                    message: reason.clone(),
                }]),
                None,
            ),
        };

        OutcomeEntry {
            id: &self.input_id,
            ok: self.is_success(),
            status: self.status_label(),
            errors,
            output,
            usage: self.usage.as_ref(),
        }
        .serialize(serializer)
    }
}
