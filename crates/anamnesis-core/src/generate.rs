use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::candidate::RawCandidate;
use crate::models::input::ClinicalInput;
use crate::models::prompt::PromptSpec;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The generation call did not return usable content.
///
/// Kept distinct from validation errors: it means there was never a
/// candidate to judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CallFailure {
    #[error("model invocation failed: {message}")]
    Invocation { message: String },

    #[error("model returned no text content")]
    EmptyResponse,

    #[error("model call timed out after {millis}ms")]
    Timeout { millis: u64 },
}

/// One external text-generation capability.
///
/// Implementations render the prompt, issue exactly one call, and return
/// the output verbatim. They know nothing about the schema contract.
pub trait Generator: Send + Sync {
    /// Identifier of the model behind this generator, for logs and reports.
    fn model_id(&self) -> &str;

    fn generate<'a>(
        &'a self,
        input: &'a ClinicalInput,
        prompt: &'a PromptSpec,
    ) -> BoxFuture<'a, Result<RawCandidate, CallFailure>>;
}
