use serde::Serialize;

use super::outcome::{InputOutcome, OutcomeStatus};
use super::token_count::TokenUsage;

/// Summary of one run: counts plus every input's outcome in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub prompt_version: String,
    pub total: usize,
    pub ok: usize,
    /// Validation failures, call failures and unreadable inputs combined.
    pub failed: usize,
    /// Summed usage of every generation call that returned.
    pub usage: TokenUsage,
    pub results: Vec<InputOutcome>,
}

impl RunReport {
    pub fn errored_count(&self) -> usize {
        self.results
            .iter()
            .filter(|o| o.call_failure().is_some())
            .count()
    }

    pub fn unreadable_count(&self) -> usize {
        self.results
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Unreadable { .. }))
            .count()
    }
}
