use crate::models::outcome::InputOutcome;
use crate::models::report::RunReport;
use crate::models::token_count::TokenUsage;

/// Summarise a run. Read-only: outcomes keep their order and validity.
pub fn aggregate(prompt_version: &str, outcomes: Vec<InputOutcome>) -> RunReport {
    let total = outcomes.len();
    let ok = outcomes.iter().filter(|o| o.is_success()).count();

    let mut usage = TokenUsage::default();
    for outcome in &outcomes {
        if let Some(u) = &outcome.usage {
            usage.accumulate(u);
        }
    }

    RunReport {
        prompt_version: prompt_version.to_string(),
        total,
        ok,
        failed: total - ok,
        usage,
        results: outcomes,
    }
}
