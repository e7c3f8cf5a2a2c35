use serde_json::Value;

use crate::contract::{Rule, ValidationError, Validator};
use crate::error::CoreError;
use crate::models::artifact::ClinicalAnalysisArtifact;
use crate::models::candidate::{CandidatePayload, RawCandidate};
use crate::models::outcome::{InputOutcome, OutcomeStatus};

/// Judge one raw candidate against the contract.
///
/// An unparseable payload yields exactly one parse-failure error and no
/// field checks. A parsed payload is checked rule by rule and every
/// violation is returned. Only a payload with zero violations is promoted
/// to a [`ClinicalAnalysisArtifact`]; nothing is filled in or repaired.
pub fn validate(raw: &RawCandidate, validator: &dyn Validator) -> InputOutcome {
    let status = match raw.payload() {
        CandidatePayload::Unparseable { reason, .. } => {
            OutcomeStatus::Failure(vec![ValidationError::malformed(reason)])
        }
        CandidatePayload::Structured(map) => {
            let errors = validator.check(&map);
            if !errors.is_empty() {
                OutcomeStatus::Failure(errors)
            } else {
                match ClinicalAnalysisArtifact::from_checked(map) {
                    Ok(artifact) => OutcomeStatus::Success(artifact),
                    // The validator accepted something the artifact shape cannot hold.
                    Err(e) => OutcomeStatus::Failure(vec![ValidationError::violation(
                        ValidationError::ROOT,
                        Rule::Type,
                        format!("payload does not match the artifact shape: {e}"),
                    )]),
                }
            }
        }
    };

    InputOutcome {
        input_id: raw.input_id.clone(),
        prompt_version: raw.prompt_version.clone(),
        status,
        usage: Some(raw.meta.usage),
    }
}

/// Re-check an accepted artifact. Always empty for the contract that
/// accepted it.
pub fn check_artifact(
    artifact: &ClinicalAnalysisArtifact,
    validator: &dyn Validator,
) -> Result<Vec<ValidationError>, CoreError> {
    match serde_json::to_value(artifact)? {
        Value::Object(map) => Ok(validator.check(&map)),
        _ => Err(CoreError::NotAnObject),
    }
}
