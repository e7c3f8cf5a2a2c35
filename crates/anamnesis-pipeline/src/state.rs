use std::fmt;

use anamnesis_core::models::candidate::RawCandidate;
use anamnesis_core::models::input::ClinicalInput;
use anamnesis_core::models::outcome::InputOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pending,
    Generated,
    Validated,
    Errored,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Pending => "pending",
            Stage::Generated => "generated",
            Stage::Validated => "validated",
            Stage::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// Where one input is in its single pass through the pipeline.
///
/// Each variant owns exactly what the next stage needs. `Validated` and
/// `Errored` are terminal and never advance again.
#[derive(Debug)]
pub enum InputState {
    Pending(ClinicalInput),
    Generated(RawCandidate),
    Validated(InputOutcome),
    /// Generation failed; validation is skipped.
    Errored(InputOutcome),
}

impl InputState {
    pub fn stage(&self) -> Stage {
        match self {
            InputState::Pending(_) => Stage::Pending,
            InputState::Generated(_) => Stage::Generated,
            InputState::Validated(_) => Stage::Validated,
            InputState::Errored(_) => Stage::Errored,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InputState::Validated(_) | InputState::Errored(_))
    }

    /// The recorded outcome, once the state is terminal.
    pub fn into_outcome(self) -> Option<InputOutcome> {
        match self {
            InputState::Validated(outcome) | InputState::Errored(outcome) => Some(outcome),
            _ => None,
        }
    }
}
