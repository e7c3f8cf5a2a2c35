use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{Instrument, debug, info, info_span, warn};

use anamnesis_core::models::input::{ClinicalInput, LoadedInput};
use anamnesis_core::models::outcome::{InputOutcome, OutcomeStatus};
use anamnesis_core::models::prompt::PromptSpec;
use anamnesis_core::models::report::RunReport;
use anamnesis_core::{CallFailure, Generator, Validator, aggregate, validate};

use crate::error::PipelineError;
use crate::state::InputState;

/// Run-wide parameters, fixed at construction.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// The resolved prompt every input is generated with.
    pub prompt: PromptSpec,
    /// Upper bound on one generation call. Expiry is a call failure.
    pub timeout: Duration,
    /// Inputs in flight at once. 1 processes them strictly in sequence.
    pub concurrency: usize,
}

pub struct Orchestrator {
    generator: Box<dyn Generator>,
    validator: Box<dyn Validator>,
    settings: RunSettings,
}

impl Orchestrator {
    pub fn new(
        generator: Box<dyn Generator>,
        validator: Box<dyn Validator>,
        settings: RunSettings,
    ) -> Result<Self, PipelineError> {
        if settings.concurrency == 0 {
            return Err(PipelineError::InvalidSettings(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if settings.timeout.is_zero() {
            return Err(PipelineError::InvalidSettings(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            generator,
            validator,
            settings,
        })
    }

    pub fn prompt_version(&self) -> &str {
        &self.settings.prompt.version
    }

    pub fn model_id(&self) -> &str {
        self.generator.model_id()
    }

    /// Process every input and summarise the run.
    ///
    /// Inputs run concurrently up to `concurrency`, but the report lists
    /// outcomes in input order. A failing input never stops the others.
    pub async fn run(&self, inputs: Vec<ClinicalInput>) -> RunReport {
        self.run_loaded(inputs.into_iter().map(Ok).collect()).await
    }

    /// Like [`run`](Self::run), for a source where some entries could not be
    /// read. Those are recorded as unreadable outcomes in their original
    /// position and never reach the generator.
    pub async fn run_loaded(&self, inputs: Vec<LoadedInput>) -> RunReport {
        info!(
            inputs = inputs.len(),
            prompt_version = %self.prompt_version(),
            model = %self.model_id(),
            concurrency = self.settings.concurrency,
            "starting run"
        );

        let outcomes: Vec<InputOutcome> = stream::iter(inputs)
            .map(|entry| async move {
                match entry {
                    Ok(input) => self.run_input(input).await,
                    Err(unreadable) => {
                        warn!(
                            input_id = %unreadable.id,
                            reason = %unreadable.reason,
                            "input unreadable"
                        );
                        InputOutcome::unreadable(
                            unreadable.id,
                            self.prompt_version(),
                            unreadable.reason,
                        )
                    }
                }
            })
            .buffered(self.settings.concurrency)
            .collect()
            .await;

        let report = aggregate(self.prompt_version(), outcomes);
        info!(
            total = report.total,
            ok = report.ok,
            failed = report.failed,
            errored = report.errored_count(),
            unreadable = report.unreadable_count(),
            "run complete"
        );
        report
    }

    /// Take one input from Pending to a terminal state.
    pub async fn run_input(&self, input: ClinicalInput) -> InputOutcome {
        let span = info_span!("input", input_id = %input.id);
        async move {
            let mut state = InputState::Pending(input);
            let outcome = loop {
                state = match state {
                    InputState::Validated(outcome) | InputState::Errored(outcome) => break outcome,
                    in_flight => {
                        let from = in_flight.stage();
                        let next = self.advance(in_flight).await;
                        debug!(%from, to = %next.stage(), "transition");
                        next
                    }
                };
            };
            log_outcome(&outcome);
            outcome
        }
        .instrument(span)
        .await
    }

    /// Perform exactly one transition. Terminal states are returned as-is.
    async fn advance(&self, state: InputState) -> InputState {
        match state {
            InputState::Pending(input) => {
                let prompt = &self.settings.prompt;
                let call = self.generator.generate(&input, prompt);
                match tokio::time::timeout(self.settings.timeout, call).await {
                    Ok(Ok(raw)) => InputState::Generated(raw),
                    Ok(Err(failure)) => InputState::Errored(InputOutcome::errored(
                        &input.id,
                        &prompt.version,
                        failure,
                    )),
                    Err(_elapsed) => InputState::Errored(InputOutcome::errored(
                        &input.id,
                        &prompt.version,
                        CallFailure::Timeout {
                            millis: u64::try_from(self.settings.timeout.as_millis())
                                .unwrap_or(u64::MAX),
                        },
                    )),
                }
            }
            InputState::Generated(raw) => {
                InputState::Validated(validate(&raw, self.validator.as_ref()))
            }
            terminal => terminal,
        }
    }
}

fn log_outcome(outcome: &InputOutcome) {
    match &outcome.status {
        OutcomeStatus::Success(_) => info!("input validated"),
        OutcomeStatus::Failure(errors) => {
            let first = errors.first().map(ToString::to_string).unwrap_or_default();
            warn!(violations = errors.len(), first = %first, "input failed validation")
        }
        OutcomeStatus::Errored(failure) => warn!(error = %failure, "input errored"),
        OutcomeStatus::Unreadable { reason } => warn!(%reason, "input unreadable"),
    }
}
