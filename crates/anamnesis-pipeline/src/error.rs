use thiserror::Error;

/// Run-level failures. Per-input failures never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid run settings: {0}")]
    InvalidSettings(String),
}
