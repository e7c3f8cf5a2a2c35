use anamnesis_core::CallFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("model returned no text content")]
    EmptyResponse,

    #[error("AWS config error: {0}")]
    Config(String),
}

impl From<BedrockError> for CallFailure {
    fn from(e: BedrockError) -> Self {
        match e {
            BedrockError::EmptyResponse => CallFailure::EmptyResponse,
            other => CallFailure::Invocation {
                message: other.to_string(),
            },
        }
    }
}
