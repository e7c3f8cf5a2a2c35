use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid prompt version tag: {0:?}")]
    InvalidPromptVersion(String),

    #[error("artifact did not serialize to a JSON object")]
    NotAnObject,
}
