use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("unknown prompt version {version:?} (available: {})", .available.join(", "))]
    UnknownPromptVersion {
        version: String,
        available: Vec<String>,
    },

    #[error("invalid prompt: {0}")]
    InvalidPrompt(#[from] anamnesis_core::CoreError),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Attach the offending path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}
