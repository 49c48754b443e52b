//! Error types for the runai host.

/// Top-level error type for the agent-facing host.
#[derive(Debug, thiserror::Error)]
pub enum RunAiError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stdio protocol channel error.
    #[error("channel error: {0}")]
    Channel(String),
}

impl From<runai_search::SearchError> for RunAiError {
    fn from(err: runai_search::SearchError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, RunAiError>;
