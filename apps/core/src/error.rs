use thiserror::Error;

/// Crate-wide error type for the analysis engine.
///
/// Analysis itself never fails from the caller's point of view; these errors
/// surface from configuration loading and from the registration APIs that
/// mutate the shared dictionaries.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A custom pattern could not be compiled.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A custom pattern reused the name of a registered one.
    #[error("Pattern '{0}' is already registered")]
    DuplicatePattern(String),

    /// Represents data validation errors (e.g., empty names, oversized input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., malformed environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A shared registry lock was poisoned by a panicking writer.
    #[error("Registry lock poisoned: {0}")]
    LockPoisoned(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Clone for AnalysisError {
    fn clone(&self) -> Self {
        match self {
            AnalysisError::InvalidPattern(e) => AnalysisError::InvalidPattern(e.clone()),
            AnalysisError::DuplicatePattern(s) => AnalysisError::DuplicatePattern(s.clone()),
            AnalysisError::Validation(s) => AnalysisError::Validation(s.clone()),
            AnalysisError::Config(s) => AnalysisError::Config(s.clone()),
            AnalysisError::LockPoisoned(s) => AnalysisError::LockPoisoned(s.clone()),
            AnalysisError::Internal(s) => AnalysisError::Internal(s.clone()),
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Validation(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AnalysisError {
    fn from(err: validator::ValidationErrors) -> Self {
        AnalysisError::Config(format!("Validation errors: {}", err))
    }
}

impl<T> From<std::sync::PoisonError<T>> for AnalysisError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        AnalysisError::LockPoisoned(err.to_string())
    }
}

/// Errors raised by the asynchronous analysis handle.
#[derive(Debug, Error, Clone)]
pub enum ActorError {
    /// The actor's mailbox is closed, usually because the runner stopped.
    #[error("Analysis actor is not running: {0}")]
    Closed(String),
    /// The actor did not answer in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),
    /// The engine refused the request.
    #[error("Request rejected: {0}")]
    Rejected(#[from] AnalysisError),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(format!("Actor operation timed out: {}", err))
    }
}
