//! Doclyst Error Types
//!
//! Centralized error handling for the client.

use thiserror::Error;

/// Central error type for Doclyst
///
/// The `Analysis` and `Speech` payloads are the user-safe display strings;
/// the underlying transport/parse causes are logged where they occur and
/// never travel past the component boundary.
#[derive(Error, Debug)]
pub enum DoclystError {
    #[error("Staging error: {0}")]
    Staging(String),

    #[error("{0}")]
    Analysis(String),

    #[error("{0}")]
    Speech(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Doclyst operations
pub type DoclystResult<T> = Result<T, DoclystError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for DoclystError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        DoclystError::Lock(err.to_string())
    }
}
