//! Error types for taskflow-core

use thiserror::Error;

use crate::util::compact_text;

/// Result type alias using taskflow-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the task repository and the task list controller.
///
/// Every lower-level failure is mapped onto one of these kinds before it
/// leaves the repository, so presentation only ever deals with this enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No user is signed in
    #[error("User not authenticated")]
    Unauthenticated,

    /// The signed-in user does not own the record
    #[error("Unauthorized")]
    Unauthorized,

    /// Task not found
    #[error("Task not found: {0}")]
    NotFound(String),

    /// Field constraints violated
    #[error("{0}")]
    Validation(String),

    /// The underlying store call failed
    #[error("Transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Short machine-friendly name of the error kind
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Unauthorized => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Transport(_) => "transport",
        }
    }
}

/// Errors raised by remote task store backends
#[derive(Error, Debug)]
pub enum StoreError {
    /// Record does not exist (e.g. removed between read and write)
    #[error("Record not found: {0}")]
    Missing(String),

    /// Backend-specific failure
    #[error("Database error: {0}")]
    Database(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Missing(id) => Self::NotFound(id),
            other => Self::Transport(compact_text(&other.to_string())),
        }
    }
}

/// Failure reported by a notification hook; always swallowed by callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);
