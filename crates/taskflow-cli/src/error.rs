use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] taskflow_core::Error),
    #[error(transparent)]
    Store(#[from] taskflow_core::StoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Task ID cannot be empty")]
    EmptyTaskId,
    #[error("Task not found for id/prefix: {0}")]
    TaskNotFound(String),
    #[error("{0}")]
    AmbiguousTaskId(String),
    #[error("Nothing to change. Pass at least one of --title, --description, --due, --priority, --category.")]
    NothingToUpdate,
    #[error(
        "No user selected. Pass --user, set TASKFLOW_USER, or run `taskflow config set user <ID>`."
    )]
    NoUser,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),
    #[error(
        "Sync is not configured. Set TURSO_DATABASE_URL and TURSO_AUTH_TOKEN, or run `taskflow config set remote-url <URL>`."
    )]
    SyncNotConfigured,
}
