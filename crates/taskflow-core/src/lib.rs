//! taskflow-core - Core library for taskflow
//!
//! This crate contains the task models, the remote store seam with its
//! in-memory and libSQL backends, the ownership-enforcing task repository,
//! the optimistic task list, and the swipe gesture state machine used by the
//! taskflow clients.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod services;
pub mod store;
pub mod swipe;
pub mod util;

#[cfg(test)]
mod test_support;

pub use auth::{AuthContext, SessionAuth, StaticAuth};
pub use config::ClientConfig;
pub use error::{Error, NotifyError, Result, StoreError};
pub use models::{NewTask, Priority, Task, TaskId, TaskPatch, UserId};
pub use notify::{NotificationHook, Notice};
pub use services::{TaskListController, TaskRepository};
pub use store::RemoteTaskStore;
