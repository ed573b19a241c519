//! libSQL persistence for taskflow

mod connection;
mod migrations;
mod task_store;

pub use connection::{Database, RemoteConfig};
pub use task_store::LibSqlTaskStore;
