//! Task model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// Prefix reserved for client-generated ids of optimistic entries.
///
/// Server ids are bare UUIDs, so the two namespaces never collide.
pub const TEMPORARY_ID_PREFIX: &str = "temp-";

/// Opaque task identifier assigned by the remote store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wrap an id handed out by the store
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh server-side id (UUID v7, time-sortable)
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Generate a client-side id for an optimistic entry
    #[must_use]
    pub fn temporary() -> Self {
        Self(format!("{TEMPORARY_ID_PREFIX}{}", Uuid::now_v7()))
    }

    /// Whether this id belongs to a locally synthesized entry
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMPORARY_ID_PREFIX)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(Error::Validation("Invalid priority".to_string())),
        }
    }
}

/// A task document as held by the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    /// Opaque date string, displayed as entered
    pub due_date: Option<String>,
    pub priority: Priority,
    pub category: Option<String>,
    pub completed: bool,
    /// Owner of the record; fixed at creation
    pub owner_id: UserId,
    /// Creation timestamp (Unix ms), assigned by the store
    pub created_at: i64,
    /// Last update timestamp (Unix ms), assigned by the store
    pub updated_at: i64,
}

impl Task {
    /// Whether `user` owns this task
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }

    /// Whether this is a locally synthesized optimistic entry
    #[must_use]
    pub fn is_optimistic(&self) -> bool {
        self.id.is_temporary()
    }
}

/// Sort tasks newest first by creation time
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, created_at: i64) -> Task {
        Task {
            id: TaskId::new(id),
            title: format!("Task {id}"),
            description: None,
            due_date: None,
            priority: Priority::Medium,
            category: None,
            completed: false,
            owner_id: UserId::new("user-1"),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_temporary_ids_use_reserved_prefix() {
        let id = TaskId::temporary();
        assert!(id.is_temporary());
        assert!(id.as_str().starts_with("temp-"));
        assert!(!TaskId::generate().is_temporary());
    }

    #[test]
    fn test_generated_ids_unique() {
        assert_ne!(TaskId::generate(), TaskId::generate());
        assert_ne!(TaskId::temporary(), TaskId::temporary());
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert_eq!(" HIGH ".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_sort_newest_first() {
        let mut tasks = vec![task("a", 10), task("b", 30), task("c", 20)];
        sort_newest_first(&mut tasks);
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ownership() {
        let t = task("a", 1);
        assert!(t.is_owned_by(&UserId::new("user-1")));
        assert!(!t.is_owned_by(&UserId::new("user-2")));
    }
}
