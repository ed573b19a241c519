//! Remote task store seam.
//!
//! The store is the authoritative document collection. It assigns ids and
//! timestamps; it performs no authorization, which is the repository's job.

mod clock;
mod memory;

use std::sync::Arc;

use crate::error::StoreError;
use crate::models::{Priority, Task, TaskId, TaskPatch, UserId};

pub use clock::MonotonicClock;
pub use memory::MemoryTaskStore;

/// Result type for store backends
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Document to insert; the store fills in id, completion and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub category: Option<String>,
    pub owner_id: UserId,
}

impl TaskDraft {
    /// Materialize the stored document with server-assigned fields
    #[must_use]
    pub fn into_task(self, id: TaskId, now_ms: i64) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
            category: self.category,
            completed: false,
            owner_id: self.owner_id,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}

/// Partial write against a stored document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub fields: TaskPatch,
    pub completed: Option<bool>,
}

impl TaskChanges {
    #[must_use]
    pub const fn fields(fields: TaskPatch) -> Self {
        Self {
            fields,
            completed: None,
        }
    }

    #[must_use]
    pub fn completed(completed: bool) -> Self {
        Self {
            fields: TaskPatch::default(),
            completed: Some(completed),
        }
    }

    /// Apply the changes and stamp `updated_at`
    pub fn apply_to(&self, task: &mut Task, now_ms: i64) {
        self.fields.apply_to(task);
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        task.updated_at = now_ms;
    }
}

/// Document database of tasks keyed by id
#[allow(async_fn_in_trait)]
pub trait RemoteTaskStore {
    /// Fetch a document; `Ok(None)` when it does not exist
    async fn get(&self, id: &TaskId) -> StoreResult<Option<Task>>;

    /// All documents owned by `owner_id`, in no particular order
    async fn query(&self, owner_id: &UserId) -> StoreResult<Vec<Task>>;

    /// Insert a new document and return it as stored
    async fn insert(&self, draft: TaskDraft) -> StoreResult<Task>;

    /// Apply a partial update; `StoreError::Missing` when absent
    async fn update(&self, id: &TaskId, changes: &TaskChanges) -> StoreResult<()>;

    /// Remove a document permanently; `StoreError::Missing` when absent
    async fn delete(&self, id: &TaskId) -> StoreResult<()>;
}

impl<T: RemoteTaskStore> RemoteTaskStore for Arc<T> {
    async fn get(&self, id: &TaskId) -> StoreResult<Option<Task>> {
        (**self).get(id).await
    }

    async fn query(&self, owner_id: &UserId) -> StoreResult<Vec<Task>> {
        (**self).query(owner_id).await
    }

    async fn insert(&self, draft: TaskDraft) -> StoreResult<Task> {
        (**self).insert(draft).await
    }

    async fn update(&self, id: &TaskId, changes: &TaskChanges) -> StoreResult<()> {
        (**self).update(id, changes).await
    }

    async fn delete(&self, id: &TaskId) -> StoreResult<()> {
        (**self).delete(id).await
    }
}
