//! In-process task store

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::StoreError;
use crate::models::{Task, TaskId, UserId};

use super::{MonotonicClock, RemoteTaskStore, StoreResult, TaskChanges, TaskDraft};

/// Task store kept entirely in memory.
///
/// Behaves like the remote document store: ids and timestamps are assigned
/// here, and queries return documents in arbitrary order.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    documents: Mutex<HashMap<TaskId, Task>>,
    clock: MonotonicClock,
}

impl MemoryTaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all owners
    pub fn len(&self) -> usize {
        self.documents().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents().is_empty()
    }

    fn documents(&self) -> MutexGuard<'_, HashMap<TaskId, Task>> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl RemoteTaskStore for MemoryTaskStore {
    async fn get(&self, id: &TaskId) -> StoreResult<Option<Task>> {
        Ok(self.documents().get(id).cloned())
    }

    async fn query(&self, owner_id: &UserId) -> StoreResult<Vec<Task>> {
        Ok(self
            .documents()
            .values()
            .filter(|task| &task.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, draft: TaskDraft) -> StoreResult<Task> {
        let task = draft.into_task(TaskId::generate(), self.clock.now());
        self.documents().insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn update(&self, id: &TaskId, changes: &TaskChanges) -> StoreResult<()> {
        let now = self.clock.now();
        let mut documents = self.documents();
        let task = documents
            .get_mut(id)
            .ok_or_else(|| StoreError::Missing(id.to_string()))?;
        changes.apply_to(task, now);
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> StoreResult<()> {
        self.documents()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::Missing(id.to_string()))
    }
}
