//! Scriptable collaborators for unit tests

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;

use crate::error::{NotifyError, StoreError};
use crate::models::{Task, TaskId, UserId};
use crate::notify::{NotificationHook, NotifyResult};
use crate::store::{MemoryTaskStore, RemoteTaskStore, StoreResult, TaskChanges, TaskDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    Query,
    Insert,
    Update,
    Delete,
}

/// In-memory store whose operations can be made to fail or to suspend
#[derive(Debug, Default)]
pub struct ScriptedStore {
    inner: MemoryTaskStore,
    failing: Mutex<HashSet<StoreOp>>,
    gates: Mutex<HashMap<StoreOp, Arc<Notify>>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryTaskStore {
        &self.inner
    }

    /// Make every subsequent `op` fail with a transport error
    pub fn fail(&self, op: StoreOp) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(op);
    }

    pub fn heal(&self, op: StoreOp) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&op);
    }

    /// Suspend every subsequent `op` until the returned handle is notified
    pub fn gate(&self, op: StoreOp) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(op, Arc::clone(&notify));
        notify
    }

    async fn enter(&self, op: StoreOp) -> StoreResult<()> {
        let gate = self
            .gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&op)
            .cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let failing = self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&op);
        if failing {
            return Err(StoreError::Database(format!("simulated {op:?} outage")));
        }
        Ok(())
    }
}

impl RemoteTaskStore for ScriptedStore {
    async fn get(&self, id: &TaskId) -> StoreResult<Option<Task>> {
        self.enter(StoreOp::Get).await?;
        self.inner.get(id).await
    }

    async fn query(&self, owner_id: &UserId) -> StoreResult<Vec<Task>> {
        self.enter(StoreOp::Query).await?;
        self.inner.query(owner_id).await
    }

    async fn insert(&self, draft: TaskDraft) -> StoreResult<Task> {
        self.enter(StoreOp::Insert).await?;
        self.inner.insert(draft).await
    }

    async fn update(&self, id: &TaskId, changes: &TaskChanges) -> StoreResult<()> {
        self.enter(StoreOp::Update).await?;
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: &TaskId) -> StoreResult<()> {
        self.enter(StoreOp::Delete).await?;
        self.inner.delete(id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Created(String),
    Toggled(String, bool),
}

/// Notification hook that records every call and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<Recorded>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.failing.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: Recorded) -> NotifyResult {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        if self.failing.load(Ordering::SeqCst) {
            Err(NotifyError("notification channel unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl NotificationHook for RecordingNotifier {
    async fn notify_created(&self, title: &str) -> NotifyResult {
        self.record(Recorded::Created(title.to_string()))
    }

    async fn notify_toggled(&self, title: &str, completed: bool) -> NotifyResult {
        self.record(Recorded::Toggled(title.to_string(), completed))
    }
}

/// Poll a future exactly once; `None` if it is still pending.
///
/// The future stays usable afterwards, so a test can drive an operation to
/// its first suspension point, do something else, then resume it.
pub async fn poll_once<F: Future + Unpin>(future: &mut F) -> Option<F::Output> {
    tokio::time::timeout(Duration::ZERO, future).await.ok()
}
