//! Task repository: the only component that talks to the remote store.

use crate::auth::AuthContext;
use crate::error::{Error, Result};
use crate::models::{NewTask, Task, TaskId, TaskPatch, UserId};
use crate::notify::NotificationHook;
use crate::store::{RemoteTaskStore, TaskChanges, TaskDraft};

/// Translates task intents into store calls and enforces ownership.
///
/// Every mutation of an existing record reads it first and checks the owner
/// against the auth context; client-held copies of `owner_id` are never
/// trusted. All store failures come back as [`Error`] values.
pub struct TaskRepository<S, A, N> {
    store: S,
    auth: A,
    notifier: N,
}

impl<S, A, N> TaskRepository<S, A, N>
where
    S: RemoteTaskStore,
    A: AuthContext,
    N: NotificationHook,
{
    pub const fn new(store: S, auth: A, notifier: N) -> Self {
        Self {
            store,
            auth,
            notifier,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The signed-in user, or `Unauthenticated`
    pub fn current_user(&self) -> Result<UserId> {
        self.auth.current_user_id().ok_or(Error::Unauthenticated)
    }

    /// Create a task owned by the current user
    pub async fn create(&self, data: NewTask) -> Result<Task> {
        let owner_id = self.current_user()?;
        let data = data.normalized()?;

        let draft = TaskDraft {
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            priority: data.priority,
            category: data.category,
            owner_id,
        };
        let task = self.store.insert(draft).await?;
        tracing::info!("Created task {}", task.id);

        if let Err(error) = self.notifier.notify_created(&task.title).await {
            tracing::warn!("Created-notification for {} failed: {}", task.id, error);
        }

        Ok(task)
    }

    /// All tasks of the current user, unordered
    pub async fn list_for_user(&self) -> Result<Vec<Task>> {
        let owner_id = self.current_user()?;
        let tasks = self.store.query(&owner_id).await?;
        tracing::debug!("Fetched {} tasks for {}", tasks.len(), owner_id);
        Ok(tasks)
    }

    pub async fn get(&self, id: &TaskId) -> Result<Task> {
        let user = self.current_user()?;
        self.fetch_owned(id, &user).await
    }

    /// Apply a partial update after an ownership check
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<()> {
        let user = self.current_user()?;
        let patch = patch.normalized()?;
        self.fetch_owned(id, &user).await?;

        self.store
            .update(id, &TaskChanges::fields(patch))
            .await?;
        tracing::info!("Updated task {id}");
        Ok(())
    }

    /// Flip `completed` and return the new value
    pub async fn toggle_complete(&self, id: &TaskId) -> Result<bool> {
        let user = self.current_user()?;
        let task = self.fetch_owned(id, &user).await?;

        let completed = !task.completed;
        self.store
            .update(id, &TaskChanges::completed(completed))
            .await?;
        tracing::info!("Task {id} marked {}", if completed { "completed" } else { "open" });

        if let Err(error) = self.notifier.notify_toggled(&task.title, completed).await {
            tracing::warn!("Toggle-notification for {id} failed: {error}");
        }

        Ok(completed)
    }

    /// Remove a task permanently after an ownership check
    pub async fn delete(&self, id: &TaskId) -> Result<()> {
        let user = self.current_user()?;
        self.fetch_owned(id, &user).await?;

        self.store.delete(id).await?;
        tracing::info!("Deleted task {id}");
        Ok(())
    }

    async fn fetch_owned(&self, id: &TaskId, user: &UserId) -> Result<Task> {
        let task = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if !task.is_owned_by(user) {
            tracing::warn!("User {user} attempted to access task {id} owned by someone else");
            return Err(Error::Unauthorized);
        }
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::StaticAuth;
    use crate::models::Priority;
    use crate::store::MemoryTaskStore;
    use crate::test_support::{Recorded, RecordingNotifier, ScriptedStore, StoreOp};

    type Repo<S> = TaskRepository<Arc<S>, StaticAuth, Arc<RecordingNotifier>>;

    fn repo_for<S: RemoteTaskStore>(
        store: &Arc<S>,
        user: &str,
        notifier: &Arc<RecordingNotifier>,
    ) -> Repo<S> {
        TaskRepository::new(
            Arc::clone(store),
            StaticAuth::signed_in(user),
            Arc::clone(notifier),
        )
    }

    fn buy_milk() -> NewTask {
        NewTask::new("Buy milk").with_priority(Priority::Low)
    }

    #[tokio::test]
    async fn test_create_sets_owner_and_defaults() {
        let store = Arc::new(MemoryTaskStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let repo = repo_for(&store, "alice", &notifier);

        let task = repo.create(buy_milk()).await.unwrap();
        assert_eq!(task.owner_id, UserId::new("alice"));
        assert!(!task.completed);
        assert!(!task.id.is_temporary());
        assert_eq!(
            notifier.calls(),
            vec![Recorded::Created("Buy milk".to_string())]
        );
    }

    #[tokio::test]
    async fn test_signed_out_user_is_rejected_everywhere() {
        let store = Arc::new(MemoryTaskStore::new());
        let repo = TaskRepository::new(
            Arc::clone(&store),
            StaticAuth::signed_out(),
            Arc::new(RecordingNotifier::new()),
        );
        let id = TaskId::new("anything");

        assert_eq!(repo.create(buy_milk()).await, Err(Error::Unauthenticated));
        assert_eq!(repo.list_for_user().await, Err(Error::Unauthenticated));
        assert_eq!(repo.get(&id).await, Err(Error::Unauthenticated));
        assert_eq!(repo.toggle_complete(&id).await, Err(Error::Unauthenticated));
        assert_eq!(
            repo.update(&id, TaskPatch::default()).await,
            Err(Error::Unauthenticated)
        );
        assert_eq!(repo.delete(&id).await, Err(Error::Unauthenticated));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_validation_happens_before_store_call() {
        let store = Arc::new(MemoryTaskStore::new());
        let repo = repo_for(&store, "alice", &Arc::new(RecordingNotifier::new()));

        let result = repo.create(NewTask::new("no")).await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_only_returns_own_tasks() {
        let store = Arc::new(MemoryTaskStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let alice = repo_for(&store, "alice", &notifier);
        let bob = repo_for(&store, "bob", &notifier);

        alice.create(buy_milk()).await.unwrap();
        alice.create(NewTask::new("Walk dog")).await.unwrap();
        bob.create(NewTask::new("Pay rent")).await.unwrap();

        assert_eq!(alice.list_for_user().await.unwrap().len(), 2);
        assert_eq!(bob.list_for_user().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_original_state() {
        let store = Arc::new(MemoryTaskStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let repo = repo_for(&store, "alice", &notifier);
        let task = repo.create(buy_milk()).await.unwrap();

        assert!(repo.toggle_complete(&task.id).await.unwrap());
        assert!(!repo.toggle_complete(&task.id).await.unwrap());
        assert!(!repo.get(&task.id).await.unwrap().completed);
        assert_eq!(
            notifier.calls()[1..],
            [
                Recorded::Toggled("Buy milk".to_string(), true),
                Recorded::Toggled("Buy milk".to_string(), false),
            ]
        );
    }

    #[tokio::test]
    async fn test_foreign_tasks_are_unauthorized_and_untouched() {
        let store = Arc::new(MemoryTaskStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let alice = repo_for(&store, "alice", &notifier);
        let mallory = repo_for(&store, "mallory", &notifier);

        let task = alice.create(buy_milk()).await.unwrap();
        let patch = TaskPatch {
            title: Some("Hijacked".to_string()),
            ..TaskPatch::default()
        };

        assert_eq!(mallory.get(&task.id).await, Err(Error::Unauthorized));
        assert_eq!(mallory.update(&task.id, patch).await, Err(Error::Unauthorized));
        assert_eq!(mallory.toggle_complete(&task.id).await, Err(Error::Unauthorized));
        assert_eq!(mallory.delete(&task.id).await, Err(Error::Unauthorized));

        let stored = alice.get(&task.id).await.unwrap();
        assert_eq!(stored, task);
    }

    #[tokio::test]
    async fn test_missing_task_is_not_found() {
        let store = Arc::new(MemoryTaskStore::new());
        let repo = repo_for(&store, "alice", &Arc::new(RecordingNotifier::new()));
        let id = TaskId::new("ghost");

        assert_eq!(repo.get(&id).await, Err(Error::NotFound("ghost".to_string())));
        assert_eq!(repo.toggle_complete(&id).await, Err(Error::NotFound("ghost".to_string())));
        assert_eq!(repo.delete(&id).await, Err(Error::NotFound("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_update_applies_patch_and_refreshes_timestamp() {
        let store = Arc::new(MemoryTaskStore::new());
        let repo = repo_for(&store, "alice", &Arc::new(RecordingNotifier::new()));
        let task = repo.create(buy_milk()).await.unwrap();

        let patch = TaskPatch {
            title: Some("  Buy oat milk ".to_string()),
            category: Some("errands".to_string()),
            ..TaskPatch::default()
        };
        repo.update(&task.id, patch).await.unwrap();

        let updated = repo.get(&task.id).await.unwrap();
        assert_eq!(updated.title, "Buy oat milk");
        assert_eq!(updated.category.as_deref(), Some("errands"));
        assert_eq!(updated.owner_id, task.owner_id);
        assert!(updated.updated_at > task.updated_at);
    }

    #[tokio::test]
    async fn test_notification_failures_are_swallowed() {
        let store = Arc::new(MemoryTaskStore::new());
        let notifier = Arc::new(RecordingNotifier::failing());
        let repo = repo_for(&store, "alice", &notifier);

        let task = repo.create(buy_milk()).await.unwrap();
        assert!(repo.toggle_complete(&task.id).await.unwrap());
        assert_eq!(notifier.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failures_are_normalized() {
        let store = Arc::new(ScriptedStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let repo = repo_for(&store, "alice", &notifier);
        let task = repo.create(buy_milk()).await.unwrap();

        store.fail(StoreOp::Update);
        let result = repo.toggle_complete(&task.id).await;
        assert!(matches!(result, Err(Error::Transport(_))));
        assert_eq!(notifier.calls().len(), 1, "no toggle notice after a failed write");

        store.fail(StoreOp::Query);
        assert!(matches!(repo.list_for_user().await, Err(Error::Transport(_))));
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let store = Arc::new(MemoryTaskStore::new());
        let repo = repo_for(&store, "alice", &Arc::new(RecordingNotifier::new()));
        let task = repo.create(buy_milk()).await.unwrap();

        repo.delete(&task.id).await.unwrap();
        assert_eq!(
            repo.delete(&task.id).await,
            Err(Error::NotFound(task.id.to_string()))
        );
        assert!(store.is_empty());
    }
}
