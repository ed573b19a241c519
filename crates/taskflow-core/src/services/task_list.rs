//! Client-visible task list with optimistic mutations.

use std::sync::{Mutex, PoisonError};

use crate::auth::AuthContext;
use crate::error::Result;
use crate::models::{sort_newest_first, NewTask, Task, TaskId, TaskPatch};
use crate::notify::NotificationHook;
use crate::store::RemoteTaskStore;
use crate::util::unix_millis_now;

use super::TaskRepository;

#[derive(Debug)]
struct ListState {
    tasks: Vec<Task>,
    mounted: bool,
    reloads_in_flight: usize,
}

/// Owns the ordered task list shown to the user.
///
/// Mutations are applied to the list first and reconciled once the
/// repository answers:
///
/// - create prepends a placeholder, then always reloads the full list;
/// - toggle and delete restore the list snapshot taken just before their own
///   optimistic change if the repository call fails.
///
/// Overlapping operations are not serialized. A rollback restores the whole
/// snapshot it captured, so it also discards optimistic changes made by other
/// operations that started later. The next reload corrects the list.
///
/// After [`unmount`](Self::unmount), operations still run against the
/// repository and return their result, but never touch the list again.
pub struct TaskListController<S, A, N> {
    repository: TaskRepository<S, A, N>,
    state: Mutex<ListState>,
}

impl<S, A, N> TaskListController<S, A, N>
where
    S: RemoteTaskStore,
    A: AuthContext,
    N: NotificationHook,
{
    pub const fn new(repository: TaskRepository<S, A, N>) -> Self {
        Self {
            repository,
            state: Mutex::new(ListState {
                tasks: Vec::new(),
                mounted: true,
                reloads_in_flight: 0,
            }),
        }
    }

    pub const fn repository(&self) -> &TaskRepository<S, A, N> {
        &self.repository
    }

    /// Copy of the list as currently displayed
    pub fn snapshot(&self) -> Vec<Task> {
        self.with_state(|state| state.tasks.clone())
    }

    /// Whether a full reload is in flight
    pub fn is_loading(&self) -> bool {
        self.with_state(|state| state.reloads_in_flight > 0)
    }

    pub fn is_mounted(&self) -> bool {
        self.with_state(|state| state.mounted)
    }

    /// Detach the list from its view; late completions become no-ops
    pub fn unmount(&self) {
        self.with_state(|state| state.mounted = false);
        tracing::debug!("Task list unmounted");
    }

    /// Replace the list with the user's tasks, newest first
    pub async fn load_tasks(&self) -> Result<Vec<Task>> {
        self.update_if_mounted(|state| state.reloads_in_flight += 1);
        let result = self.repository.list_for_user().await;
        self.update_if_mounted(|state| {
            state.reloads_in_flight = state.reloads_in_flight.saturating_sub(1);
        });

        let mut tasks = result.inspect_err(|error| {
            tracing::warn!("Failed to load tasks: {error}");
        })?;
        sort_newest_first(&mut tasks);
        self.update_if_mounted(|state| state.tasks.clone_from(&tasks));
        Ok(tasks)
    }

    /// Show a placeholder immediately, create remotely, then reload.
    pub async fn create_task(&self, data: NewTask) -> Result<Task> {
        let owner_id = self.repository.current_user()?;
        let data = data.normalized()?;

        let placeholder = data.to_optimistic(owner_id, unix_millis_now());
        let placeholder_id = placeholder.id.clone();
        self.update_if_mounted(|state| state.tasks.insert(0, placeholder));

        let created = self.repository.create(data).await;
        if let Err(error) = &created {
            tracing::warn!("Failed to create task: {error}");
        }

        if let Err(reload_error) = self.load_tasks().await {
            // Without a reload, settle the placeholder from the create outcome
            tracing::warn!("Reload after create failed: {reload_error}");
            let confirmed = created.as_ref().ok().cloned();
            self.update_if_mounted(|state| {
                settle_placeholder(&mut state.tasks, &placeholder_id, confirmed);
            });
        }

        created
    }

    /// Flip completion immediately; roll back to the prior list on failure.
    pub async fn toggle_task(&self, id: &TaskId) -> Result<bool> {
        let snapshot = self.update_if_mounted(|state| {
            let snapshot = state.tasks.clone();
            if let Some(task) = state.tasks.iter_mut().find(|task| &task.id == id) {
                task.completed = !task.completed;
            }
            snapshot
        });

        match self.repository.toggle_complete(id).await {
            Ok(completed) => {
                self.update_if_mounted(|state| {
                    if let Some(task) = state.tasks.iter_mut().find(|task| &task.id == id) {
                        task.completed = completed;
                    }
                });
                Ok(completed)
            }
            Err(error) => {
                tracing::warn!("Failed to toggle task {id}, rolling back: {error}");
                self.restore(snapshot);
                Err(error)
            }
        }
    }

    /// Remove the row immediately; roll back to the prior list on failure.
    pub async fn delete_task(&self, id: &TaskId) -> Result<()> {
        let snapshot = self.update_if_mounted(|state| {
            let snapshot = state.tasks.clone();
            state.tasks.retain(|task| &task.id != id);
            snapshot
        });

        match self.repository.delete(id).await {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!("Failed to delete task {id}, rolling back: {error}");
                self.restore(snapshot);
                Err(error)
            }
        }
    }

    /// Update remotely, then refresh the row from the confirmed record
    pub async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<()> {
        self.repository.update(id, patch).await?;

        match self.repository.get(id).await {
            Ok(confirmed) => {
                self.update_if_mounted(|state| {
                    if let Some(task) = state.tasks.iter_mut().find(|task| task.id == confirmed.id) {
                        *task = confirmed;
                    }
                });
            }
            Err(error) => tracing::warn!("Updated task {id} but could not refresh it: {error}"),
        }
        Ok(())
    }

    pub async fn get_task(&self, id: &TaskId) -> Result<Task> {
        self.repository.get(id).await
    }

    fn restore(&self, snapshot: Option<Vec<Task>>) {
        if let Some(snapshot) = snapshot {
            self.update_if_mounted(|state| state.tasks = snapshot);
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ListState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn update_if_mounted<R>(&self, f: impl FnOnce(&mut ListState) -> R) -> Option<R> {
        self.with_state(|state| state.mounted.then(|| f(state)))
    }
}

fn settle_placeholder(tasks: &mut Vec<Task>, placeholder_id: &TaskId, confirmed: Option<Task>) {
    let Some(index) = tasks.iter().position(|task| &task.id == placeholder_id) else {
        return;
    };
    match confirmed {
        Some(task) => tasks[index] = task,
        None => {
            tasks.remove(index);
        }
    }
}
