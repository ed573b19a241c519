//! libSQL-backed task store

use libsql::params::Params;
use libsql::{params, Row, Value};

use crate::error::StoreError;
use crate::models::{Priority, Task, TaskId, UserId};
use crate::store::{MonotonicClock, RemoteTaskStore, StoreResult, TaskChanges, TaskDraft};

use super::Database;

const TASK_COLUMNS: &str = "id, owner_id, title, description, due_date, priority, category, completed, created_at, updated_at";

/// Task store persisted in a libSQL database (local file or Turso replica)
pub struct LibSqlTaskStore {
    db: Database,
    clock: MonotonicClock,
}

impl LibSqlTaskStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            clock: MonotonicClock::new(),
        }
    }

    /// In-memory database, mostly for tests
    pub async fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(Database::open_in_memory().await?))
    }

    /// Pull remote changes when running as a replica
    pub async fn sync(&self) -> StoreResult<()> {
        self.db.sync().await
    }

    pub const fn database(&self) -> &Database {
        &self.db
    }

    fn parse_task(row: &Row) -> StoreResult<Task> {
        let priority: String = row.get(5)?;
        Ok(Task {
            id: TaskId::new(row.get::<String>(0)?),
            owner_id: UserId::new(row.get::<String>(1)?),
            title: row.get(2)?,
            description: optional_text(row, 3)?,
            due_date: optional_text(row, 4)?,
            priority: priority.parse().unwrap_or_default(),
            category: optional_text(row, 6)?,
            completed: row.get::<i64>(7)? != 0,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

fn optional_text(row: &Row, idx: i32) -> StoreResult<Option<String>> {
    match row.get_value(idx)? {
        Value::Null => Ok(None),
        Value::Text(text) => Ok(Some(text)),
        other => Err(StoreError::Database(format!(
            "unexpected value in column {idx}: {other:?}"
        ))),
    }
}

fn text_or_null(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::Text(text.to_string()))
}

impl RemoteTaskStore for LibSqlTaskStore {
    async fn get(&self, id: &TaskId) -> StoreResult<Option<Task>> {
        let mut rows = self
            .db
            .connection()
            .query(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_task(&row)?)),
            None => Ok(None),
        }
    }

    async fn query(&self, owner_id: &UserId) -> StoreResult<Vec<Task>> {
        let mut rows = self
            .db
            .connection()
            .query(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = ?1"),
                params![owner_id.as_str()],
            )
            .await?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(Self::parse_task(&row)?);
        }
        Ok(tasks)
    }

    async fn insert(&self, draft: TaskDraft) -> StoreResult<Task> {
        let task = draft.into_task(TaskId::generate(), self.clock.now());

        self.db
            .connection()
            .execute(
                &format!(
                    "INSERT INTO tasks ({TASK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                Params::Positional(vec![
                    Value::Text(task.id.to_string()),
                    Value::Text(task.owner_id.to_string()),
                    Value::Text(task.title.clone()),
                    text_or_null(task.description.as_deref()),
                    text_or_null(task.due_date.as_deref()),
                    Value::Text(task.priority.to_string()),
                    text_or_null(task.category.as_deref()),
                    Value::Integer(i64::from(task.completed)),
                    Value::Integer(task.created_at),
                    Value::Integer(task.updated_at),
                ]),
            )
            .await?;

        tracing::debug!("Inserted task {} for {}", task.id, task.owner_id);
        Ok(task)
    }

    async fn update(&self, id: &TaskId, changes: &TaskChanges) -> StoreResult<()> {
        let mut task = self
            .get(id)
            .await?
            .ok_or_else(|| StoreError::Missing(id.to_string()))?;
        changes.apply_to(&mut task, self.clock.now());

        let rows = self
            .db
            .connection()
            .execute(
                "UPDATE tasks
                 SET title = ?1, description = ?2, due_date = ?3, priority = ?4,
                     category = ?5, completed = ?6, updated_at = ?7
                 WHERE id = ?8",
                Params::Positional(vec![
                    Value::Text(task.title.clone()),
                    text_or_null(task.description.as_deref()),
                    text_or_null(task.due_date.as_deref()),
                    Value::Text(task.priority.to_string()),
                    text_or_null(task.category.as_deref()),
                    Value::Integer(i64::from(task.completed)),
                    Value::Integer(task.updated_at),
                    Value::Text(task.id.to_string()),
                ]),
            )
            .await?;

        if rows == 0 {
            return Err(StoreError::Missing(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> StoreResult<()> {
        let rows = self
            .db
            .connection()
            .execute("DELETE FROM tasks WHERE id = ?1", params![id.as_str()])
            .await?;

        if rows == 0 {
            return Err(StoreError::Missing(id.to_string()));
        }
        Ok(())
    }
}
