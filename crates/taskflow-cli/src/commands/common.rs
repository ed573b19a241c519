use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use taskflow_core::db::{Database, LibSqlTaskStore};
use taskflow_core::notify::{NotificationHook, NotifyResult};
use taskflow_core::{
    ClientConfig, Notice, StaticAuth, Task, TaskId, TaskListController, TaskRepository,
};

use crate::error::CliError;

pub type Controller = TaskListController<LibSqlTaskStore, StaticAuth, ConsoleNotifier>;

/// Prints task notices to stderr so stdout stays machine readable
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl NotificationHook for ConsoleNotifier {
    async fn notify_created(&self, title: &str) -> NotifyResult {
        print_notice(&Notice::created(title));
        Ok(())
    }

    async fn notify_toggled(&self, title: &str, completed: bool) -> NotifyResult {
        print_notice(&Notice::toggled(title, completed));
        Ok(())
    }
}

fn print_notice(notice: &Notice) {
    eprintln!("{}  {}", notice.title, notice.body);
}

#[derive(Debug, Serialize)]
pub struct TaskListItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: String,
    pub category: Option<String>,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub relative_time: String,
}

/// Config file, then environment, then command-line flags
pub fn resolve_config(
    config_path: Option<&Path>,
    db_path: Option<PathBuf>,
    user: Option<String>,
) -> Result<ClientConfig, CliError> {
    resolve_config_with(config_path, db_path, user, |key| std::env::var(key).ok())
}

pub fn resolve_config_with(
    config_path: Option<&Path>,
    db_path: Option<PathBuf>,
    user: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, CliError> {
    let base = match config_path {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::default(),
    };

    let mut config = base.with_overrides_from(lookup);
    if db_path.is_some() {
        config.db_path = db_path;
    }
    if user.is_some() {
        config.user_id = user;
    }
    Ok(config.normalized()?)
}

pub async fn open_store(config: &ClientConfig) -> Result<LibSqlTaskStore, CliError> {
    let path = config.resolved_db_path().ok_or_else(|| {
        CliError::Config("Could not determine a data directory; pass --db-path".to_string())
    })?;

    let database = match config.remote_config() {
        Some(remote) => {
            tracing::debug!("Opening replica at {}", path.display());
            Database::open_replica(&path, remote).await
        }
        None => Database::open(&path).await,
    }
    .map_err(|error| CliError::DatabaseInit(error.to_string()))?;

    Ok(LibSqlTaskStore::new(database))
}

pub async fn open_controller(config: &ClientConfig) -> Result<Controller, CliError> {
    let user = config.user_id.clone().ok_or(CliError::NoUser)?;
    let store = open_store(config).await?;
    let repository = TaskRepository::new(store, StaticAuth::signed_in(user), ConsoleNotifier);
    Ok(TaskListController::new(repository))
}

/// Loads the list and resolves `query` as a full id or unique id prefix
pub async fn resolve_task(controller: &Controller, query: &str) -> Result<Task, CliError> {
    let query = normalize_task_identifier(query)?;
    let tasks = controller.load_tasks().await?;
    let id = resolve_task_id(&tasks, &query)?;
    tasks
        .into_iter()
        .find(|task| task.id == id)
        .ok_or(CliError::TaskNotFound(query))
}

pub fn resolve_task_id(tasks: &[Task], query: &str) -> Result<TaskId, CliError> {
    if let Some(task) = tasks.iter().find(|task| task.id.as_str() == query) {
        return Ok(task.id.clone());
    }

    let matching: Vec<&TaskId> = tasks
        .iter()
        .map(|task| &task.id)
        .filter(|id| id.as_str().starts_with(query))
        .collect();

    match matching.as_slice() {
        [] => Err(CliError::TaskNotFound(query.to_string())),
        [id] => Ok((*id).clone()),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|id| short_id(id))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousTaskId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn normalize_task_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTaskId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn short_id(id: &TaskId) -> String {
    id.as_str().chars().take(13).collect()
}

pub fn format_task_lines(tasks: &[Task]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    tasks
        .iter()
        .map(|task| {
            let short_id = short_id(&task.id);
            let check = if task.completed { "[x]" } else { "[ ]" };
            let title = truncate(&task.title, 40);
            let relative_time = format_relative_time(task.created_at, now_ms);
            let mut line = format!(
                "{short_id:<13}  {check} {title:<40}  {:<6}  {relative_time}",
                task.priority
            );
            if let Some(due) = &task.due_date {
                line.push_str(&format!("  due {due}"));
            }
            if let Some(category) = &task.category {
                line.push_str(&format!("  #{category}"));
            }
            line
        })
        .collect()
}

pub fn format_task_details(task: &Task) -> Vec<String> {
    let mut lines = vec![
        format!("ID:        {}", task.id),
        format!("Title:     {}", task.title),
        format!(
            "Status:    {}",
            if task.completed { "completed" } else { "pending" }
        ),
        format!("Priority:  {}", task.priority),
    ];
    if let Some(due) = &task.due_date {
        lines.push(format!("Due:       {due}"));
    }
    if let Some(category) = &task.category {
        lines.push(format!("Category:  {category}"));
    }
    lines.push(format!("Created:   {}", format_timestamp(task.created_at)));
    lines.push(format!("Updated:   {}", format_timestamp(task.updated_at)));
    if let Some(description) = &task.description {
        lines.push(String::new());
        lines.push(description.clone());
    }
    lines
}

pub fn task_to_list_item(task: &Task) -> TaskListItem {
    let now_ms = Utc::now().timestamp_millis();
    TaskListItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        due_date: task.due_date.clone(),
        priority: task.priority.to_string(),
        category: task.category.clone(),
        completed: task.completed,
        created_at: task.created_at,
        updated_at: task.updated_at,
        relative_time: format_relative_time(task.created_at, now_ms),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut truncated = text
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < year {
        format!("{}w ago", diff / week)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn delete_prompt(title: &str) -> String {
    format!("Are you sure you want to delete \"{title}\"? This action cannot be undone.")
}

/// Ask a yes/no question; anything but `y`/`yes` declines
pub fn confirm(
    prompt: &str,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<bool, CliError> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

pub fn confirm_on_terminal(prompt: &str) -> Result<bool, CliError> {
    confirm(prompt, io::stdin().lock(), io::stderr())
}
