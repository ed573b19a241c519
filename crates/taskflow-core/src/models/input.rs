//! Task input types and field validation

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::normalize_text_option;

use super::task::{Priority, Task, TaskId, UserId};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const CATEGORY_MAX_CHARS: usize = 50;

/// User-supplied fields for a new task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewTask {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Trim every field, drop empty optionals, and check field constraints.
    pub fn normalized(self) -> Result<Self> {
        let title = validate_title(&self.title)?;
        let description = normalize_text_option(self.description);
        check_max("Description", description.as_deref(), DESCRIPTION_MAX_CHARS)?;
        let category = normalize_text_option(self.category);
        check_max("Category", category.as_deref(), CATEGORY_MAX_CHARS)?;

        Ok(Self {
            title,
            description,
            due_date: normalize_text_option(self.due_date),
            priority: self.priority,
            category,
        })
    }

    /// Build a local placeholder shown until the next reload.
    ///
    /// Expects already-normalized input.
    #[must_use]
    pub fn to_optimistic(&self, owner_id: UserId, now_ms: i64) -> Task {
        Task {
            id: TaskId::temporary(),
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date.clone(),
            priority: self.priority,
            category: self.category.clone(),
            completed: false,
            owner_id,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}

/// Partial update of user-editable fields.
///
/// `None` leaves a field untouched. For optional fields `Some("")` clears
/// the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
}

impl TaskPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.category.is_none()
    }

    /// Trim provided fields and check constraints on the ones present.
    pub fn normalized(self) -> Result<Self> {
        let title = self.title.as_deref().map(validate_title).transpose()?;
        let description = self.description.map(|value| value.trim().to_string());
        check_max("Description", description.as_deref(), DESCRIPTION_MAX_CHARS)?;
        let category = self.category.map(|value| value.trim().to_string());
        check_max("Category", category.as_deref(), CATEGORY_MAX_CHARS)?;

        Ok(Self {
            title,
            description,
            due_date: self.due_date.map(|value| value.trim().to_string()),
            priority: self.priority,
            category,
        })
    }

    /// Apply this patch to a task in place (does not touch timestamps).
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description = normalize_text_option(Some(description.clone()));
        }
        if let Some(due_date) = &self.due_date {
            task.due_date = normalize_text_option(Some(due_date.clone()));
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = &self.category {
            task.category = normalize_text_option(Some(category.clone()));
        }
    }
}

fn validate_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    let length = title.chars().count();
    if length == 0 {
        return Err(Error::Validation("Task name is required".to_string()));
    }
    if length < TITLE_MIN_CHARS {
        return Err(Error::Validation(format!(
            "Task name must be at least {TITLE_MIN_CHARS} characters"
        )));
    }
    if length > TITLE_MAX_CHARS {
        return Err(Error::Validation(format!(
            "Task name cannot exceed {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

fn check_max(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(value) if value.chars().count() > max => Err(Error::Validation(format!(
            "{field} cannot exceed {max} characters"
        ))),
        _ => Ok(()),
    }
}
