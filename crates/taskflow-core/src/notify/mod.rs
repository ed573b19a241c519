//! Notification hook seam.
//!
//! Invoked only after a write already succeeded. Failures are reported back
//! to the caller so they can be logged, but they never change the outcome of
//! the task mutation.

use std::sync::Arc;

use crate::error::NotifyError;

/// Result type for notification hooks
pub type NotifyResult = std::result::Result<(), NotifyError>;

/// Side channel fired after successful create/toggle writes
#[allow(async_fn_in_trait)]
pub trait NotificationHook {
    async fn notify_created(&self, title: &str) -> NotifyResult;

    async fn notify_toggled(&self, title: &str, completed: bool) -> NotifyResult;
}

impl<T: NotificationHook> NotificationHook for Arc<T> {
    async fn notify_created(&self, title: &str) -> NotifyResult {
        (**self).notify_created(title).await
    }

    async fn notify_toggled(&self, title: &str, completed: bool) -> NotifyResult {
        (**self).notify_toggled(title, completed).await
    }
}

/// User-facing notification text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

impl Notice {
    #[must_use]
    pub fn created(task_title: &str) -> Self {
        Self {
            title: "Task Created! ✅".to_string(),
            body: format!("\"{}\" has been added to your tasks", display_title(task_title)),
        }
    }

    #[must_use]
    pub fn toggled(task_title: &str, completed: bool) -> Self {
        let task_title = display_title(task_title);
        if completed {
            Self {
                title: "Task Completed! 🎉".to_string(),
                body: format!("Great job! \"{task_title}\" is now completed"),
            }
        } else {
            Self {
                title: "Task Reopened".to_string(),
                body: format!("\"{task_title}\" has been reopened"),
            }
        }
    }
}

fn display_title(title: &str) -> &str {
    if title.trim().is_empty() {
        "Task"
    } else {
        title
    }
}

/// Emits notices through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationHook for TracingNotifier {
    async fn notify_created(&self, title: &str) -> NotifyResult {
        let notice = Notice::created(title);
        tracing::info!(target: "taskflow::notice", "{}: {}", notice.title, notice.body);
        Ok(())
    }

    async fn notify_toggled(&self, title: &str, completed: bool) -> NotifyResult {
        let notice = Notice::toggled(title, completed);
        tracing::info!(target: "taskflow::notice", "{}: {}", notice.title, notice.body);
        Ok(())
    }
}

/// Discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl NotificationHook for NoopNotifier {
    async fn notify_created(&self, _title: &str) -> NotifyResult {
        Ok(())
    }

    async fn notify_toggled(&self, _title: &str, _completed: bool) -> NotifyResult {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_notice_quotes_title() {
        let notice = Notice::created("Buy milk");
        assert_eq!(notice.title, "Task Created! ✅");
        assert_eq!(notice.body, "\"Buy milk\" has been added to your tasks");
    }

    #[test]
    fn toggled_notice_depends_on_new_state() {
        assert_eq!(Notice::toggled("Buy milk", true).title, "Task Completed! 🎉");
        let reopened = Notice::toggled("Buy milk", false);
        assert_eq!(reopened.title, "Task Reopened");
        assert_eq!(reopened.body, "\"Buy milk\" has been reopened");
    }

    #[test]
    fn blank_title_falls_back() {
        assert_eq!(
            Notice::toggled("  ", true).body,
            "Great job! \"Task\" is now completed"
        );
    }

    #[tokio::test]
    async fn builtin_notifiers_never_fail() {
        assert!(TracingNotifier.notify_created("Buy milk").await.is_ok());
        assert!(NoopNotifier.notify_toggled("Buy milk", true).await.is_ok());
    }
}
