use taskflow_core::{ClientConfig, Task};

use crate::commands::common::{format_task_lines, open_controller, task_to_list_item, TaskListItem};
use crate::error::CliError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl StatusFilter {
    pub const fn from_flags(pending: bool, done: bool) -> Self {
        match (pending, done) {
            (true, _) => Self::Pending,
            (false, true) => Self::Done,
            (false, false) => Self::All,
        }
    }

    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Done => task.completed,
        }
    }
}

pub async fn run_list(
    filter: StatusFilter,
    as_json: bool,
    config: &ClientConfig,
) -> Result<Vec<Task>, CliError> {
    let controller = open_controller(config).await?;
    let tasks = controller
        .load_tasks()
        .await?
        .into_iter()
        .filter(|task| filter.matches(task))
        .collect::<Vec<_>>();

    if as_json {
        let json_items = tasks
            .iter()
            .map(task_to_list_item)
            .collect::<Vec<TaskListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if tasks.is_empty() {
        println!("No tasks.");
    } else {
        for line in format_task_lines(&tasks) {
            println!("{line}");
        }
    }

    Ok(tasks)
}
