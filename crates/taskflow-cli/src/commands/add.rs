use taskflow_core::{ClientConfig, NewTask, Task};

use crate::cli::TaskFields;
use crate::commands::common::open_controller;
use crate::error::CliError;

pub async fn run_add(
    title_parts: &[String],
    fields: TaskFields,
    config: &ClientConfig,
) -> Result<Task, CliError> {
    let data = new_task_from(title_parts, fields);

    let controller = open_controller(config).await?;
    let task = controller.create_task(data).await?;

    println!("{}", task.id);
    Ok(task)
}

pub fn new_task_from(title_parts: &[String], fields: TaskFields) -> NewTask {
    let mut data = NewTask::new(title_parts.join(" "));
    data.description = fields.description;
    data.due_date = fields.due;
    data.category = fields.category;
    if let Some(priority) = fields.priority {
        data.priority = priority.into();
    }
    data
}
