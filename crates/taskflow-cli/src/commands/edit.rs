use taskflow_core::{ClientConfig, TaskPatch};

use crate::cli::TaskFields;
use crate::commands::common::{open_controller, resolve_task};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    title: Option<String>,
    fields: TaskFields,
    config: &ClientConfig,
) -> Result<(), CliError> {
    let patch = patch_from(title, fields);
    if patch.is_empty() {
        return Err(CliError::NothingToUpdate);
    }

    let controller = open_controller(config).await?;
    let task = resolve_task(&controller, id).await?;
    controller.update_task(&task.id, patch).await?;

    println!("{}", task.id);
    Ok(())
}

pub fn patch_from(title: Option<String>, fields: TaskFields) -> TaskPatch {
    TaskPatch {
        title,
        description: fields.description,
        due_date: fields.due,
        priority: fields.priority.map(Into::into),
        category: fields.category,
    }
}
