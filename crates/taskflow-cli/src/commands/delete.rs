use taskflow_core::ClientConfig;

use crate::commands::common::{confirm_on_terminal, delete_prompt, open_controller, resolve_task};
use crate::error::CliError;

/// Returns whether the task was deleted
pub async fn run_delete(id: &str, skip_confirm: bool, config: &ClientConfig) -> Result<bool, CliError> {
    let controller = open_controller(config).await?;
    let task = resolve_task(&controller, id).await?;

    if !skip_confirm && !confirm_on_terminal(&delete_prompt(&task.title))? {
        println!("Cancelled");
        return Ok(false);
    }

    controller.delete_task(&task.id).await?;
    println!("{}", task.id);
    Ok(true)
}
