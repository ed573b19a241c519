use taskflow_core::ClientConfig;

use crate::commands::common::{open_controller, resolve_task};
use crate::error::CliError;

pub async fn run_toggle(id: &str, config: &ClientConfig) -> Result<bool, CliError> {
    let controller = open_controller(config).await?;
    let task = resolve_task(&controller, id).await?;
    let completed = controller.toggle_task(&task.id).await?;

    println!(
        "{}  {}",
        task.id,
        if completed { "completed" } else { "reopened" }
    );
    Ok(completed)
}
