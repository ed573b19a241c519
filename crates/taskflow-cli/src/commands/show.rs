use taskflow_core::ClientConfig;

use crate::commands::common::{
    format_task_details, open_controller, resolve_task, task_to_list_item,
};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, config: &ClientConfig) -> Result<(), CliError> {
    let controller = open_controller(config).await?;
    let resolved = resolve_task(&controller, id).await?;
    let task = controller.get_task(&resolved.id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&task_to_list_item(&task))?);
    } else {
        for line in format_task_details(&task) {
            println!("{line}");
        }
    }
    Ok(())
}
