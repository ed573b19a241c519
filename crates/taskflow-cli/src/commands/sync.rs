use taskflow_core::ClientConfig;

use crate::commands::common::open_store;
use crate::error::CliError;

pub async fn run_sync(config: &ClientConfig) -> Result<(), CliError> {
    if config.remote_config().is_none() {
        return Err(CliError::SyncNotConfigured);
    }

    let store = open_store(config).await?;
    if !store.database().is_sync_enabled() {
        return Err(CliError::SyncNotConfigured);
    }

    store.sync().await?;
    println!("Sync completed");
    Ok(())
}
