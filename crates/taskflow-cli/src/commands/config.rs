use std::path::{Path, PathBuf};

use taskflow_core::ClientConfig;

use crate::cli::{ConfigCommands, ConfigKey};
use crate::commands::common::resolve_config;
use crate::error::CliError;

const REDACTED: &str = "********";

pub fn run_config(
    command: ConfigCommands,
    config_path: Option<&Path>,
    db_path: Option<PathBuf>,
    user: Option<String>,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            let config = resolve_config(config_path, db_path, user)?;
            println!("{}", serde_json::to_string_pretty(&redacted(config))?);
        }
        ConfigCommands::Path => {
            let path = require_path(config_path)?;
            println!("{}", path.display());
        }
        ConfigCommands::Set { key, value } => {
            let path = require_path(config_path)?;
            set_config_value(path, key, &value)?;
            println!("Updated {}", key_name(key));
        }
    }
    Ok(())
}

/// Persist one key in the config file, leaving the rest untouched
pub fn set_config_value(path: &Path, key: ConfigKey, value: &str) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::load_from(path)?;
    apply_config_value(&mut config, key, value)?;
    config.save_to(path)?;
    tracing::debug!("Set {} in {}", key_name(key), path.display());
    Ok(config)
}

/// An empty value unsets optional keys
pub fn apply_config_value(
    config: &mut ClientConfig,
    key: ConfigKey,
    value: &str,
) -> Result<(), CliError> {
    let value = value.trim();
    let text = || (!value.is_empty()).then(|| value.to_string());

    match key {
        ConfigKey::User => config.user_id = text(),
        ConfigKey::DbPath => config.db_path = text().map(PathBuf::from),
        ConfigKey::RemoteUrl => config.remote.url = text(),
        ConfigKey::AuthToken => config.remote.auth_token = text(),
        ConfigKey::SyncInterval => {
            config.remote.sync_interval_secs = match text() {
                Some(raw) => Some(raw.parse().map_err(|_| {
                    CliError::Config(format!(
                        "Invalid sync interval '{raw}'; expected whole seconds"
                    ))
                })?),
                None => None,
            };
        }
        ConfigKey::SwipeThreshold => {
            config.swipe_threshold = value.parse().map_err(|_| {
                CliError::Config(format!(
                    "Invalid swipe threshold '{value}'; expected a number of pixels"
                ))
            })?;
        }
    }
    Ok(())
}

pub const fn key_name(key: ConfigKey) -> &'static str {
    match key {
        ConfigKey::User => "user",
        ConfigKey::DbPath => "db-path",
        ConfigKey::RemoteUrl => "remote-url",
        ConfigKey::AuthToken => "auth-token",
        ConfigKey::SyncInterval => "sync-interval",
        ConfigKey::SwipeThreshold => "swipe-threshold",
    }
}

pub fn redacted(mut config: ClientConfig) -> ClientConfig {
    if config.remote.auth_token.is_some() {
        config.remote.auth_token = Some(REDACTED.to_string());
    }
    config
}

fn require_path(config_path: Option<&Path>) -> Result<&Path, CliError> {
    config_path.ok_or_else(|| {
        CliError::Config("Could not determine a config directory; pass --config".to_string())
    })
}
