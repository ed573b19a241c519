//! Client configuration.
//!
//! `ClientConfig` is persisted as JSON under the user's config directory and
//! can be overridden from the environment. It decides which user acts, where
//! the local database lives, whether it replicates from a remote libSQL
//! server, and how far a row must be swiped to commit.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::db::RemoteConfig;
use crate::error::{Error, Result};
use crate::swipe::DEFAULT_SWIPE_THRESHOLD;
use crate::util::{is_remote_db_url, normalize_text_option};

const CONFIG_SCHEMA_VERSION: u32 = 1;
const CONFIG_DIR_NAME: &str = "taskflow";
const CONFIG_FILE_NAME: &str = "config.json";
const DATABASE_FILE_NAME: &str = "tasks.db";
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;

pub const ENV_USER: &str = "TASKFLOW_USER";
pub const ENV_DB_PATH: &str = "TASKFLOW_DB_PATH";
pub const ENV_REMOTE_URL: &str = "TURSO_DATABASE_URL";
pub const ENV_AUTH_TOKEN: &str = "TURSO_AUTH_TOKEN";

/// Remote libSQL server the local database replicates from
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RemoteSettings {
    pub url: Option<String>,
    pub auth_token: Option<String>,
    pub sync_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub version: u32,
    pub user_id: Option<String>,
    pub db_path: Option<PathBuf>,
    pub remote: RemoteSettings,
    pub swipe_threshold: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_SCHEMA_VERSION,
            user_id: None,
            db_path: None,
            remote: RemoteSettings::default(),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

impl ClientConfig {
    /// `<config dir>/taskflow/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// `<data dir>/taskflow/tasks.db`
    pub fn default_db_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(DATABASE_FILE_NAME))
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|error| file_error("read", path, &error))?;
        let config: Self = serde_json::from_str(&raw).map_err(|error| {
            Error::Validation(format!("Invalid config {}: {error}", path.display()))
        })?;
        if config.version > CONFIG_SCHEMA_VERSION {
            return Err(Error::Validation(format!(
                "Unsupported config version {} (expected {CONFIG_SCHEMA_VERSION})",
                config.version
            )));
        }
        config.normalized()
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config = self.clone().normalized()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| file_error("write", path, &error))?;
        }
        let json = serde_json::to_string_pretty(&config)
            .map_err(|error| file_error("write", path, &error))?;
        fs::write(path, json).map_err(|error| file_error("write", path, &error))?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Overlay values from `lookup`; unset or blank variables are ignored
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| normalize_text_option(lookup(key));

        if let Some(user_id) = read(ENV_USER) {
            self.user_id = Some(user_id);
        }
        if let Some(db_path) = read(ENV_DB_PATH) {
            self.db_path = Some(PathBuf::from(db_path));
        }
        if let Some(url) = read(ENV_REMOTE_URL) {
            self.remote.url = Some(url);
        }
        if let Some(token) = read(ENV_AUTH_TOKEN) {
            self.remote.auth_token = Some(token);
        }
        self
    }

    /// Trim text values and reject malformed ones
    pub fn normalized(mut self) -> Result<Self> {
        self.user_id = normalize_text_option(self.user_id);
        self.remote.url = normalize_text_option(self.remote.url);
        self.remote.auth_token = normalize_text_option(self.remote.auth_token);

        if let Some(url) = &self.remote.url {
            if !is_remote_db_url(url) {
                return Err(Error::Validation(
                    "Remote url must start with libsql://, http:// or https://".to_string(),
                ));
            }
            self.remote.url = Some(url.trim_end_matches('/').to_string());
        }
        if self.remote.sync_interval_secs == Some(0) {
            return Err(Error::Validation(
                "sync_interval_secs must be greater than zero".to_string(),
            ));
        }
        if !(self.swipe_threshold.is_finite() && self.swipe_threshold > 0.0) {
            return Err(Error::Validation(
                "swipe_threshold must be a positive number".to_string(),
            ));
        }
        Ok(self)
    }

    /// Explicit path, else the platform data directory
    pub fn resolved_db_path(&self) -> Option<PathBuf> {
        self.db_path.clone().or_else(Self::default_db_path)
    }

    /// Replica settings when both a remote url and a token are configured
    pub fn remote_config(&self) -> Option<RemoteConfig> {
        let url = self.remote.url.as_deref()?;
        let Some(token) = self.remote.auth_token.clone() else {
            tracing::warn!("Remote url is set without an auth token; staying local");
            return None;
        };
        let interval = self
            .remote
            .sync_interval_secs
            .unwrap_or(DEFAULT_SYNC_INTERVAL_SECS);
        Some(RemoteConfig::new(url, token).with_sync_interval(Duration::from_secs(interval)))
    }
}

fn file_error(action: &str, path: &Path, error: &dyn std::fmt::Display) -> Error {
    Error::Validation(format!(
        "Could not {action} config {}: {error}",
        path.display()
    ))
}
