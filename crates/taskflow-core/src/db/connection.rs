//! Database connection management

use libsql::{Builder, Connection, Database as LibSqlDatabase};
use std::path::Path;
use std::time::Duration;

use crate::error::StoreError;
use crate::store::StoreResult;

use super::migrations;

/// Remote (Turso) database the local replica syncs with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Remote database URL (e.g., `libsql://your-db.turso.io`)
    pub url: Option<String>,
    /// Authentication token for remote database
    pub auth_token: Option<String>,
    /// Automatic sync interval (default: 60 seconds)
    pub sync_interval: Option<Duration>,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            auth_token: Some(auth_token.into()),
            sync_interval: Some(Duration::from_secs(60)),
        }
    }

    #[must_use]
    pub const fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = Some(interval);
        self
    }
}

/// Database wrapper for libSQL connections
pub struct Database {
    db: LibSqlDatabase,
    conn: Connection,
    remote: Option<RemoteConfig>,
}

impl Database {
    /// Open a local-only database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;

        let db = Builder::new_local(path).build().await?;
        Self::finish_open(db, None).await
    }

    /// Open an in-memory database (useful for testing)
    pub async fn open_in_memory() -> StoreResult<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        Self::finish_open(db, None).await
    }

    /// Open an embedded replica of a remote Turso database.
    ///
    /// Reads are served from the local file; writes go to the remote and
    /// sync back.
    pub async fn open_replica(
        local_path: impl AsRef<Path>,
        remote: RemoteConfig,
    ) -> StoreResult<Self> {
        ensure_parent_dir(local_path.as_ref())?;
        let path_str = local_path.as_ref().to_string_lossy().to_string();

        let url = remote
            .url
            .clone()
            .ok_or_else(|| StoreError::Database("Remote URL is required".into()))?;
        let token = remote
            .auth_token
            .clone()
            .ok_or_else(|| StoreError::Database("Remote auth token is required".into()))?;

        let mut builder = Builder::new_remote_replica(&path_str, url, token);
        if let Some(interval) = remote.sync_interval {
            builder = builder.sync_interval(interval);
            tracing::debug!("Automatic sync interval set to {:?}", interval);
        }

        let db = builder.build().await?;
        let conn = db.connect()?;
        let database = Self {
            db,
            conn,
            remote: Some(remote),
        };

        // Pull the remote schema before migrating so we don't recreate it locally
        tracing::debug!("Performing initial sync...");
        database.sync().await?;
        database.configure().await?;
        migrations::run(&database.conn).await?;
        Ok(database)
    }

    async fn finish_open(db: LibSqlDatabase, remote: Option<RemoteConfig>) -> StoreResult<Self> {
        let conn = db.connect()?;
        let database = Self { db, conn, remote };
        database.configure().await?;
        migrations::run(&database.conn).await?;
        Ok(database)
    }

    async fn configure(&self) -> StoreResult<()> {
        // Some pragmas are rejected by remote replicas
        self.conn
            .execute("PRAGMA journal_mode = WAL;", ())
            .await
            .ok();
        self.conn
            .execute("PRAGMA synchronous = NORMAL;", ())
            .await
            .ok();
        Ok(())
    }

    /// Pull changes from the remote database (no-op for local databases)
    pub async fn sync(&self) -> StoreResult<()> {
        if self.remote.is_some() {
            self.db.sync().await?;
            tracing::debug!("Database synced with remote");
        }
        Ok(())
    }

    pub const fn is_sync_enabled(&self) -> bool {
        self.remote.is_some()
    }

    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn ensure_parent_dir(path: &Path) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_in_memory() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(!db.is_sync_enabled());
        db.sync().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_creates_parent_directories() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("tasks.db");
        let db = Database::open(&path).await.unwrap();
        assert!(path.exists());
        assert!(!db.is_sync_enabled());
    }

    #[test]
    fn test_remote_config_new() {
        let config = RemoteConfig::new("libsql://test.turso.io", "test-token");
        assert_eq!(config.url.as_deref(), Some("libsql://test.turso.io"));
        assert_eq!(config.auth_token.as_deref(), Some("test-token"));
        assert_eq!(config.sync_interval, Some(Duration::from_secs(60)));
        let config = config.with_sync_interval(Duration::from_secs(5));
        assert_eq!(config.sync_interval, Some(Duration::from_secs(5)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_replica_requires_token() {
        let tmp = tempdir().unwrap();
        let remote = RemoteConfig {
            url: Some("libsql://test.turso.io".to_string()),
            ..RemoteConfig::default()
        };
        let result = Database::open_replica(tmp.path().join("tasks.db"), remote).await;
        assert!(result.is_err());
    }
}
