//! Embedded SQLite store and the startup schema barrier.

use crate::config::DatabaseSettings;
use crate::error::AppError;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// Connection pool over the service's local database file.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens (creating if missing) the database file, creating its parent
    /// directory first. An unwritable location is a configuration error.
    #[instrument(skip(settings), fields(path = %settings.path.display()))]
    pub async fn open(settings: &DatabaseSettings) -> Result<Self, AppError> {
        if let Some(parent) = settings.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "Store directory '{}' is not writable: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&settings.path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "Failed to open store at '{}': {}",
                    settings.path.display(),
                    e
                ))
            })?;

        info!(max_connections = settings.max_connections, "Store opened");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Store check failed: {}", e)))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Applies every pending migration; already-applied ones are skipped, so
/// running this against an initialized store is a no-op.
#[instrument(skip_all)]
pub async fn ensure_schema(store: &Store, schema: &Migrator) -> Result<(), AppError> {
    info!(migrations = schema.iter().count(), "Ensuring store schema");
    schema.run(store.pool()).await.map_err(|e| {
        AppError::DatabaseError(anyhow::anyhow!("Schema initialization failed: {}", e))
    })?;
    info!("Store schema ready");
    Ok(())
}

/// True when the store holds a table called `name`.
pub async fn table_exists(store: &Store, name: &str) -> Result<bool, AppError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(name)
            .fetch_one(store.pool())
            .await?;
    Ok(count > 0)
}
