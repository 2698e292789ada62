use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use budget_core::store::{KeyValueStore, StoreError, Ttl};
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

const MEMORY: &str = ":memory:";

fn database_error(e: sqlx::Error) -> StoreError {
    StoreError::Storage(e.to_string())
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens `database` (a file path, `sqlite:` URL or `:memory:`), creating
    /// the file if needed.
    pub async fn connect(database: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database)
            .with_context(|| format!("Invalid database path: {}", database))?
            .create_if_missing(true);

        // Every connection to :memory: opens its own database.
        let max_connections = if database.ends_with(MEMORY) { 1 } else { 4 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database))?;
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Deletes every expired row. Returns the number removed.
    pub async fn purge_expired(&self) -> Result<u64, StoreError> {
        let result =
            sqlx::query("DELETE FROM kv_store WHERE expires_at IS NOT NULL AND expires_at <= ?")
                .bind(Utc::now().timestamp())
                .execute(&self.pool)
                .await
                .map_err(database_error)?;
        debug!(removed = result.rows_affected(), "purged expired entries");
        Ok(result.rows_affected())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Ttl,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        let expires_at = ttl.expires_at(now).map(|at| at.timestamp());

        sqlx::query(
            "INSERT INTO kv_store (key, value, expires_at, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at,
                updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .bind(now.timestamp())
        .execute(&self.pool)
        .await
        .map_err(database_error)?;
        Ok(())
    }

    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let row = sqlx::query(
            "SELECT value FROM kv_store
             WHERE key = ? AND (expires_at IS NULL OR expires_at > ?)",
        )
        .bind(key)
        .bind(Utc::now().timestamp())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(|row| row.try_get::<String, _>("value").map_err(database_error))
            .transpose()
    }

    async fn remove(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;
        Ok(())
    }
}
