/// SQLite persistence layer for the durable store
///
/// Both collections live in one key-value table. Each write replaces the whole
/// blob for its key using UPSERT, so the table never holds partial records.

use crate::{error::PersistenceError, store::DurableStore};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool},
    Row,
};
use std::path::Path;

/// File name of the store database inside the data directory
pub const DATABASE_FILE: &str = "hookflow.db";

/// SQLite-based durable store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    /// SQLite connection pool for the store database
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create new store instance over an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) `{data_dir}/hookflow.db` and initialise its schema
    pub async fn open(data_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir).map_err(|e| {
            anyhow::anyhow!("Failed to create data directory '{}': {}", data_dir.display(), e)
        })?;
        let db_path = data_dir.join(DATABASE_FILE);

        tracing::info!("🗄️ Opening durable store: {}", db_path.display());

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    /// Initialize the key-value schema
    ///
    /// Safe to call multiple times (uses IF NOT EXISTS).
    pub async fn init_schema(&self) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl DurableStore for SqliteStore {
    async fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        tracing::debug!("💾 Persisted '{}' ({} bytes)", key, value.len());

        Ok(())
    }
}
