use crate::error::AppError;
use crate::store::{RecordStore, Slot};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

/// [`RecordStore`] backed by a single SQLite key/value table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (or creates) the database at `db_url` and ensures the schema.
    ///
    /// `sqlite::memory:` is accepted; the pool keeps a single connection alive
    /// so the in-memory database is not lost between calls.
    pub async fn connect(db_url: &str) -> Result<Self, AppError> {
        info!("Opening record store at: {}", db_url);

        let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, creating the table if needed.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&pool)
        .await?;

        info!("Record store ready.");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn load(&self, slot: Slot) -> Result<Option<String>, AppError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(slot.key())
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn save(&self, slot: Slot, value: &str) -> Result<(), AppError> {
        let updated_at = Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(slot.key())
        .bind(value)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        debug!(slot = %slot, bytes = value.len(), "Slot saved");
        Ok(())
    }

    async fn remove(&self, slot: Slot) -> Result<(), AppError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(slot.key())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
