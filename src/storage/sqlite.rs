//! SQLite-backed prediction log
//!
//! - Connection pooling (one connection per statement)
//! - Migrations run on open, so the table exists before the first request
//! - WAL mode for file databases so reads don't block the writer

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use super::{NewPredictionLog, PredictionLogEntry, PredictionLogStore, StorageError};

#[derive(Debug, Clone)]
pub struct SqlitePredictionLog {
    pool: SqlitePool,
}

impl SqlitePredictionLog {
    /// Open (or create) the database file at `path` and run migrations
    pub async fn open(path: impl AsRef<Path>, max_connections: u32) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(database = %path.display(), "Prediction log database opened");
        Self::from_pool(pool).await
    }

    /// Private in-memory database, mainly for tests
    ///
    /// Every SQLite in-memory connection is its own database, so the pool is
    /// pinned to a single connection that never expires.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl PredictionLogStore for SqlitePredictionLog {
    async fn append(&self, entry: NewPredictionLog) -> Result<i64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO prediction_logs (timestamp, request_data, response_data, language, confidence)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(entry.timestamp.timestamp_millis())
        .bind(&entry.request_payload)
        .bind(&entry.response_payload)
        .bind(&entry.language)
        .bind(&entry.confidence)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<PredictionLogEntry>, StorageError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT id, timestamp, request_data, response_data, language, confidence
             FROM prediction_logs
             ORDER BY timestamp DESC, id DESC
             LIMIT ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let millis: i64 = row.get("timestamp");
                let timestamp = DateTime::<Utc>::from_timestamp_millis(millis)
                    .ok_or(StorageError::InvalidTimestamp(millis))?;

                Ok(PredictionLogEntry {
                    id: row.get("id"),
                    timestamp,
                    request_payload: row.get("request_data"),
                    response_payload: row.get("response_data"),
                    language: row.get("language"),
                    confidence: row.get("confidence"),
                })
            })
            .collect()
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prediction_logs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
