//! Prediction log store
//!
//! Append-only audit trail of every successful prediction. Handlers talk to
//! the [`PredictionLogStore`] trait; [`SqlitePredictionLog`] is the
//! production implementation.

pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use sqlite::SqlitePredictionLog;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

/// A record to be appended
#[derive(Debug, Clone, PartialEq)]
pub struct NewPredictionLog {
    pub timestamp: DateTime<Utc>,
    pub request_payload: String,
    pub response_payload: String,
    pub language: String,
    pub confidence: String,
}

impl NewPredictionLog {
    /// Build a record stamped with the current time
    pub fn new(
        request_payload: String,
        response_payload: String,
        language: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            request_payload,
            response_payload,
            language: language.into(),
            confidence: confidence_percent(confidence),
        }
    }
}

/// A stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionLogEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub request_payload: String,
    pub response_payload: String,
    pub language: String,
    pub confidence: String,
}

#[async_trait]
pub trait PredictionLogStore: Send + Sync {
    /// Persist one record and return its id
    async fn append(&self, entry: NewPredictionLog) -> Result<i64, StorageError>;

    /// Newest entries first, at most `limit` of them
    async fn recent(&self, limit: usize) -> Result<Vec<PredictionLogEntry>, StorageError>;

    /// Total number of stored entries
    async fn count(&self) -> Result<u64, StorageError>;
}

/// Render a probability as a percentage with two decimals, e.g. `"87.00%"`
pub fn confidence_percent(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}
