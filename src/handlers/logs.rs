//! Prediction log API
//!
//! Read-only view over the prediction audit trail, newest first.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::AppError;
use crate::storage::PredictionLogEntry;

/// Query parameters for logs API
#[derive(Debug, Deserialize)]
pub struct LogQueryParams {
    /// Maximum number of results (defaults to `database.default_logs_limit`)
    pub limit: Option<usize>,
}

/// One row of the logs response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub id: i64,
    /// ISO-8601, UTC
    pub timestamp: DateTime<Utc>,
    pub language: String,
    pub confidence: String,
}

impl From<PredictionLogEntry> for LogSummary {
    fn from(entry: PredictionLogEntry) -> Self {
        Self {
            id: entry.id,
            timestamp: entry.timestamp,
            language: entry.language,
            confidence: entry.confidence,
        }
    }
}

/// Response for logs query
#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
    pub total: usize,
    pub logs: Vec<LogSummary>,
}

/// GET /api/v1/logs - Most recent predictions
///
/// Example: GET /api/v1/logs?limit=5
pub async fn get_logs(
    State(state): State<AppState>,
    params: Result<Query<LogQueryParams>, QueryRejection>,
) -> Result<Json<LogsResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let limit = params
        .limit
        .unwrap_or(state.settings.default_logs_limit)
        .min(state.settings.max_logs_limit);

    let logs: Vec<LogSummary> = state
        .store
        .recent(limit)
        .await?
        .into_iter()
        .map(LogSummary::from)
        .collect();

    Ok(Json(LogsResponse {
        total: logs.len(),
        logs,
    }))
}
