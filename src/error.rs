use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::model::ModelError;
use crate::storage::StorageError;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Malformed request body or query string
    InvalidRequest(String),
    /// Well-formed request whose content fails validation
    ValidationError(String),
    /// Detector is not available
    ModelNotLoaded,
    /// Feature extraction, inference or the logging that follows it failed
    PredictionError(String),
    /// Prediction log store failure outside the prediction path
    StorageError(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::ModelNotLoaded => write!(f, "Model is not loaded"),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Self::ModelNotLoaded => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            Self::PredictionError(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Self::StorageError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

pub fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::InvalidRequest(_) => "invalid_request",
        AppError::ValidationError(_) => "validation_error",
        AppError::ModelNotLoaded => "model_not_loaded",
        AppError::PredictionError(_) => "prediction_error",
        AppError::StorageError(_) => "storage_error",
        AppError::InternalError(_) => "internal_error",
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        Self::PredictionError(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::InternalError(format!("JSON error: {}", err))
    }
}
