use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::AppState;
use crate::error::{error_type_name, AppError};
use crate::features::{is_word_separator, TextFeatures};
use crate::logging::text_preview;
use crate::metrics;
use crate::storage::NewPredictionLog;

/// Shortest accepted input, in characters
pub const MIN_TEXT_LENGTH: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub language: String,
    /// Top-class probability rounded to 4 decimal places
    pub confidence: f64,
    pub language_code: String,
    pub features: TextFeatures,
}

/// Reject empty, blank, too short or too long input before it reaches the model
pub fn validate_text(text: &str, max_length: usize) -> Result<(), AppError> {
    let length = text.chars().count();

    if length < MIN_TEXT_LENGTH {
        return Err(AppError::ValidationError(format!(
            "text must be at least {} characters long, got {}",
            MIN_TEXT_LENGTH, length
        )));
    }
    if text.chars().all(is_word_separator) {
        return Err(AppError::ValidationError(
            "text cannot be empty or whitespace only".to_string(),
        ));
    }
    if length > max_length {
        return Err(AppError::ValidationError(format!(
            "text is too long: {} characters, maximum is {}",
            length, max_length
        )));
    }

    Ok(())
}

pub fn round_confidence(confidence: f64) -> f64 {
    (confidence * 10_000.0).round() / 10_000.0
}

/// POST /api/v1/predict - Detect the language of a text
///
/// Example: POST /api/v1/predict {"text": "Hello world"}
pub async fn predict_language(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| match rejection {
        JsonRejection::JsonDataError(e) => counted(AppError::ValidationError(e.body_text())),
        other => counted(AppError::InvalidRequest(other.body_text())),
    })?;

    validate_text(&request.text, state.settings.max_text_length).map_err(counted)?;

    let detector = state
        .detector
        .as_ref()
        .ok_or_else(|| counted(AppError::ModelNotLoaded))?;

    debug!(text = %text_preview(&request.text), "Predicting language");

    let started = Instant::now();
    let prediction = detector.predict(&request.text).map_err(|e| {
        error!(error = %e, "Prediction failed");
        counted(AppError::from(e))
    })?;
    let elapsed = started.elapsed();

    let response = PredictResponse {
        language: prediction.language.clone(),
        confidence: round_confidence(prediction.confidence),
        language_code: prediction.language_code.clone(),
        features: prediction.features,
    };

    let entry = NewPredictionLog::new(
        serde_json::to_string(&request)?,
        serde_json::to_string(&response)?,
        &prediction.language,
        prediction.confidence,
    );

    match state.store.append(entry).await {
        Ok(id) => debug!(log_id = id, "Prediction logged"),
        Err(e) if state.settings.fail_on_write_error => {
            error!(error = %e, "Failed to write prediction log");
            return Err(counted(AppError::PredictionError(e.to_string())));
        }
        Err(e) => {
            warn!(error = %e, "Failed to write prediction log, returning prediction anyway");
            metrics::record_log_write_failure();
        }
    }

    metrics::record_prediction(&response.language_code, elapsed);
    info!(
        language = %response.language,
        language_code = %response.language_code,
        confidence = response.confidence,
        class = prediction.class_label,
        elapsed_us = elapsed.as_micros() as u64,
        "Language predicted"
    );

    Ok(Json(response))
}

fn counted(err: AppError) -> AppError {
    metrics::record_error(error_type_name(&err));
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{test_detector, test_state, FailingStore};
    use crate::handlers::ServiceSettings;
    use crate::storage::PredictionLogStore;
    use std::sync::Arc;

    fn request(text: &str) -> Result<Json<PredictRequest>, JsonRejection> {
        Ok(Json(PredictRequest {
            text: text.to_string(),
        }))
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("", 100).is_err());
        assert!(validate_text("ab", 100).is_err());
        assert!(validate_text("   ", 100).is_err());
        assert!(validate_text("\t\n ", 100).is_err());
        assert!(validate_text("\u{1c}\u{1d}\u{1e}", 100).is_err());
        assert!(validate_text("abc", 100).is_ok());
        assert!(validate_text(" a ", 100).is_ok());
        assert!(validate_text("abcd", 3).is_err());
    }

    #[test]
    fn test_validate_counts_characters() {
        // three characters, six bytes
        assert!(validate_text("абв", 3).is_ok());
    }

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(0.876543), 0.8765);
        assert_eq!(round_confidence(0.12345678), 0.1235);
        assert_eq!(round_confidence(1.0), 1.0);
    }

    #[tokio::test]
    async fn test_predict_hello_world() {
        let (state, store) = test_state().await;

        let Json(response) = predict_language(State(state), request("Hello world"))
            .await
            .unwrap();

        assert_eq!(response.language, "English");
        assert_eq!(response.language_code, "en");
        assert_eq!(
            response.features,
            TextFeatures {
                text_length: 11,
                num_words: 2,
                num_unique_chars: 8,
            }
        );
        assert!((0.0..=1.0).contains(&response.confidence));
        assert_eq!(response.confidence, round_confidence(response.confidence));

        let logs = store.recent(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].language, "English");
        assert_eq!(logs[0].request_payload, r#"{"text":"Hello world"}"#);

        let logged: PredictResponse = serde_json::from_str(&logs[0].response_payload).unwrap();
        assert_eq!(logged, response);
    }

    #[tokio::test]
    async fn test_short_text_never_reaches_store() {
        let (state, store) = test_state().await;

        for text in ["", "ab", "   "] {
            let err = predict_language(State(state.clone()), request(text))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)), "{text:?}");
        }

        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_model_is_unavailable() {
        let (mut state, _store) = test_state().await;
        state.detector = None;

        let err = predict_language(State(state), request("Hello world"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ModelNotLoaded));
    }

    #[tokio::test]
    async fn test_log_failure_fails_request_by_default() {
        let state = AppState::new(
            Some(Arc::new(test_detector())),
            Arc::new(FailingStore),
            ServiceSettings::default(),
        );

        let err = predict_language(State(state), request("Hello world"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PredictionError(_)));
    }

    #[tokio::test]
    async fn test_log_failure_tolerated_when_configured() {
        let settings = ServiceSettings {
            fail_on_write_error: false,
            ..ServiceSettings::default()
        };
        let state = AppState::new(
            Some(Arc::new(test_detector())),
            Arc::new(FailingStore),
            settings,
        );

        let Json(response) = predict_language(State(state), request("Hello world"))
            .await
            .unwrap();
        assert_eq!(response.language, "English");
    }
}
