use async_trait::async_trait;
use std::sync::Arc;

use super::{AppState, ServiceSettings};
use crate::config::default_languages;
use crate::features::FEATURE_NAMES;
use crate::model::{ClassifierArtifact, LanguageDetector, LanguageTable, StandardScaler};
use crate::storage::{
    NewPredictionLog, PredictionLogEntry, PredictionLogStore, SqlitePredictionLog, StorageError,
};

/// Identity scaler + one-hot logistic regression: the class whose feature is
/// largest wins, so "Hello world" (11, 2, 8) is class 0.
pub fn test_detector() -> LanguageDetector {
    let scaler = StandardScaler::new(
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        vec![0.0; 3],
        vec![1.0; 3],
    )
    .unwrap();

    let classifier = ClassifierArtifact::LogisticRegression {
        classes: vec![0, 1, 2],
        coefficients: vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ],
        intercepts: vec![0.0, 0.0, 0.0],
    };

    LanguageDetector::new(
        scaler,
        Box::new(classifier),
        LanguageTable::new(&default_languages()),
    )
    .unwrap()
}

pub async fn test_state() -> (AppState, Arc<SqlitePredictionLog>) {
    let store = Arc::new(SqlitePredictionLog::in_memory().await.unwrap());
    let state = AppState::new(
        Some(Arc::new(test_detector())),
        store.clone(),
        ServiceSettings::default(),
    );
    (state, store)
}

/// Store whose writes always fail
pub struct FailingStore;

#[async_trait]
impl PredictionLogStore for FailingStore {
    async fn append(&self, _entry: NewPredictionLog) -> Result<i64, StorageError> {
        Err(StorageError::Database(sqlx::Error::PoolClosed))
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<PredictionLogEntry>, StorageError> {
        Err(StorageError::Database(sqlx::Error::PoolClosed))
    }

    async fn count(&self) -> Result<u64, StorageError> {
        Err(StorageError::Database(sqlx::Error::PoolClosed))
    }
}
