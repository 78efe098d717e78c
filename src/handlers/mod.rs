//! HTTP handlers
//!
//! - `index`: static page at `/`
//! - `health`: liveness and readiness
//! - `predict`: language prediction
//! - `logs`: recent prediction log entries
//! - `metrics_handler`: Prometheus exposition

pub mod health;
pub mod index;
pub mod logs;
pub mod metrics_handler;
pub mod predict;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::model::LanguageDetector;
use crate::storage::PredictionLogStore;

/// Shared state for the prediction API
///
/// The detector is built once before the router and never mutated; `None`
/// means the service is up but has no model to serve.
#[derive(Clone)]
pub struct AppState {
    pub detector: Option<Arc<LanguageDetector>>,
    pub store: Arc<dyn PredictionLogStore>,
    pub settings: Arc<ServiceSettings>,
}

impl AppState {
    pub fn new(
        detector: Option<Arc<LanguageDetector>>,
        store: Arc<dyn PredictionLogStore>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            detector,
            store,
            settings: Arc::new(settings),
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.detector.is_some()
    }
}

/// Request-time knobs taken from the configuration
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub max_text_length: usize,
    pub default_logs_limit: usize,
    pub max_logs_limit: usize,
    pub fail_on_write_error: bool,
    pub static_dir: PathBuf,
}

impl ServiceSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_text_length: config.model.max_text_length,
            default_logs_limit: config.database.default_logs_limit,
            max_logs_limit: config.database.max_logs_limit,
            fail_on_write_error: config.database.fail_on_write_error,
            static_dir: PathBuf::from(&config.server.static_dir),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
pub(crate) mod test_support;
