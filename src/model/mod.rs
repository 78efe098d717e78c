//! Model adapter
//!
//! Wraps a fitted scaler and classifier loaded from disk and turns raw text
//! into a labelled prediction:
//!
//! ```text
//! text -> TextFeatures -> feature row (scaler order) -> scaled row
//!      -> class probabilities -> top class -> language table
//! ```
//!
//! A `LanguageDetector` is immutable once built and is shared between
//! request handlers behind an `Arc`.

pub mod classifier;
pub mod languages;
pub mod scaler;

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub use classifier::{Classifier, ClassifierArtifact};
pub use languages::{Language, LanguageTable};
pub use scaler::StandardScaler;

use crate::features::{extract_features, TextFeatures};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("{what} expects {expected} features, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("classifier returned invalid output: {0}")]
    InvalidOutput(String),
}

/// Result of a single prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub language: String,
    pub language_code: String,
    /// Probability of the top class, in `[0, 1]`
    pub confidence: f64,
    /// Raw class label emitted by the classifier
    pub class_label: i64,
    pub features: TextFeatures,
}

pub struct LanguageDetector {
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
    languages: LanguageTable,
}

impl std::fmt::Debug for LanguageDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageDetector")
            .field("scaler", &self.scaler)
            .field("classifier", &self.classifier.kind())
            .field("languages", &self.languages)
            .finish()
    }
}

impl LanguageDetector {
    /// Load both artifacts from disk
    pub fn load(
        scaler_path: impl AsRef<Path>,
        classifier_path: impl AsRef<Path>,
        languages: LanguageTable,
    ) -> Result<Self, ModelError> {
        let scaler: StandardScaler = read_artifact(scaler_path.as_ref())?;
        scaler.validate()?;

        let classifier: ClassifierArtifact = read_artifact(classifier_path.as_ref())?;
        classifier.validate()?;

        let detector = Self::new(scaler, Box::new(classifier), languages)?;

        info!(
            scaler = %scaler_path.as_ref().display(),
            classifier = %classifier_path.as_ref().display(),
            kind = detector.classifier.kind(),
            classes = detector.classifier.classes().len(),
            "Model and scaler loaded"
        );

        Ok(detector)
    }

    pub fn new(
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
        languages: LanguageTable,
    ) -> Result<Self, ModelError> {
        if let Some(expected) = classifier.n_features() {
            if expected != scaler.n_features() {
                return Err(ModelError::DimensionMismatch {
                    what: "classifier",
                    expected,
                    actual: scaler.n_features(),
                });
            }
        }

        let unmapped = languages.unmapped(classifier.classes());
        if !unmapped.is_empty() {
            warn!(
                ?unmapped,
                "Classifier classes without a language entry will be reported as Unknown"
            );
        }

        Ok(Self {
            scaler,
            classifier,
            languages,
        })
    }

    pub fn classifier_kind(&self) -> &'static str {
        self.classifier.kind()
    }

    pub fn classes(&self) -> &[i64] {
        self.classifier.classes()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.scaler.feature_names
    }

    pub fn predict(&self, text: &str) -> Result<Prediction, ModelError> {
        let features = extract_features(text);
        let row = self.scaler.feature_vector(&features)?;
        let scaled = self.scaler.transform(&row)?;
        let probabilities = self.classifier.predict_proba(&scaled)?;

        let classes = self.classifier.classes();
        if probabilities.len() != classes.len() {
            return Err(ModelError::InvalidOutput(format!(
                "{} probabilities for {} classes",
                probabilities.len(),
                classes.len()
            )));
        }

        let (best, confidence) = argmax(&probabilities)?;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ModelError::InvalidOutput(format!(
                "probability {} outside [0, 1]",
                confidence
            )));
        }

        let class_label = classes[best];
        let Language { name, code } = self.languages.lookup(class_label);

        Ok(Prediction {
            language: name,
            language_code: code,
            confidence,
            class_label,
            features,
        })
    }
}

/// Index and value of the largest probability; the first one wins ties
fn argmax(probabilities: &[f64]) -> Result<(usize, f64), ModelError> {
    if probabilities.iter().any(|p| p.is_nan()) {
        return Err(ModelError::InvalidOutput("NaN probability".to_string()));
    }

    probabilities
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (idx, p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((idx, p)),
        })
        .ok_or_else(|| ModelError::InvalidOutput("no probabilities".to_string()))
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
