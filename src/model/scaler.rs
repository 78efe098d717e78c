use serde::{Deserialize, Serialize};

use super::ModelError;
use crate::features::{TextFeatures, FEATURE_NAMES};

/// Fitted standardization transform: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Column order the scaler (and the classifier after it) was fitted on
    #[serde(default = "default_feature_names")]
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

fn default_feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

impl StandardScaler {
    pub fn new(feature_names: Vec<String>, mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ModelError> {
        let scaler = Self {
            feature_names,
            mean,
            scale,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.feature_names.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "scaler declares no features".to_string(),
            ));
        }
        if self.mean.len() != self.feature_names.len() {
            return Err(ModelError::DimensionMismatch {
                what: "scaler mean",
                expected: self.feature_names.len(),
                actual: self.mean.len(),
            });
        }
        if self.scale.len() != self.feature_names.len() {
            return Err(ModelError::DimensionMismatch {
                what: "scaler scale",
                expected: self.feature_names.len(),
                actual: self.scale.len(),
            });
        }
        if let Some(name) = self
            .feature_names
            .iter()
            .find(|name| !FEATURE_NAMES.contains(&name.as_str()))
        {
            return Err(ModelError::UnknownFeature(name.clone()));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "scaler contains non-finite values".to_string(),
            ));
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Arrange features in the fitted column order
    pub fn feature_vector(&self, features: &TextFeatures) -> Result<Vec<f64>, ModelError> {
        self.feature_names
            .iter()
            .map(|name| {
                features
                    .get(name)
                    .ok_or_else(|| ModelError::UnknownFeature(name.clone()))
            })
            .collect()
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        if row.len() != self.mean.len() {
            return Err(ModelError::DimensionMismatch {
                what: "scaler input",
                expected: self.mean.len(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // zero-variance columns are only centred
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}
