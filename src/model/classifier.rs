//! Fitted classifiers
//!
//! Artifacts are JSON documents tagged by `kind`. Each variant only needs to
//! turn a scaled feature row into per-class probabilities; picking the top
//! class is shared.

use serde::{Deserialize, Serialize};

use super::ModelError;

/// A fitted model that scores one scaled feature row
pub trait Classifier: Send + Sync {
    /// Class labels, aligned with the probabilities returned by `predict_proba`
    fn classes(&self) -> &[i64];

    /// Number of input columns, when the model knows it
    fn n_features(&self) -> Option<usize>;

    /// Per-class probabilities for a single row
    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError>;

    /// Short model family name for logs
    fn kind(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    /// Coefficients `[n_classes][n_features]`, or a single row for a binary model
    LogisticRegression {
        classes: Vec<i64>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    /// Gaussian naive Bayes; `theta` and `var` are `[n_classes][n_features]`
    GaussianNb {
        classes: Vec<i64>,
        class_prior: Vec<f64>,
        theta: Vec<Vec<f64>>,
        var: Vec<Vec<f64>>,
    },
}

impl ClassifierArtifact {
    pub fn validate(&self) -> Result<(), ModelError> {
        let classes = self.classes();
        if classes.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "classifier has no classes".to_string(),
            ));
        }

        match self {
            Self::LogisticRegression {
                classes,
                coefficients,
                intercepts,
            } => {
                if classes.len() < 2 {
                    return Err(ModelError::InvalidArtifact(
                        "logistic regression needs at least two classes".to_string(),
                    ));
                }
                let binary = classes.len() == 2 && coefficients.len() == 1;
                let rows = if binary { 1 } else { classes.len() };
                if coefficients.len() != rows {
                    return Err(ModelError::DimensionMismatch {
                        what: "logistic regression coefficient rows",
                        expected: rows,
                        actual: coefficients.len(),
                    });
                }
                if intercepts.len() != rows {
                    return Err(ModelError::DimensionMismatch {
                        what: "logistic regression intercepts",
                        expected: rows,
                        actual: intercepts.len(),
                    });
                }
                check_rectangular(coefficients, "logistic regression coefficients")?;
            }
            Self::GaussianNb {
                classes,
                class_prior,
                theta,
                var,
            } => {
                for (what, len) in [
                    ("naive bayes class_prior", class_prior.len()),
                    ("naive bayes theta rows", theta.len()),
                    ("naive bayes var rows", var.len()),
                ] {
                    if len != classes.len() {
                        return Err(ModelError::DimensionMismatch {
                            what,
                            expected: classes.len(),
                            actual: len,
                        });
                    }
                }
                let width = check_rectangular(theta, "naive bayes theta")?;
                if check_rectangular(var, "naive bayes var")? != width {
                    return Err(ModelError::InvalidArtifact(
                        "naive bayes theta and var widths differ".to_string(),
                    ));
                }
                if var.iter().flatten().any(|v| *v <= 0.0) {
                    return Err(ModelError::InvalidArtifact(
                        "naive bayes variances must be positive".to_string(),
                    ));
                }
                if class_prior.iter().any(|p| *p <= 0.0) {
                    return Err(ModelError::InvalidArtifact(
                        "naive bayes class priors must be positive".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    fn check_width(&self, row: &[f64]) -> Result<(), ModelError> {
        match self.n_features() {
            Some(expected) if expected != row.len() => Err(ModelError::DimensionMismatch {
                what: "classifier input",
                expected,
                actual: row.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn classes(&self) -> &[i64] {
        match self {
            Self::LogisticRegression { classes, .. } | Self::GaussianNb { classes, .. } => classes,
        }
    }

    fn n_features(&self) -> Option<usize> {
        match self {
            Self::LogisticRegression { coefficients, .. } => coefficients.first().map(Vec::len),
            Self::GaussianNb { theta, .. } => theta.first().map(Vec::len),
        }
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.check_width(row)?;

        match self {
            Self::LogisticRegression {
                coefficients,
                intercepts,
                ..
            } => {
                let scores: Vec<f64> = coefficients
                    .iter()
                    .zip(intercepts)
                    .map(|(coef, intercept)| dot(coef, row) + intercept)
                    .collect();

                if scores.len() == 1 {
                    let p = sigmoid(scores[0]);
                    Ok(vec![1.0 - p, p])
                } else {
                    Ok(softmax(&scores))
                }
            }
            Self::GaussianNb {
                class_prior,
                theta,
                var,
                ..
            } => {
                let joint: Vec<f64> = class_prior
                    .iter()
                    .zip(theta.iter().zip(var))
                    .map(|(prior, (means, vars))| {
                        let log_likelihood: f64 = row
                            .iter()
                            .zip(means.iter().zip(vars))
                            .map(|(x, (mu, v))| {
                                -0.5 * (2.0 * std::f64::consts::PI * v).ln()
                                    - (x - mu).powi(2) / (2.0 * v)
                            })
                            .sum();
                        prior.ln() + log_likelihood
                    })
                    .collect();

                Ok(softmax(&joint))
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression { .. } => "logistic_regression",
            Self::GaussianNb { .. } => "gaussian_nb",
        }
    }
}

fn check_rectangular(rows: &[Vec<f64>], what: &'static str) -> Result<usize, ModelError> {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if width == 0 {
        return Err(ModelError::InvalidArtifact(format!("{} are empty", what)));
    }
    for row in rows {
        if row.len() != width {
            return Err(ModelError::DimensionMismatch {
                what,
                expected: width,
                actual: row.len(),
            });
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidArtifact(format!(
                "{} contain non-finite values",
                what
            )));
        }
    }
    Ok(width)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Numerically stable softmax
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
