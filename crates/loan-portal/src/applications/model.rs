use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::FEATURE_COLUMNS;
use super::encoding::FeatureVector;

/// Binary decision capability over an encoded application row. The
/// concrete model is loaded once at startup and injected by handle into
/// the request path.
pub trait Classifier: Send + Sync {
    /// Class label for the row: 1 approves, 0 rejects.
    fn predict(&self, features: &FeatureVector) -> u8;

    /// Estimated probability that the label is 1.
    fn predict_probability(&self, features: &FeatureVector) -> f64;
}

/// Label and class-1 probability for a single scored row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: u8,
    pub probability: f64,
}

impl PredictionResult {
    pub fn from_classifier<C: Classifier + ?Sized>(
        classifier: &C,
        features: &FeatureVector,
    ) -> Self {
        Self {
            label: classifier.predict(features),
            probability: classifier.predict_probability(features),
        }
    }

    pub fn approved(&self) -> bool {
        self.label == 1
    }
}

/// Failures loading the serialized artifact. All of them are fatal at
/// startup; the process never serves with a partially loaded model.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("unable to read model artifact {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("model artifact {path} is not a valid model description: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("model artifact declares {found} coefficients for {expected} feature columns")]
    CoefficientCountMismatch { expected: usize, found: usize },
    #[error("model artifact column {index} is '{found}', expected '{expected}'")]
    FeatureOrderMismatch {
        index: usize,
        expected: &'static str,
        found: String,
    },
    #[error("model artifact decision threshold {found} is outside [0, 1]")]
    ThresholdOutOfRange { found: f64 },
}

/// Pre-trained logistic-regression artifact. The JSON file records the
/// feature columns in training order, one coefficient per column, the
/// intercept, and the decision threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl LinearModelArtifact {
    /// Deserialize and validate the artifact at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ModelLoadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: Self =
            serde_json::from_str(&raw).map_err(|source| ModelLoadError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check the artifact against the fixed column contract. The
    /// feature order must match exactly; a reordered artifact would
    /// silently score garbage otherwise.
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if self.coefficients.len() != FEATURE_COLUMNS.len() {
            return Err(ModelLoadError::CoefficientCountMismatch {
                expected: FEATURE_COLUMNS.len(),
                found: self.coefficients.len(),
            });
        }

        if self.feature_names.len() != FEATURE_COLUMNS.len() {
            return Err(ModelLoadError::CoefficientCountMismatch {
                expected: FEATURE_COLUMNS.len(),
                found: self.feature_names.len(),
            });
        }

        for (index, (found, expected)) in self
            .feature_names
            .iter()
            .zip(FEATURE_COLUMNS.iter())
            .enumerate()
        {
            if found != expected {
                return Err(ModelLoadError::FeatureOrderMismatch {
                    index,
                    expected,
                    found: found.clone(),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.threshold) || !self.threshold.is_finite() {
            return Err(ModelLoadError::ThresholdOutOfRange {
                found: self.threshold,
            });
        }

        Ok(())
    }

    fn decision_score(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(coefficient, value)| coefficient * value)
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for LinearModelArtifact {
    fn predict(&self, features: &FeatureVector) -> u8 {
        u8::from(self.predict_probability(features) >= self.threshold)
    }

    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.decision_score(features))
    }
}

fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}
