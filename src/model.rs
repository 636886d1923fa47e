//! Logistic-regression scoring: dot-product, sigmoid, threshold.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

#[derive(Deserialize)]
struct ModelJson {
    intercept: f64,
    coefficients: Vec<f64>,
}

/// A linear/sigmoid/decision triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub linear: f64,
    pub sigmoid: f64,
    pub decision: bool,
}

/// Logistic regression parameters loaded from `model.json`.
pub struct Model {
    intercept: f64,
    coefficients: Vec<f64>,
    threshold: f64,
}

impl Model {
    pub fn new(intercept: f64, coefficients: Vec<f64>, threshold: f64) -> Self {
        Model {
            intercept,
            coefficients,
            threshold,
        }
    }

    /// Parses `model.json`: an object with `"intercept"` and `"coefficients"`.
    pub fn from_reader(path_for_errors: &str, reader: impl Read, threshold: f64) -> Result<Self, Error> {
        let parsed: ModelJson =
            serde_json::from_reader(reader).map_err(|e| Error::resource(path_for_errors, e))?;
        Ok(Model::new(parsed.intercept, parsed.coefficients, threshold))
    }

    /// Opens `path`, parses it per [`Model::from_reader`], and logs the path
    /// and byte count on success.
    pub fn from_path(path: impl AsRef<Path>, threshold: f64) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::resource(path, e))?;
        let model = Self::from_reader(&path.display().to_string(), bytes.as_slice(), threshold)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "loaded model parameters");
        Ok(model)
    }

    pub fn coefficients_len(&self) -> usize {
        self.coefficients.len()
    }

    /// Computes `linear = intercept + Σ F[i]·C[i]`, `sigmoid`, and
    /// `decision = sigmoid > threshold`.
    ///
    /// Fails fast with `Error::ShapeMismatch` when the feature vector's
    /// length doesn't match the coefficient vector's length, instead of
    /// silently truncating to the shorter length.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction, Error> {
        if features.len() != self.coefficients.len() {
            return Err(Error::ShapeMismatch {
                features: features.len(),
                coefficients: self.coefficients.len(),
            });
        }
        crate::invariants::assert_feature_shape_matches(features.len(), self.coefficients.len());

        let linear = self.intercept
            + features
                .iter()
                .zip(&self.coefficients)
                .map(|(f, c)| f * c)
                .sum::<f64>();
        let sigmoid = 1.0 / (1.0 + (-linear).exp());
        crate::invariants::assert_sigmoid_in_open_unit_interval(sigmoid);
        let decision = sigmoid > self.threshold;

        Ok(Prediction {
            linear,
            sigmoid,
            decision,
        })
    }
}
