//! Logistic regression evaluated from exported coefficients.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::clinical::features::FeatureVector;

use super::{check_finite, check_shape, Classifier, ModelError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        check_shape(self.coefficients.len())?;
        if let Some(idx) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(ModelError::NonFinite {
                feature: crate::clinical::FEATURE_NAMES[idx],
                value: self.coefficients[idx],
            });
        }
        Ok(())
    }

    fn decision(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        check_finite(features)?;
        check_shape(self.coefficients.len())?;
        let weights = Array1::from_vec(self.coefficients.clone());
        Ok(weights.dot(&features.to_array()) + self.intercept)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticModel {
    fn name(&self) -> &str {
        "logistic"
    }

    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError> {
        Ok(if self.decision(features)? > 0.0 { 1 } else { 0 })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ModelError> {
        let p = sigmoid(self.decision(features)?);
        Ok([1.0 - p, p])
    }
}
