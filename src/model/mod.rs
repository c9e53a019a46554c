//! Classifier capability and the persisted model artifacts behind it.

pub mod logistic;
pub mod tree;

use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::clinical::features::{FeatureVector, FEATURE_COUNT};

pub use logistic::LogisticModel;
pub use tree::DecisionTree;

/// Failures raised while validating or invoking a classifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("model expects {expected} features, artifact declares {actual}")]
    Shape { expected: usize, actual: usize },
    #[error("feature `{feature}` is not finite ({value})")]
    NonFinite { feature: &'static str, value: f64 },
    #[error("malformed decision tree: {0}")]
    MalformedTree(String),
}

/// Binary classifier over normalized feature vectors.
pub trait Classifier: Send + Sync {
    /// Short description for logs and the status endpoint.
    fn name(&self) -> &str;

    /// Predicted class: 0 (absent) or 1 (present).
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError>;

    /// Class probabilities `[p_absent, p_present]`.
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ModelError>;
}

/// On-disk model document, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    DecisionTree(DecisionTree),
    Logistic(LogisticModel),
}

impl ModelArtifact {
    /// Validate the artifact and turn it into a shareable classifier.
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, ModelError> {
        Ok(match self {
            Self::DecisionTree(tree) => {
                tree.validate()?;
                Arc::new(tree) as Arc<dyn Classifier>
            }
            Self::Logistic(model) => {
                model.validate()?;
                Arc::new(model) as Arc<dyn Classifier>
            }
        })
    }
}

/// Read a JSON model artifact from disk.
pub fn load_model(path: &Path) -> Result<Arc<dyn Classifier>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing model artifact {}", path.display()))?;
    let model = artifact.into_classifier()?;
    info!(path = %path.display(), model = model.name(), "loaded classifier");
    Ok(model)
}

pub(crate) fn check_shape(actual: usize) -> Result<(), ModelError> {
    if actual == FEATURE_COUNT {
        Ok(())
    } else {
        Err(ModelError::Shape {
            expected: FEATURE_COUNT,
            actual,
        })
    }
}

pub(crate) fn check_finite(features: &FeatureVector) -> Result<(), ModelError> {
    match features.named().find(|(_, value)| !value.is_finite()) {
        Some((feature, value)) => Err(ModelError::NonFinite { feature, value }),
        None => Ok(()),
    }
}
