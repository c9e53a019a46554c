//! CART decision tree stored as a flat node array.

use serde::{Deserialize, Serialize};

use crate::clinical::features::{FeatureVector, FEATURE_COUNT};

use super::{check_finite, check_shape, Classifier, ModelError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Go to `left` when `x[feature] <= threshold`, otherwise `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Training-sample class counts reaching this leaf.
    Leaf { counts: [f64; 2] },
}

/// Fitted binary decision tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Reject trees that could loop, index out of bounds or divide by zero.
    pub fn validate(&self) -> Result<(), ModelError> {
        check_shape(self.n_features)?;
        if self.nodes.is_empty() {
            return Err(ModelError::MalformedTree("no nodes".into()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(ModelError::MalformedTree(format!(
                            "node {idx} splits on feature {feature}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::MalformedTree(format!(
                            "node {idx} has threshold {threshold}"
                        )));
                    }
                    // Children strictly after their parent rules out cycles.
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ModelError::MalformedTree(format!(
                                "node {idx} points at node {child}"
                            )));
                        }
                    }
                }
                Node::Leaf { counts } => {
                    let total = counts[0] + counts[1];
                    if counts.iter().any(|c| !c.is_finite() || *c < 0.0) || total <= 0.0 {
                        return Err(ModelError::MalformedTree(format!(
                            "leaf {idx} has counts {counts:?}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf(&self, features: &FeatureVector) -> Result<[f64; 2], ModelError> {
        check_finite(features)?;
        let values = features.values();
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let next = if values[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                    if next <= idx {
                        return Err(ModelError::MalformedTree(format!(
                            "node {idx} points back at node {next}"
                        )));
                    }
                    idx = next;
                }
                Some(Node::Leaf { counts }) => return Ok(*counts),
                None => {
                    return Err(ModelError::MalformedTree(format!("missing node {idx}")));
                }
            }
        }
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &str {
        "decision_tree"
    }

    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError> {
        let counts = self.leaf(features)?;
        // Ties go to the first class.
        Ok(if counts[1] > counts[0] { 1 } else { 0 })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ModelError> {
        let counts = self.leaf(features)?;
        let total = counts[0] + counts[1];
        Ok([counts[0] / total, counts[1] / total])
    }
}
