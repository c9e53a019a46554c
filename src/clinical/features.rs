//! Fixed-order feature vectors and the categorical encoder.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clinical::input::{Choice, RawInput};

pub const FEATURE_COUNT: usize = 13;

/// Feature order the model was trained on. Reordering this silently corrupts
/// every prediction.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Numeric model input, one value per entry of [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Value of a feature by name.
    pub fn get(&self, feature: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|name| *name == feature)
            .map(|idx| self.0[idx])
    }

    /// Pairs of feature name and value, in model order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(self.0.to_vec())
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn code<T: Choice>(choice: T) -> f64 {
    choice.position() as f64
}

/// Map a collected record onto the model's feature order.
///
/// Enumerated fields encode as their position in the declared choice list,
/// booleans as 1/0 and sex as its male indicator. Numeric fields pass through.
pub fn encode(input: &RawInput) -> FeatureVector {
    let vector = FeatureVector([
        input.age as f64,
        input.sex.indicator(),
        code(input.chest_pain_type),
        input.resting_blood_pressure as f64,
        input.cholesterol as f64,
        flag(input.fasting_blood_sugar_high),
        code(input.resting_ecg),
        input.max_heart_rate as f64,
        flag(input.exercise_induced_angina),
        input.st_depression,
        code(input.st_slope),
        input.major_vessels_count as f64,
        code(input.thalassemia),
    ]);
    debug!(features = ?vector.values(), "encoded raw input");
    vector
}
