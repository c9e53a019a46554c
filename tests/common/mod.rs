#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use heart_risk::{
    clinical::{
        ChestPainType, FeatureVector, NormalizationStats, RawInput, RestingEcg, Sex, StSlope,
        Thalassemia,
    },
    model::{Classifier, ModelError},
    Availability, PipelineError, Runtime,
};

/// Classifier double that records every vector it is asked to label.
pub struct RecordingModel {
    seen: Mutex<Vec<FeatureVector>>,
    proba_seen: Mutex<Vec<FeatureVector>>,
    label: u8,
    probabilities: [f64; 2],
}

impl RecordingModel {
    pub fn new(label: u8, probabilities: [f64; 2]) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            proba_seen: Mutex::new(Vec::new()),
            label,
            probabilities,
        })
    }

    pub fn seen(&self) -> Vec<FeatureVector> {
        self.seen.lock().unwrap().clone()
    }

    pub fn proba_seen(&self) -> Vec<FeatureVector> {
        self.proba_seen.lock().unwrap().clone()
    }
}

impl Classifier for RecordingModel {
    fn name(&self) -> &str {
        "recording"
    }

    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError> {
        self.seen.lock().unwrap().push(*features);
        Ok(self.label)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ModelError> {
        self.proba_seen.lock().unwrap().push(*features);
        Ok(self.probabilities)
    }
}

pub fn ready(model: Arc<RecordingModel>, stats: NormalizationStats) -> Runtime {
    Runtime::from_parts(
        Availability::Ready(model as Arc<dyn Classifier>),
        Availability::Ready(Arc::new(stats)),
    )
}

pub fn model_failed(stats: NormalizationStats) -> Runtime {
    Runtime::from_parts(
        Availability::Failed(PipelineError::ModelLoadFailure {
            path: "missing.json".into(),
            reason: "No such file or directory".into(),
        }),
        Availability::Ready(Arc::new(stats)),
    )
}

/// The documented reference patient.
pub fn reference_input() -> RawInput {
    RawInput {
        age: 50,
        sex: Sex::Male,
        chest_pain_type: ChestPainType::TypicalAngina,
        resting_blood_pressure: 120,
        cholesterol: 250,
        fasting_blood_sugar_high: false,
        resting_ecg: RestingEcg::Normal,
        max_heart_rate: 150,
        exercise_induced_angina: false,
        st_depression: 1.0,
        st_slope: StSlope::Upsloping,
        major_vessels_count: 1,
        thalassemia: Thalassemia::Normal,
    }
}

pub const REFERENCE_VECTOR: [f64; 13] = [
    50.0, 1.0, 0.0, 120.0, 250.0, 0.0, 0.0, 150.0, 0.0, 1.0, 0.0, 1.0, 0.0,
];
