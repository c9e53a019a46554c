//! Shared DTOs for JSON responses.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    clinical::{form::FieldSpec, form::FIELDS, FeatureVector, FEATURE_COUNT, FEATURE_NAMES},
    error::{ErrorKind, PipelineError},
    pipeline::{Availability, Runtime, Stage, Submission},
    present::{Tone, Verdict},
};

#[derive(Debug, Clone, Serialize)]
pub struct FeaturesDto {
    pub raw: IndexMap<&'static str, f64>,
    pub normalized: IndexMap<&'static str, f64>,
}

fn named(vector: &FeatureVector) -> IndexMap<&'static str, f64> {
    vector.named().collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionDto {
    pub label: bool,
    pub verdict: Verdict,
    pub tone: Tone,
    pub headline: String,
    pub probabilities: [f64; 2],
    pub confidence: f64,
    pub features: FeaturesDto,
    pub stages: Vec<Stage>,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDto {
    pub error: String,
    pub kind: ErrorKind,
    pub stages: Vec<Stage>,
}

/// Body of `POST /api/predict` and `predict --json`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Prediction(PredictionDto),
    Failure(ErrorDto),
}

impl PredictResponse {
    pub fn from_submission(submission: &Submission) -> Self {
        let stages = submission.stages.clone();
        match &submission.outcome {
            Ok(report) => Self::Prediction(PredictionDto {
                label: report.result.label,
                verdict: report.presentation.verdict,
                tone: report.presentation.tone,
                headline: report.presentation.headline.clone(),
                probabilities: report.result.probabilities,
                confidence: report.presentation.confidence,
                features: FeaturesDto {
                    raw: named(&report.raw),
                    normalized: named(&report.normalized),
                },
                stages,
                evaluated_at: report.evaluated_at,
            }),
            Err(err) => Self::Failure(ErrorDto::new(err, stages)),
        }
    }
}

impl ErrorDto {
    pub fn new(err: &PipelineError, stages: Vec<Stage>) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind(),
            stages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactStatus {
    pub available: bool,
    pub detail: Option<String>,
    pub error: Option<String>,
}

impl ArtifactStatus {
    fn from_availability<T>(availability: &Availability<T>, describe: impl Fn(&T) -> String) -> Self {
        match availability {
            Availability::Ready(value) => Self {
                available: true,
                detail: Some(describe(value)),
                error: None,
            },
            Availability::Failed(err) => Self {
                available: false,
                detail: None,
                error: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusDto {
    pub ready: bool,
    pub model: ArtifactStatus,
    pub stats: ArtifactStatus,
}

impl StatusDto {
    pub fn of(runtime: &Runtime) -> Self {
        Self {
            ready: runtime.is_ready(),
            model: ArtifactStatus::from_availability(runtime.model(), |model| {
                model.name().to_string()
            }),
            stats: ArtifactStatus::from_availability(runtime.stats(), |stats| {
                format!("{} features", stats.mean.len())
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaDto {
    pub feature_order: [&'static str; FEATURE_COUNT],
    pub fields: Vec<FieldSpec>,
}

impl SchemaDto {
    pub fn current() -> Self {
        Self {
            feature_order: FEATURE_NAMES,
            fields: FIELDS.clone(),
        }
    }
}
