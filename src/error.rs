//! Error kinds surfaced by the inference pipeline.

use serde::Serialize;
use thiserror::Error;

use crate::clinical::stats::StatKind;

/// Every failure a submission or startup load can end in.
///
/// All variants are user-visible and non-fatal: the process keeps serving the
/// form and a new submission can be attempted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("error loading model from {path}: {reason}")]
    ModelLoadFailure { path: String, reason: String },
    #[error("error loading mean/std values from {path}: {reason}")]
    StatsLoadFailure { path: String, reason: String },
    #[error("model is not properly loaded ({reason})")]
    ModelUnavailable { reason: String },
    #[error("mean/std values are not properly loaded ({reason})")]
    StatsUnavailable { reason: String },
    #[error("no {kind} statistic for feature `{feature}`")]
    MissingStatistic { feature: String, kind: StatKind },
    #[error("{kind} statistic for feature `{feature}` is {value}; refusing to normalize")]
    DegenerateStatistic {
        feature: String,
        kind: StatKind,
        value: f64,
    },
    #[error("model invocation failed: {reason}")]
    Inference { reason: String },
    #[error("invalid value for `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },
}

impl PipelineError {
    /// Stable machine-readable identifier used by the JSON API.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ModelLoadFailure { .. } => ErrorKind::ModelLoadFailure,
            Self::StatsLoadFailure { .. } => ErrorKind::StatsLoadFailure,
            Self::ModelUnavailable { .. } => ErrorKind::ModelUnavailable,
            Self::StatsUnavailable { .. } => ErrorKind::StatsUnavailable,
            Self::MissingStatistic { .. } => ErrorKind::MissingStatistic,
            Self::DegenerateStatistic { .. } => ErrorKind::DegenerateStatistic,
            Self::Inference { .. } => ErrorKind::Inference,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ModelLoadFailure,
    StatsLoadFailure,
    ModelUnavailable,
    StatsUnavailable,
    MissingStatistic,
    DegenerateStatistic,
    Inference,
    InvalidInput,
}
