//! Startup-loaded runtime and the per-submission inference pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    clinical::{encode, normalize, FeatureVector, NormalizationStats, RawInput},
    config::Settings,
    error::PipelineError,
    model::{self, Classifier},
    present::{present, Presentation},
};

const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Outcome of a startup load, consulted at every submission.
#[derive(Clone)]
pub enum Availability<T> {
    Ready(T),
    Failed(PipelineError),
}

impl<T> Availability<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn failure(&self) -> Option<&PipelineError> {
        match self {
            Self::Ready(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// Binary classification with its class probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Disease present.
    pub label: bool,
    /// `[p_absent, p_present]`.
    pub probabilities: [f64; 2],
}

impl PredictionResult {
    /// Probability assigned to the predicted class.
    pub fn confidence(&self) -> f64 {
        if self.label {
            self.probabilities[1]
        } else {
            self.probabilities[0]
        }
    }
}

/// Per-request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Collecting,
    Submitted,
    Encoding,
    Normalizing,
    Predicting,
    Presented,
    Error,
}

impl Stage {
    pub fn can_advance_to(self, next: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, next),
            (Idle, Collecting)
                | (Collecting, Submitted)
                | (Submitted, Encoding)
                | (Encoding, Normalizing)
                | (Normalizing, Predicting)
                | (Predicting, Presented)
                | (Submitted | Normalizing | Predicting, Error)
                | (Presented | Error, Idle)
        )
    }
}

struct Trail(Vec<Stage>);

impl Trail {
    fn advance(&mut self, next: Stage) {
        let current = self.0.last().copied().unwrap_or(Stage::Idle);
        debug_assert!(
            current.can_advance_to(next),
            "illegal stage transition {current:?} -> {next:?}"
        );
        debug!(from = ?current, to = ?next, "request stage");
        self.0.push(next);
    }
}

/// Everything a successful submission produced.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub raw: FeatureVector,
    pub normalized: FeatureVector,
    pub result: PredictionResult,
    pub presentation: Presentation,
    pub evaluated_at: DateTime<Utc>,
}

/// One submission: the stages it passed through and how it ended.
#[derive(Debug, Clone)]
pub struct Submission {
    pub stages: Vec<Stage>,
    pub outcome: Result<Report, PipelineError>,
}

impl Submission {
    /// Input that never left `Collecting`.
    pub fn rejected(err: PipelineError) -> Self {
        Self {
            stages: vec![Stage::Collecting],
            outcome: Err(err),
        }
    }

    pub fn final_stage(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Idle)
    }
}

/// Model and statistics, loaded once and shared read-only.
#[derive(Clone)]
pub struct Runtime {
    model: Availability<Arc<dyn Classifier>>,
    stats: Availability<Arc<NormalizationStats>>,
}

impl Runtime {
    /// Load both artifacts. Failures degrade the runtime instead of aborting.
    pub fn load(settings: &Settings) -> Self {
        let model = match model::load_model(&settings.model_path) {
            Ok(model) => Availability::Ready(model),
            Err(err) => {
                let err = PipelineError::ModelLoadFailure {
                    path: settings.model_path.display().to_string(),
                    reason: format!("{err:#}"),
                };
                error!(%err, "prediction disabled");
                Availability::Failed(err)
            }
        };
        let stats = match NormalizationStats::load(&settings.stats_path) {
            Ok(stats) => Availability::Ready(Arc::new(stats)),
            Err(err) => {
                let err = PipelineError::StatsLoadFailure {
                    path: settings.stats_path.display().to_string(),
                    reason: format!("{err:#}"),
                };
                error!(%err, "prediction disabled");
                Availability::Failed(err)
            }
        };
        Self { model, stats }
    }

    pub fn from_parts(
        model: Availability<Arc<dyn Classifier>>,
        stats: Availability<Arc<NormalizationStats>>,
    ) -> Self {
        Self { model, stats }
    }

    pub fn model(&self) -> &Availability<Arc<dyn Classifier>> {
        &self.model
    }

    pub fn stats(&self) -> &Availability<Arc<NormalizationStats>> {
        &self.stats
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_ready() && self.stats.is_ready()
    }

    /// Startup failures, for display next to the form.
    pub fn load_failures(&self) -> Vec<&PipelineError> {
        self.model
            .failure()
            .into_iter()
            .chain(self.stats.failure())
            .collect()
    }

    /// Run one explicit submission from `Submitted` to `Presented` or `Error`.
    ///
    /// A record failing domain validation is never submitted; it stays in
    /// `Collecting`.
    pub fn submit(&self, input: &RawInput) -> Submission {
        if let Err(err) = input.validate() {
            warn!(%err, "rejected form input");
            return Submission::rejected(err);
        }
        let mut trail = Trail(vec![Stage::Submitted]);
        let outcome = self.run(input, &mut trail);
        match &outcome {
            Ok(report) => info!(
                verdict = ?report.presentation.verdict,
                confidence = report.result.confidence(),
                "prediction presented"
            ),
            Err(err) => {
                warn!(%err, kind = ?err.kind(), "submission failed");
                trail.advance(Stage::Error);
            }
        }
        Submission {
            stages: trail.0,
            outcome,
        }
    }

    fn run(&self, input: &RawInput, trail: &mut Trail) -> Result<Report, PipelineError> {
        let model = match &self.model {
            Availability::Ready(model) => model,
            Availability::Failed(cause) => {
                return Err(PipelineError::ModelUnavailable {
                    reason: cause.to_string(),
                })
            }
        };
        let stats = match &self.stats {
            Availability::Ready(stats) => stats,
            Availability::Failed(cause) => {
                return Err(PipelineError::StatsUnavailable {
                    reason: cause.to_string(),
                })
            }
        };

        trail.advance(Stage::Encoding);
        let raw = encode(input);

        trail.advance(Stage::Normalizing);
        let normalized = normalize(&raw, stats)?;

        trail.advance(Stage::Predicting);
        let result = predict(model.as_ref(), &normalized)?;

        trail.advance(Stage::Presented);
        Ok(Report {
            raw,
            normalized,
            result,
            presentation: present(&result),
            evaluated_at: Utc::now(),
        })
    }
}

fn inference(err: impl ToString) -> PipelineError {
    PipelineError::Inference {
        reason: err.to_string(),
    }
}

/// Ask the classifier for both its label and its class probabilities.
pub fn predict(
    model: &dyn Classifier,
    features: &FeatureVector,
) -> Result<PredictionResult, PipelineError> {
    let label = match model.predict(features).map_err(inference)? {
        0 => false,
        1 => true,
        other => return Err(inference(format!("label {other} is not 0 or 1"))),
    };
    let probabilities = model.predict_proba(features).map_err(inference)?;
    let total = probabilities[0] + probabilities[1];
    if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0)
        || (total - 1.0).abs() > PROBABILITY_TOLERANCE
    {
        return Err(inference(format!(
            "probabilities {probabilities:?} do not form a distribution"
        )));
    }
    Ok(PredictionResult {
        label,
        probabilities,
    })
}
