mod common;

use std::{path::PathBuf, sync::Arc};

use heart_risk::{
    clinical::{FeatureVector, NormalizationStats, RawInput},
    config::Settings,
    error::ErrorKind,
    logging::LogFormat,
    model::{Classifier, ModelError},
    present::{present, Tone, Verdict},
    Availability, PipelineError, PredictionResult, Runtime, Stage,
};

use common::{model_failed, ready, reference_input, RecordingModel, REFERENCE_VECTOR};

#[test]
fn reference_patient_reaches_the_model_unchanged() {
    let model = RecordingModel::new(1, [0.2, 0.8]);
    let runtime = ready(model.clone(), NormalizationStats::uniform(0.0, 1.0));

    let submission = runtime.submit(&reference_input());

    assert_eq!(
        submission.stages,
        vec![
            Stage::Submitted,
            Stage::Encoding,
            Stage::Normalizing,
            Stage::Predicting,
            Stage::Presented,
        ]
    );
    assert_eq!(model.seen(), vec![FeatureVector::new(REFERENCE_VECTOR)]);
    assert_eq!(model.proba_seen(), vec![FeatureVector::new(REFERENCE_VECTOR)]);
    let report = submission.outcome.unwrap();
    assert_eq!(report.normalized.values(), &REFERENCE_VECTOR);
    assert_eq!(
        report.result,
        PredictionResult {
            label: true,
            probabilities: [0.2, 0.8],
        }
    );
    assert_eq!(report.presentation.verdict, Verdict::Positive);
    assert_eq!(report.presentation.headline, "Prediction: Positive");
}

#[test]
fn missing_model_blocks_prediction_even_for_complete_input() {
    let runtime = model_failed(NormalizationStats::uniform(0.0, 1.0));
    let submission = runtime.submit(&reference_input());

    assert_eq!(submission.stages, vec![Stage::Submitted, Stage::Error]);
    let err = submission.outcome.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModelUnavailable);
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn missing_statistics_block_prediction_without_calling_the_model() {
    let model = RecordingModel::new(0, [0.9, 0.1]);
    let runtime = Runtime::from_parts(
        Availability::Ready(model.clone() as Arc<dyn Classifier>),
        Availability::Failed(PipelineError::StatsLoadFailure {
            path: "mean_std.json".into(),
            reason: "expected value at line 1 column 1".into(),
        }),
    );
    let submission = runtime.submit(&reference_input());

    assert_eq!(
        submission.outcome.unwrap_err().kind(),
        ErrorKind::StatsUnavailable
    );
    assert!(model.seen().is_empty());
    assert!(model.proba_seen().is_empty());
    assert_eq!(runtime.load_failures().len(), 1);
}

#[test]
fn degenerate_statistic_fails_while_normalizing() {
    let model = RecordingModel::new(0, [0.9, 0.1]);
    let mut stats = NormalizationStats::uniform(0.0, 1.0);
    stats.std.insert("oldpeak".into(), 0.0);
    let submission = ready(model.clone(), stats).submit(&reference_input());

    assert_eq!(
        submission.stages,
        vec![
            Stage::Submitted,
            Stage::Encoding,
            Stage::Normalizing,
            Stage::Error,
        ]
    );
    assert_eq!(
        submission.outcome.unwrap_err().kind(),
        ErrorKind::DegenerateStatistic
    );
    assert!(model.seen().is_empty());
}

struct BrokenModel;

impl Classifier for BrokenModel {
    fn name(&self) -> &str {
        "broken"
    }

    fn predict(&self, _features: &FeatureVector) -> Result<u8, ModelError> {
        Ok(1)
    }

    fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], ModelError> {
        Ok([0.7, 0.7])
    }
}

#[test]
fn invalid_probabilities_fail_while_predicting() {
    let runtime = Runtime::from_parts(
        Availability::Ready(Arc::new(BrokenModel) as Arc<dyn Classifier>),
        Availability::Ready(Arc::new(NormalizationStats::uniform(0.0, 1.0))),
    );
    let submission = runtime.submit(&reference_input());
    assert_eq!(submission.final_stage(), Stage::Error);
    assert_eq!(
        submission.stages[submission.stages.len() - 2],
        Stage::Predicting
    );
    assert_eq!(submission.outcome.unwrap_err().kind(), ErrorKind::Inference);
}

#[test]
fn out_of_range_input_is_never_submitted() {
    let model = RecordingModel::new(0, [0.9, 0.1]);
    let runtime = ready(model.clone(), NormalizationStats::uniform(0.0, 1.0));
    let input = RawInput {
        max_heart_rate: 250,
        ..reference_input()
    };
    let submission = runtime.submit(&input);
    assert_eq!(submission.stages, vec![Stage::Collecting]);
    assert_eq!(
        submission.outcome.unwrap_err(),
        PipelineError::InvalidInput {
            field: "max_heart_rate".into(),
            reason: "250 is outside [70, 220]".into(),
        }
    );
    assert!(model.seen().is_empty());
}

#[test]
fn runtime_is_reusable_across_submissions() {
    let model = RecordingModel::new(0, [0.6, 0.4]);
    let runtime = ready(model.clone(), NormalizationStats::uniform(0.0, 1.0));
    for _ in 0..3 {
        assert!(runtime.submit(&reference_input()).outcome.is_ok());
    }
    assert_eq!(model.seen().len(), 3);
}

#[test]
fn stage_table_allows_only_documented_transitions() {
    use Stage::*;
    assert!(Idle.can_advance_to(Collecting));
    assert!(Submitted.can_advance_to(Error));
    assert!(Normalizing.can_advance_to(Error));
    assert!(Predicting.can_advance_to(Error));
    assert!(Presented.can_advance_to(Idle));
    assert!(Error.can_advance_to(Idle));
    assert!(!Encoding.can_advance_to(Error));
    assert!(!Submitted.can_advance_to(Predicting));
    assert!(!Presented.can_advance_to(Submitted));
}

#[test]
fn presentation_maps_label_to_tone() {
    let positive = present(&PredictionResult {
        label: true,
        probabilities: [0.25, 0.75],
    });
    assert_eq!(positive.tone, Tone::Danger);
    assert_eq!(positive.tone.background(), "red");
    assert_eq!(positive.confidence, 0.75);

    let negative = present(&PredictionResult {
        label: false,
        probabilities: [0.75, 0.25],
    });
    assert_eq!(negative.verdict, Verdict::Negative);
    assert_eq!(negative.tone.background(), "green");
    assert_eq!(negative.summary(), "Prediction: Negative (confidence 75.0%)");
}

fn settings(model: &str, stats: &str) -> Settings {
    Settings {
        model_path: PathBuf::from(model),
        stats_path: PathBuf::from(stats),
        host: "127.0.0.1".into(),
        port: 0,
        log_format: LogFormat::Text,
    }
}

#[test]
fn load_failures_degrade_instead_of_aborting() {
    let runtime = Runtime::load(&settings(
        "artifacts/does-not-exist.json",
        "artifacts/mean_std.json",
    ));
    assert!(!runtime.is_ready());
    assert!(runtime.stats().is_ready());
    let failure = runtime.model().failure().unwrap();
    assert_eq!(failure.kind(), ErrorKind::ModelLoadFailure);
    assert_eq!(
        runtime.submit(&reference_input()).outcome.unwrap_err().kind(),
        ErrorKind::ModelUnavailable
    );
}

#[test]
fn bundled_artifacts_produce_a_prediction() {
    let runtime = Runtime::load(&settings("artifacts/model.json", "artifacts/mean_std.csv"));
    assert!(runtime.is_ready());
    let report = runtime.submit(&reference_input()).outcome.unwrap();
    assert_eq!(report.presentation.verdict, Verdict::Negative);
    let total: f64 = report.result.probabilities.iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
}
