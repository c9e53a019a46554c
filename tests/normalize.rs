mod common;

use std::io::Write;

use heart_risk::{
    clinical::{
        denormalize, encode, normalize, FeatureVector, NormalizationStats, StatKind,
        FEATURE_COUNT,
    },
    PipelineError,
};
use proptest::prelude::*;

use common::{reference_input, REFERENCE_VECTOR};

#[test]
fn unit_statistics_leave_the_vector_unchanged() {
    let raw = encode(&reference_input());
    let normalized = normalize(&raw, &NormalizationStats::uniform(0.0, 1.0)).unwrap();
    assert_eq!(normalized.values(), &REFERENCE_VECTOR);
}

#[test]
fn normalization_is_a_z_score() {
    let mut stats = NormalizationStats::uniform(0.0, 1.0);
    stats.mean.insert("age".into(), 54.0);
    stats.std.insert("age".into(), 8.0);
    let normalized = normalize(&encode(&reference_input()), &stats).unwrap();
    assert_eq!(normalized.get("age"), Some(-0.5));
}

#[test]
fn missing_std_entry_is_reported_by_name() {
    let mut stats = NormalizationStats::uniform(0.0, 1.0);
    stats.std.shift_remove("thal");
    let err = normalize(&encode(&reference_input()), &stats).unwrap_err();
    assert_eq!(
        err,
        PipelineError::MissingStatistic {
            feature: "thal".into(),
            kind: StatKind::Std,
        }
    );
}

#[test]
fn zero_std_is_degenerate_not_infinite() {
    let mut stats = NormalizationStats::uniform(0.0, 1.0);
    stats.std.insert("chol".into(), 0.0);
    match normalize(&encode(&reference_input()), &stats) {
        Err(PipelineError::DegenerateStatistic { feature, kind, .. }) => {
            assert_eq!(feature, "chol");
            assert_eq!(kind, StatKind::Std);
        }
        other => panic!("expected degenerate statistic, got {other:?}"),
    }
}

#[test]
fn non_finite_mean_is_degenerate() {
    let mut stats = NormalizationStats::uniform(0.0, 1.0);
    stats.mean.insert("age".into(), f64::NAN);
    let err = normalize(&encode(&reference_input()), &stats).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::DegenerateStatistic {
            kind: StatKind::Mean,
            ..
        }
    ));
}

#[test]
fn overflowing_std_is_degenerate() {
    let mut stats = NormalizationStats::uniform(0.0, 1.0);
    stats.std.insert("chol".into(), 1e-310);
    let err = normalize(&encode(&reference_input()), &stats).unwrap_err();
    assert_eq!(
        err,
        PipelineError::DegenerateStatistic {
            feature: "chol".into(),
            kind: StatKind::Std,
            value: 1e-310,
        }
    );
}

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn json_and_csv_stores_load_identically() {
    let json = NormalizationStats::load(std::path::Path::new("artifacts/mean_std.json")).unwrap();
    let csv = NormalizationStats::load(std::path::Path::new("artifacts/mean_std.csv")).unwrap();
    assert_eq!(json, csv);
    assert!(json.unknown_features().is_empty());
    assert!(normalize(&encode(&reference_input()), &json).is_ok());
}

#[test]
fn unknown_entries_are_kept_but_flagged() {
    let file = write_temp(
        ".csv",
        "feature,mean,std\nage,50,10\nheight,170,9\n",
    );
    let stats = NormalizationStats::load(file.path()).unwrap();
    assert_eq!(stats.unknown_features(), vec!["height"]);
    assert_eq!(stats.mean.get("age"), Some(&50.0));
}

#[test]
fn duplicate_csv_rows_fail_to_load() {
    let file = write_temp(".csv", "feature,mean,std\nage,50,10\nage,51,10\n");
    assert!(NormalizationStats::load(file.path()).is_err());
}

#[test]
fn unsupported_extension_fails_to_load() {
    let file = write_temp(".pkl", "not a pickle");
    let err = NormalizationStats::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("unsupported statistics format"));
}

prop_compose! {
    fn stats_and_vector()(
        means in prop::collection::vec(-500.0f64..500.0, FEATURE_COUNT),
        stds in prop::collection::vec(0.01f64..100.0, FEATURE_COUNT),
        values in prop::collection::vec(-1000.0f64..1000.0, FEATURE_COUNT),
    ) -> (NormalizationStats, FeatureVector) {
        let mut stats = NormalizationStats::uniform(0.0, 1.0);
        for (idx, name) in heart_risk::clinical::FEATURE_NAMES.iter().enumerate() {
            stats.mean.insert(name.to_string(), means[idx]);
            stats.std.insert(name.to_string(), stds[idx]);
        }
        let mut raw = [0.0; FEATURE_COUNT];
        raw.copy_from_slice(&values);
        (stats, FeatureVector::new(raw))
    }
}

proptest! {
    #[test]
    fn denormalizing_recovers_the_raw_vector((stats, raw) in stats_and_vector()) {
        let normalized = normalize(&raw, &stats).unwrap();
        let restored = denormalize(&normalized, &stats).unwrap();
        for ((name, original), back) in raw.named().zip(restored.values()) {
            let tolerance = 1e-9 * original.abs().max(1.0);
            prop_assert!((original - back).abs() <= tolerance, "{} drifted: {} vs {}", name, original, back);
        }
    }
}
