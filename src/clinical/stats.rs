//! Reference statistics and z-score normalization.

use std::{fmt, fs::File, io::Read, path::Path};

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    clinical::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES},
    error::PipelineError,
};

/// Which of the two statistics a lookup refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Mean,
    Std,
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean => f.write_str("mean"),
            Self::Std => f.write_str("std"),
        }
    }
}

/// Per-feature mean and standard deviation from the training data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub mean: IndexMap<String, f64>,
    pub std: IndexMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct StatRow {
    feature: String,
    mean: f64,
    std: f64,
}

impl NormalizationStats {
    /// Same mean and std for every model feature.
    pub fn uniform(mean: f64, std: f64) -> Self {
        Self {
            mean: FEATURE_NAMES.iter().map(|f| (f.to_string(), mean)).collect(),
            std: FEATURE_NAMES.iter().map(|f| (f.to_string(), std)).collect(),
        }
    }

    /// Load statistics from a `.json` or `.csv` file.
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let stats = match ext.as_deref() {
            Some("json") => Self::from_json_reader(file)?,
            Some("csv") => Self::from_csv_reader(file)?,
            _ => bail!(
                "unsupported statistics format for {} (expected .json or .csv)",
                path.display()
            ),
        };
        for feature in stats.unknown_features() {
            warn!(%feature, "statistics entry does not name a model feature");
        }
        info!(
            path = %path.display(),
            features = stats.mean.len(),
            "loaded normalization statistics"
        );
        Ok(stats)
    }

    /// Parse `{"mean": {feature: value}, "std": {feature: value}}`.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("parsing statistics json")
    }

    /// Parse a `feature,mean,std` table.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut stats = Self::default();
        for result in reader.deserialize::<StatRow>() {
            let row = result.context("parsing statistics csv row")?;
            if stats.mean.contains_key(&row.feature) {
                bail!("duplicate statistics row for `{}`", row.feature);
            }
            stats.mean.insert(row.feature.clone(), row.mean);
            stats.std.insert(row.feature, row.std);
        }
        Ok(stats)
    }

    /// Entries that do not correspond to any model feature.
    pub fn unknown_features(&self) -> Vec<&str> {
        self.mean
            .keys()
            .chain(self.std.keys().filter(|k| !self.mean.contains_key(*k)))
            .map(String::as_str)
            .filter(|name| !FEATURE_NAMES.iter().any(|known| known == name))
            .collect()
    }

    /// Look up one statistic, rejecting missing and unusable values.
    pub fn lookup(&self, feature: &str, kind: StatKind) -> Result<f64, PipelineError> {
        let table = match kind {
            StatKind::Mean => &self.mean,
            StatKind::Std => &self.std,
        };
        let value = *table
            .get(feature)
            .ok_or_else(|| PipelineError::MissingStatistic {
                feature: feature.to_string(),
                kind,
            })?;
        let degenerate = match kind {
            StatKind::Mean => !value.is_finite(),
            StatKind::Std => !value.is_finite() || value == 0.0,
        };
        if degenerate {
            return Err(PipelineError::DegenerateStatistic {
                feature: feature.to_string(),
                kind,
                value,
            });
        }
        Ok(value)
    }
}

fn per_feature(
    vector: &FeatureVector,
    stats: &NormalizationStats,
    apply: impl Fn(f64, f64, f64) -> f64,
) -> Result<FeatureVector, PipelineError> {
    let mut out = [0.0; FEATURE_COUNT];
    for (idx, (feature, value)) in vector.named().enumerate() {
        let mean = stats.lookup(feature, StatKind::Mean)?;
        let std = stats.lookup(feature, StatKind::Std)?;
        let scaled = apply(value, mean, std);
        // A tiny but nonzero std can still overflow.
        if !scaled.is_finite() {
            return Err(PipelineError::DegenerateStatistic {
                feature: feature.to_string(),
                kind: StatKind::Std,
                value: std,
            });
        }
        out[idx] = scaled;
    }
    Ok(FeatureVector::new(out))
}

/// `(raw - mean) / std` for every feature.
pub fn normalize(
    raw: &FeatureVector,
    stats: &NormalizationStats,
) -> Result<FeatureVector, PipelineError> {
    per_feature(raw, stats, |value, mean, std| (value - mean) / std)
}

/// Inverse of [`normalize`].
pub fn denormalize(
    normalized: &FeatureVector,
    stats: &NormalizationStats,
) -> Result<FeatureVector, PipelineError> {
    per_feature(normalized, stats, |value, mean, std| value * std + mean)
}
