//! Clinical input collection, encoding and normalization.

pub mod features;
pub mod form;
pub mod input;
pub mod stats;

pub use features::{encode, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use input::{ChestPainType, Choice, RawInput, RestingEcg, Sex, StSlope, Thalassemia};
pub use stats::{denormalize, normalize, NormalizationStats, StatKind};
