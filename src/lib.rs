//! Heart disease risk screening: form collection, feature encoding,
//! z-score normalization and classification.

pub mod api;
pub mod cli;
pub mod clinical;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod present;

pub use error::PipelineError;
pub use pipeline::{Availability, PredictionResult, Runtime, Stage, Submission};
