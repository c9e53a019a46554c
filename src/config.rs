//! Runtime configuration utilities for heart-risk.

use std::{env, path::PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::logging::LogFormat;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Serialized classifier artifact.
    pub model_path: PathBuf,
    /// Per-feature mean/std table (`.json` or `.csv`).
    pub stats_path: PathBuf,
    /// Address the form server binds to.
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let model_path = env::var("HEART_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./artifacts/model.json"));
        let stats_path = env::var("HEART_STATS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./artifacts/mean_std.json"));
        let host = env::var("HEART_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("HEART_PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("parsing HEART_PORT={raw}"))?,
            Err(_) => 8080,
        };
        let log_format = match env::var("HEART_LOG_FORMAT") {
            Ok(raw) => raw.parse()?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self {
            model_path,
            stats_path,
            host,
            port,
            log_format,
        })
    }

    /// Apply command-line artifact overrides.
    pub fn with_artifacts(mut self, model: Option<PathBuf>, stats: Option<PathBuf>) -> Self {
        if let Some(path) = model {
            self.model_path = path;
        }
        if let Some(path) = stats {
            self.stats_path = path;
        }
        self
    }
}
