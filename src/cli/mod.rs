//! Command-line interface wiring for heart-risk.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod check;
pub mod predict;
pub mod schema;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Heart disease risk screening", long_about = None)]
pub struct Cli {
    /// Model artifact (overrides HEART_MODEL_PATH).
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    /// Normalization statistics (overrides HEART_STATS_PATH).
    #[arg(long, global = true)]
    stats: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        let settings = settings.with_artifacts(self.model, self.stats);
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Predict(args) => predict::run(args, settings).await,
            Commands::Check => check::run(settings).await,
            Commands::Schema => schema::run().await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the prediction form and JSON API.
    Serve(serve::Args),
    /// Run one prediction from command-line inputs.
    Predict(predict::Args),
    /// Load the artifacts and report whether prediction is available.
    Check,
    /// Print the form fields and feature order as JSON.
    Schema,
}
