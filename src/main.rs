//! Entry point wiring CLI dispatch to the inference pipeline.

use anyhow::Result;
use heart_risk::{cli::Cli, config::Settings, logging};
use tracing::{info, instrument};

#[tokio::main]
#[instrument]
async fn main() -> Result<()> {
    let settings = Settings::load()?;
    logging::init_tracing(settings.log_format)?;
    let cli = Cli::parse();

    info!(?cli, "starting command");
    cli.dispatch(settings).await
}
