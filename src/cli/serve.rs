//! CLI entry-point for serving the prediction form.

use std::sync::Arc;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{api, config::Settings, pipeline::Runtime};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind (defaults to HEART_PORT or 8080).
    #[arg(long)]
    pub port: Option<u16>,
    /// Host address (defaults to HEART_HOST or localhost).
    #[arg(long)]
    pub host: Option<String>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let host = args.host.unwrap_or_else(|| settings.host.clone());
    let port = args.port.unwrap_or(settings.port);
    let runtime = Arc::new(Runtime::load(&settings));
    api::serve(runtime, host, port).await
}
