//! CLI entry-point for verifying the startup artifacts.

use anyhow::{bail, Result};
use tracing::instrument;

use crate::{config::Settings, pipeline::Runtime};

#[instrument(skip(settings))]
pub async fn run(settings: Settings) -> Result<()> {
    let runtime = Runtime::load(&settings);
    let failures = runtime.load_failures();
    if failures.is_empty() {
        println!("model and mean/std values loaded; prediction available");
        return Ok(());
    }
    for failure in &failures {
        eprintln!("{failure}");
    }
    bail!("prediction unavailable: {} artifact(s) failed to load", failures.len())
}
