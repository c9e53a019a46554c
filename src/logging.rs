//! Structured logging bootstrap using `tracing`.

use std::str::FromStr;

use anyhow::{bail, Result};
use serde::Deserialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Output format of the log stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format `{other}` (expected text or json)"),
        }
    }
}

/// Install a global tracing subscriber.
///
/// `HEART_LOG` takes precedence over `RUST_LOG`; both default to `info`.
/// Logs go to stderr so `predict --json` output stays machine-readable.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_env("HEART_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new("info"))?;

    let timer = fmt::time::UtcTime::rfc_3339();

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(timer)
        .with_level(true)
        .with_line_number(true)
        .with_file(true);

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer.with_filter(env_filter))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json().with_filter(env_filter))
            .init(),
    }

    tracing::debug!(?format, "tracing initialised");
    Ok(())
}
