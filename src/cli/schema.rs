//! CLI entry-point for printing the form schema.

use anyhow::{Context, Result};

use crate::api::types::SchemaDto;

pub async fn run() -> Result<()> {
    let schema = SchemaDto::current();
    println!(
        "{}",
        serde_json::to_string_pretty(&schema).context("serializing schema")?
    );
    Ok(())
}
