//! Example command - write a sample submission

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use galaxy_extract::example_submission;

#[derive(Args)]
pub struct ExampleArgs {
    /// Task id of the sample
    #[arg(long, default_value = "1")]
    pub task_id: u32,

    /// Output file (default: mission_<task_id>.json)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Run example command
pub fn run(args: ExampleArgs) -> Result<()> {
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("mission_{}.json", args.task_id)));

    let json = serde_json::to_string_pretty(&example_submission(args.task_id))?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write example: {}", path.display()))?;

    tracing::info!("Example submission for task {} written to {}", args.task_id, path.display());
    Ok(())
}
