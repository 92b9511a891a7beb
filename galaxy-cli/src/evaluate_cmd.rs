//! Evaluate command - score a single submission file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::report;
use crate::setup::RoundArgs;

#[derive(Args)]
pub struct EvaluateArgs {
    /// Submission JSON file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub round: RoundArgs,

    /// Output the evaluation as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run evaluate command
pub fn run(args: EvaluateArgs) -> Result<()> {
    let mut evaluator = args.round.evaluator()?;

    let scored = evaluator
        .evaluate_file(&args.file)
        .with_context(|| format!("Failed to evaluate {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scored.result)?);
    } else {
        report::print_result(&scored.source, &scored.result);
    }
    Ok(())
}
