//! Batch command - score a directory of submissions
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: evaluate_directory(), save_output()
//! - Level 3: per-file evaluation (in galaxy-tournament)
//! - Level 4: report formatting

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use galaxy_tournament::{aggregate, AggregatedOutput};

use crate::report;
use crate::setup::RoundArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BatchArgs {
    /// Directory containing submission files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// File-name pattern (`*` wildcards); defaults to the mission naming conventions
    #[arg(long)]
    pub pattern: Option<String>,

    #[command(flatten)]
    pub round: RoundArgs,

    /// Where to write the aggregated results document
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Participant name recorded in the results document
    #[arg(long)]
    pub participant: Option<String>,

    /// Print the aggregated document as JSON instead of text reports
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run batch command
///
/// 1. Build the round evaluator (fails without a task table)
/// 2. Evaluate every matching file
/// 3. Save and report the aggregated document
pub fn run(args: BatchArgs) -> Result<()> {
    let mut evaluator = args.round.evaluator()?;
    let round_number = evaluator.round().round_number;

    let outcome = evaluator
        .evaluate_directory(&args.directory, args.pattern.as_deref())
        .with_context(|| format!("Failed to read directory {}", args.directory.display()))?;

    if outcome.found == 0 {
        bail!("No submission files found in {}", args.directory.display());
    }
    if outcome.succeeded == 0 {
        bail!("None of the {} submission files could be evaluated", outcome.found);
    }

    let timestamp = chrono::Local::now().to_rfc3339();
    let mut output = AggregatedOutput::from_missions(round_number, evaluator.scored_missions(), timestamp);
    if let Some(participant) = &args.participant {
        output = output.with_participant(participant.as_str());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(AggregatedOutput::default_file_name(round_number)));
    output
        .save(&path)
        .with_context(|| format!("Failed to save results: {}", path.display()))?;
    tracing::info!("Results saved to {}", path.display());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for scored in &outcome.results {
            report::print_result(&scored.source, &scored.result);
        }
        report::print_batch_summary(&outcome, &aggregate(output.results()));
    }
    Ok(())
}
