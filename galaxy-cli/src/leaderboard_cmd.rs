//! Leaderboard command - rank participants from saved round documents

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use galaxy_tournament::{leaderboard, AggregatedOutput};

use crate::report;

#[derive(Args)]
pub struct LeaderboardArgs {
    /// Aggregated results documents (one per participant and round)
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Only show the top N participants
    #[arg(long)]
    pub top: Option<usize>,

    /// Output the leaderboard as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run leaderboard command
pub fn run(args: LeaderboardArgs) -> Result<()> {
    let documents = load_documents(&args.files)?;

    let board = leaderboard(documents.iter().flat_map(|(participant, doc)| {
        doc.results()
            .map(move |result| (participant.as_str(), doc.round_number, result))
    }));
    tracing::info!(
        "Ranked {} participants from {} documents",
        board.entries.len(),
        documents.len()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        report::print_leaderboard(&board, args.top);
    }
    Ok(())
}

/// Load every document with the participant it belongs to
fn load_documents(files: &[PathBuf]) -> Result<Vec<(String, AggregatedOutput)>> {
    files
        .iter()
        .map(|path| {
            let doc = AggregatedOutput::load(path)
                .with_context(|| format!("Failed to load results: {}", path.display()))?;
            let participant = doc
                .participant
                .clone()
                .unwrap_or_else(|| participant_from_path(path));
            Ok((participant, doc))
        })
        .collect()
}

/// Documents without a participant are named after their file
fn participant_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
