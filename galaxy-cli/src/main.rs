//! Galaxy Judge CLI - Command-line interface
//!
//! Commands:
//! - evaluate: Score one submission file
//! - batch: Score a directory of submissions and save the round document
//! - leaderboard: Rank participants from saved round documents
//! - validate: Lint submission files before they are scored
//! - example: Write a sample submission

mod batch_cmd;
mod evaluate_cmd;
mod example_cmd;
mod leaderboard_cmd;
mod report;
mod setup;
mod validate_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "galaxy-judge")]
#[command(about = "Scores hackathon mission submissions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one submission file
    Evaluate(evaluate_cmd::EvaluateArgs),
    /// Score every submission in a directory
    Batch(batch_cmd::BatchArgs),
    /// Rank participants from saved round documents
    Leaderboard(leaderboard_cmd::LeaderboardArgs),
    /// Check submission files against the submission format
    Validate(validate_cmd::ValidateArgs),
    /// Write a sample submission
    Example(example_cmd::ExampleArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate(args) => evaluate_cmd::run(args),
        Commands::Batch(args) => batch_cmd::run(args),
        Commands::Leaderboard(args) => leaderboard_cmd::run(args),
        Commands::Validate(args) => validate_cmd::run(args),
        Commands::Example(args) => example_cmd::run(args),
    }
}
