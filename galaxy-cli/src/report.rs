//! Text reports printed to stdout

use galaxy_core::{Dimension, EvaluationResult};
use galaxy_tournament::{AggregatedReport, BatchOutcome, Leaderboard};

/// Print a single evaluation
pub fn print_result(source: &str, result: &EvaluationResult) {
    println!("\n=== Task {} ({}) ===", result.task_id, source);
    for dimension in Dimension::ALL {
        println!(
            "{:<12} {:.1}/{:.0}",
            format!("{}:", label(dimension)),
            result.score(dimension),
            result.max_scores.get(dimension)
        );
    }
    println!("{:<12} {:.1}/{:.0}", "Total:", result.total_score, result.max_score);
    println!("{:<12} {:.1}%", "Percentage:", result.percentage);

    let details = &result.evaluation_details;
    println!(
        "API calls: {} | Droid: {} | Balance: {} | Items: {}",
        details.api_calls,
        details.droid_location.as_deref().unwrap_or("-"),
        details
            .remaining_balance
            .map_or_else(|| "-".to_string(), |b| format!("{:.0}", b)),
        details.inventory_items
    );
    if !details.tools_used.is_empty() {
        println!("Tools: {}", details.tools_used.join(", "));
    }
}

/// Print counts and totals of a batch run
pub fn print_batch_summary(outcome: &BatchOutcome, summary: &AggregatedReport) {
    println!("\n=== Batch Summary ===");
    println!("Found:      {}", outcome.found);
    println!("Succeeded:  {}", outcome.succeeded);
    println!("Failed:     {}", outcome.failed);
    println!(
        "Total score: {:.1}/{:.0}",
        summary.total_score, summary.max_possible_score
    );
    println!("Average:    {:.1}%", summary.average_score);
    println!("Missions:   {}", summary.missions_completed);
}

/// Print standings as a table
pub fn print_leaderboard(board: &Leaderboard, top: Option<usize>) {
    let entries = match top {
        Some(n) => board.top_n(n),
        None => &board.entries[..],
    };

    println!("\n=== Leaderboard ===");
    println!(
        "{:>4}  {:<20} {:<16} {:>9} {:>8} {:>8}",
        "Rank", "Participant", "Title", "Total", "Missions", "Average"
    );
    for entry in entries {
        println!(
            "{:>4}  {:<20} {:<16} {:>9.1} {:>8} {:>8.1}",
            entry.rank,
            entry.participant,
            entry.title,
            entry.total_score,
            entry.missions_completed,
            entry.average_score
        );
        let rounds: Vec<String> = entry
            .round_scores
            .iter()
            .map(|(round, score)| format!("R{} {:.1}", round, score))
            .collect();
        println!("      {}", rounds.join(" | "));
    }
}

fn label(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Correctness => "Correctness",
        Dimension::Efficiency => "Efficiency",
        Dimension::Quality => "Quality",
    }
}
