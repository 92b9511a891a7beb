//! Galaxy Tournament - Batch evaluation and standings
//!
//! This crate runs scoring over many submissions:
//! - Batch evaluation with a write-once per-task result cache
//! - Round aggregation and the persisted results document
//! - Participant leaderboard with tier titles
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: MissionEvaluator::evaluate_directory (orchestration)
//! - Level 2: evaluate_file, evaluate_document (phases)
//! - Level 3: aggregate, leaderboard (steps)
//! - Level 4: output document, utilities

mod aggregate;
mod batch;
mod error;
mod leaderboard;
mod output;

pub use aggregate::{aggregate, AggregatedReport};
pub use batch::{BatchOutcome, MissionEvaluator, ScoredMission};
pub use error::MissionError;
pub use leaderboard::{leaderboard, Leaderboard, LeaderboardEntry, FALLBACK_TITLE, TIERS};
pub use output::{AggregatedOutput, DetailedResult};
