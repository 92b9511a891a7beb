//! Participant leaderboard
//!
//! Level 3 - Steps

use std::collections::BTreeMap;

use galaxy_core::EvaluationResult;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Titles by rank position, best first
pub const TIERS: &[&str] = &["Cosmic Champion", "Galaxy Explorer", "Space Cadet", "Rookie Agent"];

/// Title for ranks past the tier list
pub const FALLBACK_TITLE: &str = "Agent";

/// Standing of one participant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub participant: String,
    pub title: String,
    pub total_score: f64,
    pub missions_completed: usize,
    /// Subtotal per round number
    pub round_scores: BTreeMap<u32, f64>,
    /// Total score per mission
    pub average_score: f64,
}

/// Final standings sorted by total score (descending)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Top entry
    pub fn winner(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    /// Get top N entries
    pub fn top_n(&self, n: usize) -> &[LeaderboardEntry] {
        let n = n.min(self.entries.len());
        &self.entries[..n]
    }

    pub fn entry_for(&self, participant: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.participant == participant)
    }
}

#[derive(Default)]
struct Tally {
    total_score: f64,
    missions_completed: usize,
    round_scores: BTreeMap<u32, f64>,
}

/// Group results by participant and rank them.
///
/// Each item is `(participant, round_number, result)`. Equal totals are
/// ordered by participant name, so ranks are always the positions 1..n.
pub fn leaderboard<'a>(
    results: impl IntoIterator<Item = (&'a str, u32, &'a EvaluationResult)>,
) -> Leaderboard {
    let mut tallies: FxHashMap<&str, Tally> = FxHashMap::default();
    for (participant, round, result) in results {
        let tally = tallies.entry(participant).or_default();
        tally.total_score += result.total_score;
        tally.missions_completed += 1;
        *tally.round_scores.entry(round).or_insert(0.0) += result.total_score;
    }

    let mut standings: Vec<(&str, Tally)> = tallies.into_iter().collect();
    standings.sort_by(|(name_a, a), (name_b, b)| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| name_a.cmp(name_b))
    });

    let entries = standings
        .into_iter()
        .enumerate()
        .map(|(i, (participant, tally))| LeaderboardEntry {
            rank: i + 1,
            participant: participant.to_string(),
            title: TIERS.get(i).copied().unwrap_or(FALLBACK_TITLE).to_string(),
            average_score: tally.total_score / tally.missions_completed as f64,
            total_score: tally.total_score,
            missions_completed: tally.missions_completed,
            round_scores: tally.round_scores,
        })
        .collect();

    Leaderboard { entries }
}
