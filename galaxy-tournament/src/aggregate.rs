//! Round aggregation - totals across evaluated missions

use galaxy_core::EvaluationResult;
use serde::{Deserialize, Serialize};

/// Totals over a set of results
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedReport {
    pub missions_completed: usize,
    pub total_score: f64,
    pub max_possible_score: f64,
    /// Mean of the per-mission percentages (0 when there are none)
    pub average_score: f64,
    pub total_api_calls: usize,
}

/// Sum scores and calls, average percentages
pub fn aggregate<'a>(results: impl IntoIterator<Item = &'a EvaluationResult>) -> AggregatedReport {
    let mut report = AggregatedReport::default();
    let mut percentage_sum = 0.0;

    for result in results {
        report.missions_completed += 1;
        report.total_score += result.total_score;
        report.max_possible_score += result.max_score;
        report.total_api_calls += result.api_calls_used;
        percentage_sum += result.percentage;
    }

    if report.missions_completed > 0 {
        report.average_score = percentage_sum / report.missions_completed as f64;
    }
    report
}
