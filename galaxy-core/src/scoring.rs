//! Scoring engine - correctness, efficiency and quality of a mission
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: ScoringEngine::evaluate (orchestration)
//! - Level 2: score_correctness, score_efficiency, score_quality (dimensions)
//! - Level 3: quality factors, correctness outcome
//! - Level 4: rounding and clamping utilities
//!
//! Evaluation is a pure function of (record, task, round): the same inputs
//! always produce the same result.

use serde::{Deserialize, Serialize};

use crate::mission::MissionRecord;
use crate::round::{Dimension, RoundConfig};
use crate::rules::TaskRuleRegistry;
use crate::state::{WorldState, PRIMARY_DROID};
use crate::task::TaskDefinition;

/// Share of the correctness ceiling for a task without a registered rule
const UNREGISTERED_CREDIT: f64 = 0.6;
/// Share of the correctness ceiling for an unmet objective with attempt evidence
const ATTEMPT_CREDIT: f64 = 0.3;
/// Share of the quality ceiling for an empty response
const EMPTY_RESPONSE_CREDIT: f64 = 0.1;
/// Quality floor once the agent recognized the goal was already met
const OPTIMAL_RECOGNITION_FLOOR: f64 = 0.9;
/// Any call count up to this is a check-then-act pattern
const OPTIMAL_CALLS: usize = 2;

const MIN_RESPONSE_CHARS: usize = 30;
const MAX_RESPONSE_CHARS: usize = 500;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Per-dimension ceilings for one task
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaxScores {
    pub correctness_max: f64,
    pub efficiency_max: f64,
    pub quality_max: f64,
}

impl MaxScores {
    pub fn for_task(max_score: f64, round: &RoundConfig) -> Self {
        Self {
            correctness_max: round.dimension_max(max_score, Dimension::Correctness),
            efficiency_max: round.dimension_max(max_score, Dimension::Efficiency),
            quality_max: round.dimension_max(max_score, Dimension::Quality),
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Correctness => self.correctness_max,
            Dimension::Efficiency => self.efficiency_max,
            Dimension::Quality => self.quality_max,
        }
    }
}

/// Which correctness branch produced the award
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectnessOutcome {
    /// No rule for the task; fixed partial credit
    Unregistered,
    /// Objective met without spending anything
    AlreadyCompleted,
    /// Objective met
    ObjectiveMet,
    /// Objective unmet, but the balance moved
    Attempted,
    /// Objective unmet, no sign of an attempt
    NotAttempted,
}

/// Feedback attached to a result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDetails {
    pub droid_location: Option<String>,
    pub remaining_balance: Option<f64>,
    pub inventory_items: usize,
    pub api_calls: usize,
    pub tools_used: Vec<String>,
    pub correctness_outcome: CorrectnessOutcome,
}

/// Score of one mission
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub task_id: u32,
    pub max_score: f64,
    pub correctness: f64,
    pub efficiency: f64,
    pub quality: f64,
    pub total_score: f64,
    pub percentage: f64,
    pub api_calls_used: usize,
    pub evaluation_details: EvaluationDetails,
    pub max_scores: MaxScores,
}

impl EvaluationResult {
    pub fn score(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Correctness => self.correctness,
            Dimension::Efficiency => self.efficiency,
            Dimension::Quality => self.quality,
        }
    }
}

// ============================================================================
// QUALITY LEXICON
// ============================================================================

/// Vocabulary the quality factors look for (lower-case, substring match)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityLexicon {
    pub explanation: Vec<String>,
    pub cost: Vec<String>,
    pub location: Vec<String>,
    /// "Already" marker that must co-occur with one of `already_context`
    pub already: String,
    pub already_context: Vec<String>,
    /// Phrases that alone signal the goal was recognized as met
    pub completion: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for QualityLexicon {
    fn default() -> Self {
        Self {
            explanation: words(&["ho", "prima", "poi", "quindi", "perché", "così", "analisi", "piano"]),
            cost: words(&["crediti", "costo", "prezzo", "budget"]),
            location: words(&["coruscant", "tatooine", "alderaan", "posizione", "dove"]),
            already: "già".to_string(),
            already_context: words(&["coruscant", "posizione", "lì"]),
            completion: words(&["completata", "finita", "non serve", "non necessario"]),
        }
    }
}

impl QualityLexicon {
    /// Did the response explain that no action was needed
    pub fn recognizes_optimal(&self, lower: &str) -> bool {
        let already = lower.contains(self.already.as_str()) && contains_any(lower, &self.already_context);
        already || contains_any(lower, &self.completion)
    }

    /// The seven independent quality factors of a non-empty response
    pub fn factors(&self, response: &str) -> [bool; 7] {
        let lower = response.to_lowercase();
        let length = response.chars().count();
        [
            length > MIN_RESPONSE_CHARS,
            contains_any(&lower, &self.explanation),
            response.chars().any(char::is_numeric),
            contains_any(&lower, &self.cost),
            contains_any(&lower, &self.location),
            length < MAX_RESPONSE_CHARS,
            self.recognizes_optimal(&lower),
        ]
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Rule-based evaluator of mission records
#[derive(Clone, Debug, Default)]
pub struct ScoringEngine {
    rules: TaskRuleRegistry,
    lexicon: QualityLexicon,
}

impl ScoringEngine {
    pub fn new(rules: TaskRuleRegistry) -> Self {
        Self {
            rules,
            lexicon: QualityLexicon::default(),
        }
    }

    /// Engine with the built-in task rules
    pub fn standard() -> Self {
        Self::new(TaskRuleRegistry::standard())
    }

    pub fn with_lexicon(mut self, lexicon: QualityLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn rules(&self) -> &TaskRuleRegistry {
        &self.rules
    }

    /// Score a mission. Total: never fails for a well-formed record.
    pub fn evaluate(
        &self,
        record: &MissionRecord,
        task: &TaskDefinition,
        round: &RoundConfig,
    ) -> EvaluationResult {
        let max_scores = MaxScores::for_task(task.max_score, round);

        let (correctness, outcome) = self.score_correctness(record, round, max_scores.correctness_max);
        let efficiency = self.score_efficiency(record, round, max_scores.efficiency_max);
        let quality = self.score_quality(record, max_scores.quality_max);

        // Sub-scores never exceed their ceilings, whatever produced them
        let correctness = clamp_score(correctness, max_scores.correctness_max);
        let efficiency = clamp_score(efficiency, max_scores.efficiency_max);
        let quality = clamp_score(quality, max_scores.quality_max);

        let total_score = round_to(
            (correctness + efficiency + quality).min(task.max_score),
            2,
        );
        let percentage = round_to(100.0 * total_score / task.max_score, 1);

        EvaluationResult {
            task_id: record.task_id,
            max_score: task.max_score,
            correctness,
            efficiency,
            quality,
            total_score,
            percentage,
            api_calls_used: record.api_calls(),
            evaluation_details: evaluation_details(record, outcome),
            max_scores,
        }
    }

    // ========================================================================
    // LEVEL 2 - DIMENSIONS
    // ========================================================================

    fn score_correctness(
        &self,
        record: &MissionRecord,
        round: &RoundConfig,
        dimension_max: f64,
    ) -> (f64, CorrectnessOutcome) {
        let outcome = self.correctness_outcome(record, round);
        let fraction = match outcome {
            CorrectnessOutcome::Unregistered => UNREGISTERED_CREDIT,
            // Same award as ObjectiveMet; kept apart so reports can tell them apart
            CorrectnessOutcome::AlreadyCompleted | CorrectnessOutcome::ObjectiveMet => 1.0,
            CorrectnessOutcome::Attempted => ATTEMPT_CREDIT,
            CorrectnessOutcome::NotAttempted => 0.0,
        };
        (dimension_max * fraction, outcome)
    }

    fn score_efficiency(&self, record: &MissionRecord, round: &RoundConfig, dimension_max: f64) -> f64 {
        let calls = record.api_calls();
        if calls <= OPTIMAL_CALLS {
            return dimension_max;
        }
        dimension_max * round.efficiency_thresholds.tier_fraction(calls)
    }

    fn score_quality(&self, record: &MissionRecord, dimension_max: f64) -> f64 {
        let response = record.agent_response.as_str();
        if response.is_empty() {
            return dimension_max * EMPTY_RESPONSE_CREDIT;
        }

        let factors = self.lexicon.factors(response);
        let met = factors.iter().filter(|&&f| f).count();
        let mut ratio = met as f64 / factors.len() as f64;

        let recognized_optimal = factors[6];
        if recognized_optimal {
            ratio = ratio.max(OPTIMAL_RECOGNITION_FLOOR);
        }
        dimension_max * ratio
    }

    // ========================================================================
    // LEVEL 3 - STEPS
    // ========================================================================

    fn correctness_outcome(&self, record: &MissionRecord, round: &RoundConfig) -> CorrectnessOutcome {
        let state = &record.final_state;
        match self.rules.check(record.task_id, state) {
            None => CorrectnessOutcome::Unregistered,
            Some(true) if self.was_already_completed(record.task_id, state, round) => {
                CorrectnessOutcome::AlreadyCompleted
            }
            Some(true) => CorrectnessOutcome::ObjectiveMet,
            Some(false) if has_attempted(state, round) => CorrectnessOutcome::Attempted,
            Some(false) => CorrectnessOutcome::NotAttempted,
        }
    }

    /// Objective met while the balance never left the round's baseline
    fn was_already_completed(&self, task_id: u32, state: &WorldState, round: &RoundConfig) -> bool {
        state.balance() == Some(round.starting_balance) && self.rules.objective_met(task_id, state)
    }
}

/// The ending balance differs from the baseline; a missing balance is no evidence
fn has_attempted(state: &WorldState, round: &RoundConfig) -> bool {
    state
        .balance()
        .map_or(false, |balance| balance != round.starting_balance)
}

fn evaluation_details(record: &MissionRecord, outcome: CorrectnessOutcome) -> EvaluationDetails {
    let state = &record.final_state;
    EvaluationDetails {
        droid_location: state.droid_location(PRIMARY_DROID).map(str::to_string),
        remaining_balance: state.balance(),
        inventory_items: state.inventory().len(),
        api_calls: record.api_calls(),
        tools_used: record.tools_used(),
        correctness_outcome: outcome,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn clamp_score(score: f64, ceiling: f64) -> f64 {
    score.min(ceiling).max(0.0)
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
