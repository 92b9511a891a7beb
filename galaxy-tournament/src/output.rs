//! Aggregated results document
//!
//! Level 4 - Output

use std::collections::BTreeMap;
use std::path::Path;

use galaxy_core::{CoreError, EvaluationResult};
use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate;
use crate::batch::ScoredMission;

/// One task's result together with the submission it was scored from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailedResult {
    #[serde(flatten)]
    pub result: EvaluationResult,
    #[serde(default)]
    pub source_file: String,
    #[serde(default)]
    pub round_number: u32,
}

impl From<&ScoredMission> for DetailedResult {
    fn from(scored: &ScoredMission) -> Self {
        Self {
            result: scored.result.clone(),
            source_file: scored.source.clone(),
            round_number: scored.round_number,
        }
    }
}

/// Persisted outcome of a round run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregatedOutput {
    pub timestamp: String,
    /// Who submitted; read by the leaderboard when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<String>,
    pub round_number: u32,
    pub missions_completed: usize,
    /// `mission_<id>` -> total score
    pub individual_scores: BTreeMap<String, f64>,
    pub detailed_results: BTreeMap<u32, DetailedResult>,
    pub average_score: f64,
    pub total_api_calls: usize,
    pub total_score: f64,
    pub max_possible_score: f64,
}

impl AggregatedOutput {
    /// Build the document for one round. Later submissions for a task id
    /// already present are ignored.
    pub fn from_missions<'a>(
        round_number: u32,
        missions: impl IntoIterator<Item = &'a ScoredMission>,
        timestamp: impl Into<String>,
    ) -> Self {
        let mut detailed_results = BTreeMap::new();
        for scored in missions {
            detailed_results
                .entry(scored.result.task_id)
                .or_insert_with(|| DetailedResult::from(scored));
        }

        let summary = aggregate(detailed_results.values().map(|d| &d.result));
        let individual_scores = detailed_results
            .values()
            .map(|d| (format!("mission_{}", d.result.task_id), d.result.total_score))
            .collect();

        Self {
            timestamp: timestamp.into(),
            participant: None,
            round_number,
            missions_completed: summary.missions_completed,
            individual_scores,
            detailed_results,
            average_score: summary.average_score,
            total_api_calls: summary.total_api_calls,
            total_score: summary.total_score,
            max_possible_score: summary.max_possible_score,
        }
    }

    pub fn with_participant(mut self, participant: impl Into<String>) -> Self {
        self.participant = Some(participant.into());
        self
    }

    /// Conventional file name for a round's output
    pub fn default_file_name(round_number: u32) -> String {
        format!("hackathon_results_from_json_round{}.json", round_number)
    }

    /// Every detailed result, ordered by task id
    pub fn results(&self) -> impl Iterator<Item = &EvaluationResult> {
        self.detailed_results.values().map(|d| &d.result)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> galaxy_core::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| CoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> galaxy_core::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CoreError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::{MissionRecord, RoundConfig, ScoringEngine, TaskDefinition, WorldState};

    fn scored(task_id: u32, response: &str) -> ScoredMission {
        let record = MissionRecord::new(task_id, response, Vec::new(), WorldState::empty_default());
        let result = ScoringEngine::standard().evaluate(
            &record,
            &TaskDefinition::new(task_id, 100.0),
            &RoundConfig::builtin(2).unwrap(),
        );
        ScoredMission {
            source: format!("submissions/mission_{}.json", task_id),
            round_number: 2,
            result,
        }
    }

    #[test]
    fn test_document_shape() {
        let missions = vec![scored(3, "Informazioni raccolte."), scored(1, "")];
        let output = AggregatedOutput::from_missions(2, &missions, "2025-01-01T00:00:00");

        assert_eq!(output.missions_completed, 2);
        assert_eq!(output.individual_scores.len(), 2);
        assert_eq!(output.individual_scores["mission_3"], missions[0].result.total_score);

        let value = serde_json::to_value(&output).unwrap();
        for key in [
            "timestamp",
            "round_number",
            "missions_completed",
            "individual_scores",
            "detailed_results",
            "average_score",
            "total_api_calls",
            "total_score",
            "max_possible_score",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert!(value.get("participant").is_none());
        assert!(value["detailed_results"].get("1").is_some());
    }

    #[test]
    fn test_detailed_results_carry_provenance() {
        let output = AggregatedOutput::from_missions(2, &[scored(3, "ok")], "t");
        let value = serde_json::to_value(&output).unwrap();
        let detail = &value["detailed_results"]["3"];

        assert_eq!(detail["source_file"], "submissions/mission_3.json");
        assert_eq!(detail["round_number"], 2);
        assert_eq!(detail["task_id"], 3);
        assert!(detail.get("total_score").is_some());
    }

    #[test]
    fn test_duplicate_task_keeps_first() {
        let first = scored(3, "prima");
        let mut second = first.clone();
        second.result.total_score = 0.0;
        second.source = "late.json".to_string();
        let output = AggregatedOutput::from_missions(1, [&first, &second], "t");
        assert_eq!(output.missions_completed, 1);
        assert_eq!(output.detailed_results[&3].result.total_score, first.result.total_score);
        assert_eq!(output.detailed_results[&3].source_file, first.source);
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(AggregatedOutput::default_file_name(2));
        let output = AggregatedOutput::from_missions(2, &[scored(3, "ok")], "t").with_participant("team-a");

        output.save(&path).unwrap();
        let loaded = AggregatedOutput::load(&path).unwrap();
        assert_eq!(loaded.participant.as_deref(), Some("team-a"));
        assert_eq!(loaded.detailed_results.keys().copied().collect::<Vec<_>>(), vec![3]);
        assert_eq!(loaded.detailed_results[&3].round_number, 2);
        assert!(path.ends_with("hackathon_results_from_json_round2.json"));
    }

    #[test]
    fn test_load_without_provenance_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("older.json");
        let mut value = serde_json::to_value(AggregatedOutput::from_missions(2, &[scored(1, "")], "t")).unwrap();
        let detail = value["detailed_results"]["1"].as_object_mut().unwrap();
        detail.remove("source_file");
        detail.remove("round_number");
        std::fs::write(&path, value.to_string()).unwrap();

        let loaded = AggregatedOutput::load(&path).unwrap();
        assert_eq!(loaded.detailed_results[&1].source_file, "");
        assert_eq!(loaded.results().count(), 1);
    }
}
