//! Integration tests for the mission scoring pipeline
//!
//! Tests the full stack: extraction, scoring, batch evaluation,
//! aggregation, the results document and the leaderboard

use std::path::Path;

use galaxy_core::{
    CorrectnessOutcome, Dimension, RoundCatalog, RoundConfig, ScoringEngine, TaskDefinition,
    TaskRuleRegistry, TaskTable,
};
use galaxy_extract::{
    example_submission, find_mission_files, lint_document, MissionRecordExtractor,
};
use galaxy_tournament::{leaderboard, AggregatedOutput, MissionEvaluator};
use serde_json::{json, Value};

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Data root with a round 1 task table and world-state snapshot
fn data_root(dir: &Path) {
    let round_dir = dir.join("ROUND 1 FILES");
    std::fs::create_dir_all(&round_dir).unwrap();
    std::fs::write(
        round_dir.join("tasks.csv"),
        "task_id,title,max_score\n1,\"Find R2-D2, bring him home\",100\n2,Walkman,150\n3,Intel,50\n4,Alderaan,200\n",
    )
    .unwrap();
    std::fs::write(
        round_dir.join("galaxy_state.json"),
        r#"{"client": {"balance": 390, "inventory": []}, "droids": {"R2-D2": {"location": "Tatooine"}}}"#,
    )
    .unwrap();
}

fn write_json(dir: &Path, name: &str, value: &Value) {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn round1_tasks() -> TaskTable {
    TaskTable::from_definitions(
        "tasks.csv",
        (1..=9).map(|id| TaskDefinition::new(id, 100.0)),
    )
}

// ============================================================================
// SCORING SCENARIOS
// ============================================================================

#[test]
fn test_droid_already_home() {
    let mut evaluator = MissionEvaluator::new(
        RoundConfig::builtin(1).unwrap(),
        round1_tasks(),
        ScoringEngine::standard(),
    );
    let scored = evaluator
        .evaluate_document(
            &json!({
                "task_id": 1,
                "agent_response": "Il droide è già su Coruscant, non serve alcuna azione.",
                "intermediate_steps": [],
                "final_state": {
                    "client": {"balance": 390},
                    "droids": {"R2-D2": {"location": "Coruscant"}}
                }
            }),
            "mission_1.json",
        )
        .unwrap();

    let result = &scored.result;
    assert_eq!(result.correctness, result.max_scores.correctness_max);
    assert_eq!(result.efficiency, result.max_scores.efficiency_max);
    assert!(result.quality >= 0.9 * result.max_scores.quality_max);
    assert!(result.total_score >= 0.98 * result.max_score);
    assert_eq!(
        result.evaluation_details.correctness_outcome,
        CorrectnessOutcome::AlreadyCompleted
    );
}

#[test]
fn test_droid_left_behind() {
    let engine = ScoringEngine::standard();
    let extractor = MissionRecordExtractor::new();
    let round = RoundConfig::builtin(1).unwrap();
    let task = TaskDefinition::new(1, 100.0);

    let untouched = extractor
        .extract(&json!({"task_id": 1, "balance": 390, "r2d2_location": "Tatooine"}), "a.json")
        .unwrap();
    let spent = extractor
        .extract(&json!({"task_id": 1, "balance": 120, "r2d2_location": "Tatooine"}), "b.json")
        .unwrap();

    assert_eq!(engine.evaluate(&untouched, &task, &round).correctness, 0.0);
    assert!((engine.evaluate(&spent, &task, &round).correctness - 18.0).abs() < 1e-9);
}

#[test]
fn test_bounds_and_idempotence_across_rounds() {
    let catalog = RoundCatalog::builtin();
    let engine = ScoringEngine::standard();
    let extractor = MissionRecordExtractor::new();
    let doc = json!({
        "task_id": 8,
        "response": "Analisi: prima ho controllato i crediti, poi il piano su Tatooine.",
        "api_calls_count": 11,
        "final_state": {
            "client": {"balance": 800, "inventory": ["a", "b", "c", "d", "e", "f"]},
            "droids": {"R2-D2": {"location": "Tatooine"}, "C-3PO": {"location": "Hoth"}},
            "infosphere": {"rumors": ["x"]}
        }
    });
    let record = extractor.extract(&doc, "task_8.json").unwrap();

    for round_number in catalog.round_numbers() {
        let round = catalog.get(round_number).unwrap();
        let task = TaskDefinition::new(8, 300.0);
        let first = engine.evaluate(&record, &task, round);
        let second = engine.evaluate(&record, &task, round);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        for dimension in Dimension::ALL {
            let score = first.score(dimension);
            assert!(score >= 0.0);
            assert!(score <= round.dimension_max(task.max_score, dimension));
        }
        assert!(first.total_score <= task.max_score);
        assert_eq!(first.correctness, first.max_scores.correctness_max);
    }
}

#[test]
fn test_custom_rules_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(&path, r#"{"9": {"rule": "droid_at", "planet": "Hoth"}}"#).unwrap();

    let rules = TaskRuleRegistry::standard().merged_with(TaskRuleRegistry::load(&path).unwrap());
    let engine = ScoringEngine::new(rules);
    let record = MissionRecordExtractor::new()
        .extract(&json!({"task_id": 9, "r2d2_location": "Hoth"}), "x.json")
        .unwrap();
    let result = engine.evaluate(
        &record,
        &TaskDefinition::new(9, 100.0),
        &RoundConfig::builtin(3).unwrap(),
    );
    assert_eq!(result.correctness, 40.0);
}

// ============================================================================
// FULL PIPELINE
// ============================================================================

#[test]
fn test_batch_to_leaderboard() {
    let root = tempfile::tempdir().unwrap();
    data_root(root.path());

    let team_a = root.path().join("team-a");
    let team_b = root.path().join("team-b");
    std::fs::create_dir_all(&team_a).unwrap();
    std::fs::create_dir_all(&team_b).unwrap();

    // team-a: two solid missions and one broken file
    write_json(&team_a, "mission_1.json", &example_submission(1));
    write_json(
        &team_a,
        "round1_mission_4.json",
        &json!({
            "agent_response": "Ho portato R2-D2 su Alderaan e comprato due oggetti, costo 300 crediti.",
            "tool_calls": [{"tool": "book_travel"}, {"tool": "buy_item"}, {"tool": "buy_item"}],
            "final_state": {
                "client": {"balance": 90, "inventory": ["A", "B"]},
                "droids": {"R2-D2": {"location": "Alderaan"}}
            }
        }),
    );
    std::fs::write(team_a.join("mission_2.json"), "{ not json").unwrap();

    // team-b: no final state, falls back to the round snapshot
    write_json(&team_b, "task_1.json", &json!({"output": "Fatto.", "api_calls_count": 9}));

    let mut totals = Vec::new();
    for (team, dir) in [("team-a", &team_a), ("team-b", &team_b)] {
        let mut evaluator = MissionEvaluator::from_data_root(
            root.path(),
            RoundConfig::builtin(1).unwrap(),
            ScoringEngine::standard(),
        )
        .unwrap();
        let outcome = evaluator.evaluate_directory(dir, None).unwrap();
        if team == "team-a" {
            assert_eq!((outcome.found, outcome.succeeded, outcome.failed), (3, 2, 1));
        } else {
            assert_eq!((outcome.found, outcome.succeeded, outcome.failed), (1, 1, 0));
            let details = &outcome.results[0].result.evaluation_details;
            assert_eq!(details.droid_location.as_deref(), Some("Tatooine"));
            assert_eq!(details.correctness_outcome, CorrectnessOutcome::NotAttempted);
        }

        let output = AggregatedOutput::from_missions(1, evaluator.scored_missions(), "2025-06-01T10:00:00")
            .with_participant(team);
        let path = dir.join(AggregatedOutput::default_file_name(1));
        output.save(&path).unwrap();
        totals.push((team, output.total_score));
    }

    let documents: Vec<AggregatedOutput> = [&team_a, &team_b]
        .iter()
        .map(|dir| AggregatedOutput::load(&dir.join("hackathon_results_from_json_round1.json")).unwrap())
        .collect();
    let team_b_detail = &documents[1].detailed_results[&1];
    assert!(team_b_detail.source_file.ends_with("task_1.json"));
    assert_eq!(team_b_detail.round_number, 1);

    let board = leaderboard(documents.iter().flat_map(|doc| {
        let participant = doc.participant.as_deref().unwrap_or("unknown");
        doc.results().map(move |r| (participant, doc.round_number, r))
    }));

    let winner = board.winner().unwrap();
    assert_eq!(winner.participant, "team-a");
    assert_eq!(winner.title, "Cosmic Champion");
    assert_eq!(winner.missions_completed, 2);
    assert!((winner.total_score - totals[0].1).abs() < 1e-6);
    assert_eq!(board.entry_for("team-b").unwrap().rank, 2);
}

#[test]
fn test_missing_round_table_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    data_root(root.path());
    let result = MissionEvaluator::from_data_root(
        root.path(),
        RoundConfig::builtin(3).unwrap(),
        ScoringEngine::standard(),
    );
    let message = result.err().unwrap().to_string();
    assert!(message.contains("round 3"));
    assert!(message.contains("tasks_round3.csv"));
}

// ============================================================================
// SUBMISSION TOOLING
// ============================================================================

#[test]
fn test_generated_example_is_valid_and_discoverable() {
    let dir = tempfile::tempdir().unwrap();
    write_json(dir.path(), "mission_5.json", &example_submission(5));
    write_json(dir.path(), "draft.json", &json!({"response": "wip"}));

    let files = find_mission_files(dir.path(), None).unwrap();
    assert_eq!(files.len(), 1);

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert!(lint_document(&doc, &files[0]).is_valid());

    let draft = dir.path().join("draft.json");
    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&draft).unwrap()).unwrap();
    let report = lint_document(&doc, &draft);
    assert!(!report.is_valid());
    assert!(!report.suggestions.is_empty());
}
