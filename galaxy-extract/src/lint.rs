//! Submission lint and example generation
//!
//! Linting is stricter than extraction: it checks that a submission follows
//! the documented format, so authors can fix files before they are scored.

use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use crate::task_id::task_id_from_filename;

/// Keys accepted as the agent response by the lint
const LINT_RESPONSE_KEYS: &[&str] = &["agent_response", "response", "output", "result", "answer"];

/// Outcome of linting one document
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LintReport {
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
}

impl LintReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check one submission document; `file_name` feeds the task-id suggestion
pub fn lint_document(document: &Value, file_name: &Path) -> LintReport {
    let mut report = LintReport::default();

    let Some(map) = document.as_object() else {
        report.errors.push("document must be a JSON object".to_string());
        return report;
    };

    match map.get("task_id") {
        None => {
            report.errors.push("missing required field 'task_id'".to_string());
            if let Some(id) = task_id_from_filename(file_name) {
                report
                    .suggestions
                    .push(format!("add 'task_id': {} (derived from the file name)", id));
            }
        }
        Some(value) => {
            if !value.as_u64().is_some_and(|id| id >= 1) {
                report
                    .errors
                    .push(format!("task_id must be an integer >= 1, found {}", value));
            }
        }
    }

    if !LINT_RESPONSE_KEYS.iter().any(|k| map.contains_key(*k)) {
        report.errors.push(format!(
            "no response field; add one of: {}",
            LINT_RESPONSE_KEYS.join(", ")
        ));
    }

    if let Some(value) = map.get("api_calls_count") {
        if value.as_u64().is_none() {
            report
                .errors
                .push(format!("api_calls_count must be an integer >= 0, found {}", value));
        }
    }

    if let Some(value) = map.get("intermediate_steps") {
        if !value.is_array() {
            report.errors.push("intermediate_steps must be a list".to_string());
        }
    }

    if let Some(value) = map.get("final_state") {
        if !value.is_object() {
            report.errors.push("final_state must be an object".to_string());
        }
    }

    if !map.contains_key("api_calls_count") && !map.contains_key("intermediate_steps") {
        report.suggestions.push(
            "add 'api_calls_count' or 'intermediate_steps' so efficiency can be scored".to_string(),
        );
    }
    if !map.contains_key("final_state") {
        report
            .suggestions
            .push("add 'final_state' so the end state can be checked".to_string());
    }
    if !map.contains_key("agent_response") && map.contains_key("response") {
        report
            .suggestions
            .push("use 'agent_response' instead of 'response'".to_string());
    }

    report
}

/// A well-formed sample submission for `task_id`
pub fn example_submission(task_id: u32) -> Value {
    json!({
        "task_id": task_id,
        "agent_response": format!(
            "Missione {} completata con successo. Descrivi qui il risultato della tua missione.",
            task_id
        ),
        "intermediate_steps": [
            {
                "tool": "get_asset_location",
                "asset": "R2-D2",
                "result": "Tatooine"
            },
            {
                "tool": "book_travel",
                "asset": "R2-D2",
                "destination": "Coruscant",
                "ship": "StarHopper",
                "result": {"success": true, "cost": 520}
            }
        ],
        "final_state": {
            "client": {
                "balance": 3480,
                "inventory": ["Laser Sword"]
            },
            "droids": {
                "R2-D2": {"location": "Coruscant"}
            }
        },
        "api_calls_count": 2,
        "success": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MissionRecordExtractor;

    #[test]
    fn test_example_passes_lint() {
        let report = lint_document(&example_submission(3), Path::new("mission_3.json"));
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_example_extracts() {
        let record = MissionRecordExtractor::new()
            .extract(&example_submission(1), "example.json")
            .unwrap();
        assert_eq!(record.task_id, 1);
        assert_eq!(record.api_calls(), 2);
        assert_eq!(record.tools_used(), vec!["book_travel", "get_asset_location"]);
    }

    #[test]
    fn test_missing_task_id_suggests_from_name() {
        let report = lint_document(&json!({"response": "ok"}), Path::new("round2_task_6.json"));
        assert!(!report.is_valid());
        assert!(report.suggestions.iter().any(|s| s.contains("'task_id': 6")));
        assert!(report.suggestions.iter().any(|s| s.contains("agent_response")));
    }

    #[test]
    fn test_type_errors() {
        let doc = json!({
            "task_id": 0,
            "answer": "x",
            "api_calls_count": -2,
            "intermediate_steps": {},
            "final_state": []
        });
        let report = lint_document(&doc, Path::new("x.json"));
        assert_eq!(report.errors.len(), 4);
    }

    #[test]
    fn test_missing_response() {
        let report = lint_document(&json!({"task_id": 2}), Path::new("x.json"));
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("agent_response"));
    }

    #[test]
    fn test_not_an_object() {
        let report = lint_document(&json!("text"), Path::new("x.json"));
        assert!(!report.is_valid());
    }
}
