//! Canonical mission record handed to the scoring engine

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::WorldState;

/// One unit of agent interaction with the simulated world.
///
/// Step records arrive in several shapes; they are normalized here so the
/// scorer only ever sees an optional tool name plus the raw payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl Action {
    /// Opaque action standing in for a reported call count
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Normalize a raw step record
    pub fn from_value(payload: Value) -> Self {
        let tool = tool_name(&payload);
        Self { tool, payload }
    }

    pub fn is_placeholder(&self) -> bool {
        self.tool.is_none() && self.payload.is_null()
    }
}

/// Tool name of a step: `tool`, then `action`, then `[{tool: ..}, observation]`
fn tool_name(step: &Value) -> Option<String> {
    match step {
        Value::Object(map) => ["tool", "action"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        Value::Array(items) => items
            .first()
            .and_then(|first| first.get("tool"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Mission as submitted, normalized. Immutable input to scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionRecord {
    pub task_id: u32,
    pub agent_response: String,
    /// Length is the authoritative number of actions taken
    pub intermediate_steps: Vec<Action>,
    pub final_state: WorldState,
}

impl MissionRecord {
    pub fn new(
        task_id: u32,
        agent_response: impl Into<String>,
        intermediate_steps: Vec<Action>,
        final_state: WorldState,
    ) -> Self {
        Self {
            task_id,
            agent_response: agent_response.into(),
            intermediate_steps,
            final_state,
        }
    }

    pub fn api_calls(&self) -> usize {
        self.intermediate_steps.len()
    }

    /// Distinct tool names, sorted
    pub fn tools_used(&self) -> Vec<String> {
        self.intermediate_steps
            .iter()
            .filter_map(|a| a.tool.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_tool_from_object() {
        let action = Action::from_value(json!({"tool": "book_travel", "destination": "Coruscant"}));
        assert_eq!(action.tool.as_deref(), Some("book_travel"));
    }

    #[test]
    fn test_action_tool_from_action_key() {
        let action = Action::from_value(json!({"action": "buy_item"}));
        assert_eq!(action.tool.as_deref(), Some("buy_item"));
    }

    #[test]
    fn test_action_tool_from_pair() {
        let action = Action::from_value(json!([{"tool": "get_asset_location"}, "Tatooine"]));
        assert_eq!(action.tool.as_deref(), Some("get_asset_location"));
    }

    #[test]
    fn test_action_null_is_placeholder() {
        assert!(Action::from_value(Value::Null).is_placeholder());
        assert!(Action::placeholder().is_placeholder());
        assert!(!Action::from_value(json!("free text")).is_placeholder());
    }

    #[test]
    fn test_tools_used_dedup_sorted() {
        let record = MissionRecord::new(
            1,
            "done",
            vec![
                Action::from_value(json!({"tool": "b"})),
                Action::placeholder(),
                Action::from_value(json!({"tool": "a"})),
                Action::from_value(json!({"tool": "b"})),
            ],
            WorldState::default(),
        );
        assert_eq!(record.api_calls(), 4);
        assert_eq!(record.tools_used(), vec!["a".to_string(), "b".to_string()]);
    }
}
