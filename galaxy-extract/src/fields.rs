//! Ordered field accessors
//!
//! Each table lists where a piece of data may live in a submission, in
//! priority order. Resolution walks the table and returns the first value
//! the caller accepts.

use serde_json::Value;

/// A named path into a JSON document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldAccessor {
    pub name: &'static str,
    pub path: &'static [&'static str],
}

impl FieldAccessor {
    pub const fn key(name: &'static str, path: &'static [&'static str]) -> Self {
        Self { name, path }
    }

    /// Value at this path, if every segment exists
    pub fn get<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.path.iter().try_fold(doc, |node, segment| node.get(*segment))
    }
}

macro_rules! accessors {
    ($($name:literal => [$($seg:literal),+]),+ $(,)?) => {
        &[$(FieldAccessor::key($name, &[$($seg),+])),+]
    };
}

/// Task identifier keys
pub const TASK_ID_FIELDS: &[FieldAccessor] = accessors![
    "task_id" => ["task_id"],
    "mission_id" => ["mission_id"],
    "id" => ["id"],
];

/// Agent response keys
pub const RESPONSE_FIELDS: &[FieldAccessor] = accessors![
    "agent_response" => ["agent_response"],
    "response" => ["response"],
    "output" => ["output"],
    "result" => ["result"],
    "final_response" => ["final_response"],
    "answer" => ["answer"],
    "conclusion" => ["conclusion"],
    "summary" => ["summary"],
    "execution.response" => ["execution", "response"],
    "agent.response" => ["agent", "response"],
];

/// Step sequence keys
pub const STEP_FIELDS: &[FieldAccessor] = accessors![
    "intermediate_steps" => ["intermediate_steps"],
    "steps" => ["steps"],
    "tool_calls" => ["tool_calls"],
    "api_calls" => ["api_calls"],
    "actions" => ["actions"],
    "execution_steps" => ["execution_steps"],
    "calls" => ["calls"],
    "execution.steps" => ["execution", "steps"],
    "agent.steps" => ["agent", "steps"],
];

/// Reported call-count keys, used when no step sequence is present
pub const COUNT_FIELDS: &[FieldAccessor] = accessors![
    "api_calls_count" => ["api_calls_count"],
    "tool_calls_count" => ["tool_calls_count"],
];

/// Final world-state keys
pub const STATE_FIELDS: &[FieldAccessor] = accessors![
    "final_state" => ["final_state"],
    "state" => ["state"],
    "galaxy_state" => ["galaxy_state"],
    "end_state" => ["end_state"],
    "resulting_state" => ["resulting_state"],
    "outcome_state" => ["outcome_state"],
];

/// Walk `accessors` in order; return the first accepted value and where it came from
pub fn resolve_field<'a, T>(
    doc: &'a Value,
    accessors: &[FieldAccessor],
    accept: impl Fn(&'a Value) -> Option<T>,
) -> Option<(&'static str, T)> {
    accessors
        .iter()
        .find_map(|accessor| accessor.get(doc).and_then(&accept).map(|v| (accessor.name, v)))
}

/// JSON truthiness: null, false, 0, "" and empty containers are falsy
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessor_nested_path() {
        let doc = json!({"execution": {"response": "hi"}});
        let accessor = FieldAccessor::key("execution.response", &["execution", "response"]);
        assert_eq!(accessor.get(&doc), Some(&json!("hi")));
        assert_eq!(accessor.get(&json!({"execution": 3})), None);
    }

    #[test]
    fn test_resolve_first_accepted() {
        let doc = json!({"steps": "not a list", "tool_calls": [1, 2]});
        let found = resolve_field(&doc, STEP_FIELDS, Value::as_array);
        let (name, steps) = found.unwrap();
        assert_eq!(name, "tool_calls");
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_resolve_none() {
        assert!(resolve_field(&json!({}), STATE_FIELDS, Value::as_object).is_none());
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!({"a": 1})));
    }

    #[test]
    fn test_table_order() {
        assert_eq!(RESPONSE_FIELDS[0].name, "agent_response");
        assert_eq!(RESPONSE_FIELDS.last().unwrap().name, "agent.response");
        assert_eq!(TASK_ID_FIELDS.len(), 3);
    }
}
