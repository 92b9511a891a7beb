//! Mission record extraction
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: extract_file / extract (orchestration)
//! - Level 2: resolve_task_id, resolve_response, resolve_steps, resolve_final_state
//! - Level 3: state reconstruction from flat fields
//! - Level 4: value conversion utilities

use std::path::Path;

use galaxy_core::{Action, MissionRecord, WorldState, PRIMARY_DROID};
use serde_json::{json, Map, Value};

use crate::error::ExtractError;
use crate::fields::{
    is_truthy, resolve_field, COUNT_FIELDS, RESPONSE_FIELDS, STATE_FIELDS, STEP_FIELDS,
    TASK_ID_FIELDS,
};
use crate::snapshot::{NoSnapshot, StateSnapshot};
use crate::task_id::{parse_task_id, task_id_from_filename};

/// Response used when a submission carries none
pub const PLACEHOLDER_RESPONSE: &str = "Missione completata automaticamente tramite file JSON.";

/// Normalizes submission documents into `MissionRecord`s
#[derive(Clone, Debug, Default)]
pub struct MissionRecordExtractor<S = NoSnapshot> {
    snapshot: S,
}

impl MissionRecordExtractor<NoSnapshot> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: StateSnapshot> MissionRecordExtractor<S> {
    /// Extractor falling back to `snapshot` for submissions without a state
    pub fn with_snapshot(snapshot: S) -> Self {
        Self { snapshot }
    }

    // ========================================================================
    // LEVEL 1 - ORCHESTRATION
    // ========================================================================

    /// Read and extract one submission file
    pub fn extract_file(&self, path: &Path) -> Result<MissionRecord, ExtractError> {
        let content = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let origin = path.display().to_string();
        let document: Value = serde_json::from_str(&content).map_err(|source| ExtractError::Json {
            origin: origin.clone(),
            source,
        })?;
        self.extract(&document, &origin)
    }

    /// Extract a record from a parsed document; `source` names it (usually
    /// its file path) and is the last resort for finding the task id
    pub fn extract(&self, document: &Value, source: &str) -> Result<MissionRecord, ExtractError> {
        if !document.is_object() {
            return Err(ExtractError::NotAnObject(source.to_string()));
        }

        let task_id = resolve_task_id(document, source)?;
        let agent_response = resolve_response(document);
        let intermediate_steps = resolve_steps(document);
        let final_state = self.resolve_final_state(document, source)?;

        tracing::debug!(
            "Extracted task {} from {} ({} steps)",
            task_id,
            source,
            intermediate_steps.len()
        );

        Ok(MissionRecord::new(
            task_id,
            agent_response,
            intermediate_steps,
            final_state,
        ))
    }

    // ========================================================================
    // LEVEL 2 - FIELDS
    // ========================================================================

    /// Explicit state, then flat fields, then the snapshot, then an empty world
    fn resolve_final_state(&self, document: &Value, source: &str) -> Result<WorldState, ExtractError> {
        let explicit = resolve_field(document, STATE_FIELDS, |v| v.is_object().then_some(v));
        let candidate = match explicit {
            Some((_, state)) => Some(state.clone()),
            None => reconstruct_state(document),
        };

        if let Some(value) = candidate {
            return WorldState::from_value(value).map_err(|source_err| {
                ExtractError::InvalidWorldState {
                    origin: source.to_string(),
                    source: source_err,
                }
            });
        }

        match self.snapshot.current_state() {
            Some(state) => Ok(state),
            None => {
                tracing::debug!("No final state for {}, using empty world", source);
                Ok(WorldState::empty_default())
            }
        }
    }
}

fn resolve_task_id(document: &Value, source: &str) -> Result<u32, ExtractError> {
    // A present but unusable key is an error, not a cue to try the file name
    if let Some(value) = TASK_ID_FIELDS
        .iter()
        .find_map(|a| a.get(document).filter(|v| !v.is_null()))
    {
        return parse_task_id(value).ok_or_else(|| ExtractError::InvalidTaskId {
            origin: source.to_string(),
            value: value.to_string(),
        });
    }

    task_id_from_filename(Path::new(source))
        .ok_or_else(|| ExtractError::UnresolvedTaskId(source.to_string()))
}

fn resolve_response(document: &Value) -> String {
    // Top-level keys must be non-empty; nested ones only present
    let top_level = RESPONSE_FIELDS.iter().filter(|a| a.path.len() == 1);
    let nested = RESPONSE_FIELDS.iter().filter(|a| a.path.len() > 1);

    top_level
        .filter_map(|a| a.get(document).filter(|v| is_truthy(v)))
        .chain(nested.filter_map(|a| a.get(document).filter(|v| !v.is_null())))
        .map(value_to_text)
        .next()
        .unwrap_or_else(|| PLACEHOLDER_RESPONSE.to_string())
}

/// Step sequence, else synthesized from a reported count, else one placeholder
fn resolve_steps(document: &Value) -> Vec<Action> {
    if let Some((_, steps)) = resolve_field(document, STEP_FIELDS, Value::as_array) {
        return steps.iter().cloned().map(Action::from_value).collect();
    }

    for accessor in COUNT_FIELDS {
        let Some(raw) = accessor.get(document) else {
            continue;
        };
        match value_to_count(raw) {
            Some(count) => {
                tracing::debug!("Synthesizing {} steps from {}", count, accessor.name);
                return vec![Action::placeholder(); count];
            }
            None => tracing::debug!("Ignoring invalid {}: {}", accessor.name, raw),
        }
    }

    vec![Action::placeholder()]
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Build a state from flat top-level fields, if any are present
fn reconstruct_state(document: &Value) -> Option<Value> {
    let field = |key: &str| document.get(key).filter(|v| !v.is_null());

    let mut client = Map::new();
    if let Some(balance) = field("balance") {
        client.insert("balance".to_string(), balance.clone());
    }
    if let Some(inventory) = field("inventory") {
        client.insert("inventory".to_string(), inventory.clone());
    }
    let location = field("r2d2_location").or_else(|| field("droid_location"));

    if client.is_empty() && location.is_none() {
        return None;
    }

    let mut state = Map::new();
    if !client.is_empty() {
        state.insert("client".to_string(), Value::Object(client));
    }
    if let Some(location) = location {
        state.insert(
            "droids".to_string(),
            json!({ PRIMARY_DROID: { "location": location } }),
        );
    }
    Some(Value::Object(state))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_to_count(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|c| usize::try_from(c).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
