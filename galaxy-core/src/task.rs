//! Task tables - per-round max score for each task
//!
//! Tables live under a data root using the round directory convention
//! (`ROUND <n> FILES/...`). A table is read fully and released in one call.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// One scorable objective within a round
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub task_id: u32,
    pub max_score: f64,
}

impl TaskDefinition {
    pub fn new(task_id: u32, max_score: f64) -> Self {
        Self { task_id, max_score }
    }
}

/// Task definitions of one round, keyed by task id
#[derive(Clone, Debug, Default)]
pub struct TaskTable {
    source: PathBuf,
    tasks: FxHashMap<u32, TaskDefinition>,
}

impl TaskTable {
    pub fn from_definitions(
        source: impl Into<PathBuf>,
        definitions: impl IntoIterator<Item = TaskDefinition>,
    ) -> Self {
        Self {
            source: source.into(),
            tasks: definitions.into_iter().map(|d| (d.task_id, d)).collect(),
        }
    }

    /// Load a CSV or JSON task table (chosen by extension)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let is_json = path.extension().map_or(false, |ext| ext == "json");

        let definitions = if is_json {
            serde_json::from_str::<Vec<TaskDefinition>>(&content)
                .map_err(|e| CoreError::json(path, e))?
        } else {
            parse_csv(&content).map_err(|reason| CoreError::MalformedTaskTable {
                path: path.to_path_buf(),
                reason,
            })?
        };

        for def in &definitions {
            if def.task_id == 0 || !(def.max_score > 0.0) {
                return Err(CoreError::MalformedTaskTable {
                    path: path.to_path_buf(),
                    reason: format!(
                        "task {} has invalid id or max score {}",
                        def.task_id, def.max_score
                    ),
                });
            }
        }

        tracing::debug!("Loaded {} tasks from {}", definitions.len(), path.display());
        Ok(Self::from_definitions(path, definitions))
    }

    /// Look up a task by exact id
    pub fn get(&self, task_id: u32) -> Result<&TaskDefinition> {
        self.tasks.get(&task_id).ok_or_else(|| CoreError::TaskNotFound {
            task_id,
            table: self.source.clone(),
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Parse a header-indexed CSV with at least `task_id` and `max_score` columns
fn parse_csv(content: &str) -> std::result::Result<Vec<TaskDefinition>, String> {
    let mut records = split_csv_records(content).into_iter();
    let columns = records.next().ok_or("empty table")?;

    let column = |name: &str| {
        columns
            .iter()
            .position(|c| c.trim() == name)
            .ok_or_else(|| format!("missing column '{}'", name))
    };
    let id_col = column("task_id")?;
    let score_col = column("max_score")?;

    records
        .enumerate()
        .map(|(i, fields)| {
            let field = |col: usize| fields.get(col).map(|f| f.trim()).unwrap_or("");
            let row = i + 2;

            let task_id = field(id_col)
                .parse::<u32>()
                .map_err(|_| format!("row {}: bad task_id '{}'", row, field(id_col)))?;
            let max_score = field(score_col)
                .parse::<f64>()
                .map_err(|_| format!("row {}: bad max_score '{}'", row, field(score_col)))?;

            Ok(TaskDefinition::new(task_id, max_score))
        })
        .collect()
}

/// Split CSV text into records of fields.
///
/// Double-quoted fields may hold commas, doubled quotes and line breaks; a
/// record ends only at a line break outside quotes. Blank records are dropped.
fn split_csv_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    let mut end_record = |fields: &mut Vec<String>, current: &mut String| {
        fields.push(std::mem::take(current));
        let record = std::mem::take(fields);
        if record.iter().any(|f| !f.trim().is_empty()) {
            records.push(record);
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => end_record(&mut fields, &mut current),
            _ => current.push(c),
        }
    }
    end_record(&mut fields, &mut current);
    records
}

/// Round data directory layout under a data root
#[derive(Clone, Debug)]
pub struct RoundFiles {
    root: PathBuf,
}

impl RoundFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn round_dir(&self, round: u32) -> PathBuf {
        self.root.join(format!("ROUND {} FILES", round))
    }

    /// Candidate task-table paths, in priority order
    pub fn task_table_candidates(&self, round: u32) -> Vec<PathBuf> {
        let stem = if round == 1 {
            "tasks".to_string()
        } else {
            format!("tasks_round{}", round)
        };
        let dir = self.round_dir(round);
        vec![
            dir.join(format!("{}.csv", stem)),
            dir.join(format!("{}.json", stem)),
            self.root.join("tasks.csv"),
            self.root.join("tasks.json"),
        ]
    }

    /// Candidate world-state snapshot paths, in priority order
    pub fn state_snapshot_candidates(&self, round: u32) -> Vec<PathBuf> {
        let name = if round == 1 {
            "galaxy_state.json".to_string()
        } else {
            format!("galaxy_state_round{}.json", round)
        };
        vec![
            self.round_dir(round).join(name),
            self.root.join("galaxy_state.json"),
        ]
    }

    /// Load the task table of a round; a missing table is fatal for the round
    pub fn load_task_table(&self, round: u32) -> Result<TaskTable> {
        let candidates = self.task_table_candidates(round);
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => TaskTable::load(path),
            None => Err(CoreError::TaskTableMissing {
                round,
                searched: candidates,
            }),
        }
    }
}
