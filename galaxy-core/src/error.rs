//! Error types for configuration and reference-data loading

use std::path::PathBuf;

/// Errors raised while resolving round configuration or reference tables.
///
/// Scoring itself never fails; these only surface from lookups and file
/// loading done before an evaluation.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No configuration for round {0}")]
    UnknownRound(u32),

    #[error("Invalid configuration for round {round}: {reason}")]
    InvalidRoundConfig { round: u32, reason: String },

    #[error("No task table found for round {round} (searched: {})", display_paths(.searched))]
    TaskTableMissing { round: u32, searched: Vec<PathBuf> },

    #[error("Task {task_id} not found in task table {}", .table.display())]
    TaskNotFound { task_id: u32, table: PathBuf },

    #[error("Malformed task table {}: {reason}", .path.display())]
    MalformedTaskTable { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        CoreError::Json {
            path: path.into(),
            source,
        }
    }
}
