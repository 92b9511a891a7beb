//! Per-record extraction failures
//!
//! All of these skip one submission; none of them abort a batch.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unparsable document {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Document {0} is not a JSON object")]
    NotAnObject(String),

    #[error("Cannot determine task_id for {0}")]
    UnresolvedTaskId(String),

    #[error("Invalid task_id {value} in {origin}")]
    InvalidTaskId { origin: String, value: String },

    #[error("Invalid final state in {origin}: {source}")]
    InvalidWorldState {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}
