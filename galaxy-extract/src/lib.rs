//! Galaxy Extract - Normalizing loosely-structured mission submissions
//!
//! Submissions name and nest their fields differently. This crate turns any
//! of them into a canonical `MissionRecord`:
//! - Ordered field-accessor tables (first match wins)
//! - Task-id resolution from document keys or file names
//! - World-state fallback to round snapshots
//! - Submission discovery and format linting

mod discovery;
mod error;
mod extractor;
mod fields;
mod lint;
mod snapshot;
mod task_id;

pub use discovery::{find_mission_files, wildcard_match, DEFAULT_PATTERNS};
pub use error::ExtractError;
pub use extractor::{MissionRecordExtractor, PLACEHOLDER_RESPONSE};
pub use fields::{
    resolve_field, FieldAccessor, COUNT_FIELDS, RESPONSE_FIELDS, STATE_FIELDS, STEP_FIELDS,
    TASK_ID_FIELDS,
};
pub use lint::{example_submission, lint_document, LintReport};
pub use snapshot::{NoSnapshot, RoundFileSnapshot, StateSnapshot};
pub use task_id::{parse_task_id, task_id_from_filename, FilenamePattern, FILENAME_PATTERNS};
