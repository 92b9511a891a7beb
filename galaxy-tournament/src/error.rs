//! Per-mission evaluation failures

use galaxy_core::CoreError;
use galaxy_extract::ExtractError;

/// Why one submission produced no result. Never aborts a batch.
#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Lookup(#[from] CoreError),
}
