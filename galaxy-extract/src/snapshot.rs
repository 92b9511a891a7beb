//! Current-world-state sources used when a submission omits its final state

use galaxy_core::{RoundFiles, WorldState};

/// Supplier of the current world state for a round.
///
/// Implementations read their source fully on each call; nothing is held open.
pub trait StateSnapshot {
    fn current_state(&self) -> Option<WorldState>;
}

/// No snapshot available
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSnapshot;

impl StateSnapshot for NoSnapshot {
    fn current_state(&self) -> Option<WorldState> {
        None
    }
}

/// A fixed, in-memory state
impl StateSnapshot for WorldState {
    fn current_state(&self) -> Option<WorldState> {
        Some(self.clone())
    }
}

/// Snapshot files of one round under a data root
#[derive(Clone, Debug)]
pub struct RoundFileSnapshot {
    files: RoundFiles,
    round: u32,
}

impl RoundFileSnapshot {
    pub fn new(files: RoundFiles, round: u32) -> Self {
        Self { files, round }
    }
}

impl StateSnapshot for RoundFileSnapshot {
    fn current_state(&self) -> Option<WorldState> {
        for path in self.files.state_snapshot_candidates(self.round) {
            if !path.is_file() {
                continue;
            }
            match WorldState::load(&path) {
                Ok(state) => {
                    tracing::debug!("Using world state snapshot {}", path.display());
                    return Some(state);
                }
                Err(e) => tracing::warn!("Skipping snapshot {}: {}", path.display(), e),
            }
        }
        None
    }
}
