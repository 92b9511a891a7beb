//! Batch evaluation - one round, many submissions
//!
//! Level 1 - Orchestration and Level 2 - Phases

use std::io;
use std::path::Path;

use galaxy_core::{
    EvaluationResult, MissionRecord, RoundConfig, RoundFiles, ScoringEngine, TaskTable,
};
use galaxy_extract::{
    find_mission_files, MissionRecordExtractor, NoSnapshot, RoundFileSnapshot, StateSnapshot,
};
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::MissionError;

/// A scored submission and where it came from
#[derive(Clone, Debug)]
pub struct ScoredMission {
    pub source: String,
    pub round_number: u32,
    pub result: EvaluationResult,
}

/// Counts and results of a directory run
#[derive(Clone, Debug, Default)]
pub struct BatchOutcome {
    /// Files matching the naming convention
    pub found: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Successful evaluations in file order
    pub results: Vec<ScoredMission>,
}

impl BatchOutcome {
    /// True when nothing was found or nothing could be scored
    pub fn is_empty(&self) -> bool {
        self.found == 0 || self.succeeded == 0
    }
}

/// Evaluates submissions of one round against its task table.
///
/// Results are cached per task id, write-once: the first result for a task
/// is kept and later ones are reported but do not replace it.
pub struct MissionEvaluator<S = NoSnapshot> {
    round: RoundConfig,
    tasks: TaskTable,
    engine: ScoringEngine,
    extractor: MissionRecordExtractor<S>,
    cache: FxHashMap<u32, ScoredMission>,
}

impl MissionEvaluator<NoSnapshot> {
    pub fn new(round: RoundConfig, tasks: TaskTable, engine: ScoringEngine) -> Self {
        Self::with_extractor(round, tasks, engine, MissionRecordExtractor::new())
    }
}

impl MissionEvaluator<RoundFileSnapshot> {
    /// Evaluator reading the round's task table and world-state snapshot
    /// from a data root. A missing task table is fatal.
    pub fn from_data_root(
        root: &Path,
        round: RoundConfig,
        engine: ScoringEngine,
    ) -> galaxy_core::Result<Self> {
        let files = RoundFiles::new(root);
        let tasks = files.load_task_table(round.round_number)?;
        tracing::info!(
            "Loaded {} tasks for round {} from {}",
            tasks.len(),
            round.round_number,
            tasks.source().display()
        );
        let snapshot = RoundFileSnapshot::new(files, round.round_number);
        Ok(Self::with_extractor(
            round,
            tasks,
            engine,
            MissionRecordExtractor::with_snapshot(snapshot),
        ))
    }
}

impl<S: StateSnapshot> MissionEvaluator<S> {
    pub fn with_extractor(
        round: RoundConfig,
        tasks: TaskTable,
        engine: ScoringEngine,
        extractor: MissionRecordExtractor<S>,
    ) -> Self {
        Self {
            round,
            tasks,
            engine,
            extractor,
            cache: FxHashMap::default(),
        }
    }

    pub fn round(&self) -> &RoundConfig {
        &self.round
    }

    // ========================================================================
    // LEVEL 1 - ORCHESTRATION
    // ========================================================================

    /// Discover and evaluate every submission in `dir`.
    ///
    /// Only an unreadable directory is an error; individual submissions
    /// that fail are counted and skipped.
    pub fn evaluate_directory(&mut self, dir: &Path, pattern: Option<&str>) -> io::Result<BatchOutcome> {
        let files = find_mission_files(dir, pattern)?;
        let mut outcome = BatchOutcome {
            found: files.len(),
            ..Default::default()
        };

        if files.is_empty() {
            tracing::warn!("No submission files found in {}", dir.display());
            return Ok(outcome);
        }
        tracing::info!("Evaluating {} submissions from {}", files.len(), dir.display());

        for path in files {
            match self.evaluate_file(&path) {
                Ok(scored) => {
                    outcome.succeeded += 1;
                    outcome.results.push(scored);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    outcome.failed += 1;
                }
            }
        }

        tracing::info!(
            "Batch done: {} found, {} succeeded, {} failed",
            outcome.found,
            outcome.succeeded,
            outcome.failed
        );
        Ok(outcome)
    }

    // ========================================================================
    // LEVEL 2 - PHASES
    // ========================================================================

    /// Read, extract and score one submission file
    pub fn evaluate_file(&mut self, path: &Path) -> Result<ScoredMission, MissionError> {
        let record = self.extractor.extract_file(path)?;
        self.score(record, path.display().to_string())
    }

    /// Extract and score an already-parsed submission
    pub fn evaluate_document(&mut self, document: &Value, source: &str) -> Result<ScoredMission, MissionError> {
        let record = self.extractor.extract(document, source)?;
        self.score(record, source.to_string())
    }

    /// Cached result for a task, if one was produced
    pub fn cached(&self, task_id: u32) -> Option<&ScoredMission> {
        self.cache.get(&task_id)
    }

    /// Every cached submission, ordered by task id
    pub fn scored_missions(&self) -> Vec<&ScoredMission> {
        let mut missions: Vec<_> = self.cache.values().collect();
        missions.sort_by_key(|s| s.result.task_id);
        missions
    }

    /// Every cached result, ordered by task id
    pub fn results(&self) -> Vec<&EvaluationResult> {
        self.scored_missions().into_iter().map(|s| &s.result).collect()
    }

    // ========================================================================
    // LEVEL 3 - STEPS
    // ========================================================================

    fn score(&mut self, record: MissionRecord, source: String) -> Result<ScoredMission, MissionError> {
        let task = self.tasks.get(record.task_id)?;
        let result = self.engine.evaluate(&record, task, &self.round);

        tracing::info!(
            "Task {} scored {:.2}/{} ({:.1}%) from {}",
            result.task_id,
            result.total_score,
            result.max_score,
            result.percentage,
            source
        );

        let scored = ScoredMission {
            source,
            round_number: self.round.round_number,
            result,
        };

        match self.cache.get(&scored.result.task_id) {
            Some(first) => tracing::warn!(
                "Task {} already scored from {}; keeping that result over {}",
                scored.result.task_id,
                first.source,
                scored.source
            ),
            None => {
                self.cache.insert(scored.result.task_id, scored.clone());
            }
        }

        Ok(scored)
    }
}
