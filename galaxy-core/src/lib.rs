//! Galaxy Core - Round configuration and scoring engine
//!
//! This crate provides the decision logic for judging mission submissions:
//! - Round configuration (weights, efficiency thresholds, baseline balance)
//! - Task tables (max score per task)
//! - World state and canonical mission records
//! - Per-task correctness rules
//! - The three-dimension scoring engine

pub mod error;
pub mod mission;
pub mod round;
pub mod rules;
pub mod scoring;
pub mod state;
pub mod task;

// Re-exports for convenient access
pub use error::{CoreError, Result};
pub use mission::{Action, MissionRecord};
pub use round::{Dimension, EfficiencyThresholds, RoundCatalog, RoundConfig, ScoringWeights};
pub use rules::{TaskRule, TaskRuleRegistry, WeightedCriteria};
pub use scoring::{
    CorrectnessOutcome, EvaluationDetails, EvaluationResult, MaxScores, QualityLexicon,
    ScoringEngine,
};
pub use state::{ClientState, DroidState, MarketItem, WorldState, PRIMARY_DROID};
pub use task::{RoundFiles, TaskDefinition, TaskTable};
