//! Round setup shared by the scoring commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use galaxy_core::{RoundCatalog, RoundConfig, ScoringEngine, TaskRuleRegistry};
use galaxy_extract::RoundFileSnapshot;
use galaxy_tournament::MissionEvaluator;

#[derive(Args, Clone, Debug)]
pub struct RoundArgs {
    /// Round number
    #[arg(long, default_value = "1")]
    pub round: u32,

    /// Directory holding the round task tables and world-state snapshots
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub data_root: PathBuf,

    /// JSON array of round configurations replacing the built-in rounds
    #[arg(long, value_name = "FILE")]
    pub rounds_config: Option<PathBuf>,

    /// JSON task rules layered over the built-in rules
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

impl RoundArgs {
    pub fn round_config(&self) -> Result<RoundConfig> {
        let catalog = match &self.rounds_config {
            Some(path) => RoundCatalog::load(path)
                .with_context(|| format!("Failed to load round configs: {}", path.display()))?,
            None => RoundCatalog::builtin(),
        };
        Ok(catalog.get(self.round)?.clone())
    }

    pub fn engine(&self) -> Result<ScoringEngine> {
        let mut rules = TaskRuleRegistry::standard();
        if let Some(path) = &self.rules {
            let extra = TaskRuleRegistry::load(path)
                .with_context(|| format!("Failed to load task rules: {}", path.display()))?;
            tracing::info!("Loaded {} task rules from {}", extra.len(), path.display());
            rules = rules.merged_with(extra);
        }
        Ok(ScoringEngine::new(rules))
    }

    /// Evaluator for the selected round; fails when the round has no task table
    pub fn evaluator(&self) -> Result<MissionEvaluator<RoundFileSnapshot>> {
        let round = self.round_config()?;
        let engine = self.engine()?;
        let evaluator = MissionEvaluator::from_data_root(&self.data_root, round, engine)?;
        Ok(evaluator)
    }
}
