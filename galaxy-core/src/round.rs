//! Round configuration - scoring weights and efficiency thresholds
//!
//! A `RoundConfig` is resolved once per round and passed explicitly to the
//! scoring engine. Nothing else in the workspace reads round constants.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Scoring dimension
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Did the agent reach the required world state
    Correctness,
    /// How many actions it took
    Efficiency,
    /// How well the agent explained itself
    Quality,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [
        Dimension::Correctness,
        Dimension::Efficiency,
        Dimension::Quality,
    ];
}

/// Percentage weights of the three dimensions (sum to 100)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub correctness: u32,
    pub efficiency: u32,
    pub quality: u32,
}

impl ScoringWeights {
    pub fn new(correctness: u32, efficiency: u32, quality: u32) -> Self {
        Self {
            correctness,
            efficiency,
            quality,
        }
    }

    /// Weight (percent) of a dimension
    pub fn weight(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Correctness => self.correctness,
            Dimension::Efficiency => self.efficiency,
            Dimension::Quality => self.quality,
        }
    }

    pub fn total(&self) -> u32 {
        self.correctness + self.efficiency + self.quality
    }
}

/// Call-count bounds for the efficiency tiers (`excellent < good < acceptable`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficiencyThresholds {
    pub excellent: usize,
    pub good: usize,
    pub acceptable: usize,
}

impl EfficiencyThresholds {
    pub fn new(excellent: usize, good: usize, acceptable: usize) -> Self {
        Self {
            excellent,
            good,
            acceptable,
        }
    }

    /// Fraction of the efficiency ceiling earned for `calls` actions
    pub fn tier_fraction(&self, calls: usize) -> f64 {
        if calls <= self.excellent {
            1.0
        } else if calls <= self.good {
            0.8
        } else if calls <= self.acceptable {
            0.6
        } else {
            0.3
        }
    }
}

/// Immutable per-round constants
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub round_number: u32,
    pub weights: ScoringWeights,
    pub efficiency_thresholds: EfficiencyThresholds,
    /// Budget every participant starts the round with
    pub starting_balance: f64,
}

impl RoundConfig {
    /// Build and validate a round configuration
    pub fn new(
        round_number: u32,
        weights: ScoringWeights,
        efficiency_thresholds: EfficiencyThresholds,
        starting_balance: f64,
    ) -> Result<Self> {
        let config = Self {
            round_number,
            weights,
            efficiency_thresholds,
            starting_balance,
        };
        config.validate()?;
        Ok(config)
    }

    /// Built-in configuration for rounds 1-3
    pub fn builtin(round_number: u32) -> Result<Self> {
        let (weights, thresholds, balance) = match round_number {
            // Learning focus
            1 => (ScoringWeights::new(60, 20, 20), EfficiencyThresholds::new(3, 5, 8), 390.0),
            // Efficiency focus
            2 => (ScoringWeights::new(50, 30, 20), EfficiencyThresholds::new(5, 8, 12), 500.0),
            // Expert efficiency
            3 => (ScoringWeights::new(40, 40, 20), EfficiencyThresholds::new(8, 12, 15), 700.0),
            other => return Err(CoreError::UnknownRound(other)),
        };
        Self::new(round_number, weights, thresholds, balance)
    }

    /// Check weights sum to 100 and thresholds ascend
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| CoreError::InvalidRoundConfig {
            round: self.round_number,
            reason,
        };

        if self.round_number == 0 {
            return Err(invalid("round number must be at least 1".to_string()));
        }
        if self.weights.total() != 100 {
            return Err(invalid(format!(
                "weights sum to {}, expected 100",
                self.weights.total()
            )));
        }
        let t = &self.efficiency_thresholds;
        if !(t.excellent < t.good && t.good < t.acceptable) {
            return Err(invalid(format!(
                "thresholds must ascend, got {}/{}/{}",
                t.excellent, t.good, t.acceptable
            )));
        }
        if !self.starting_balance.is_finite() {
            return Err(invalid("starting balance must be finite".to_string()));
        }
        Ok(())
    }

    /// Ceiling of a dimension for a task worth `max_score`
    pub fn dimension_max(&self, max_score: f64, dimension: Dimension) -> f64 {
        max_score * f64::from(self.weights.weight(dimension)) / 100.0
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let config: RoundConfig =
            serde_json::from_str(&content).map_err(|e| CoreError::json(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| CoreError::json(path, e))?;
        std::fs::write(path, content).map_err(|e| CoreError::io(path, e))
    }
}

/// All known rounds, looked up by round number
#[derive(Clone, Debug, Default)]
pub struct RoundCatalog {
    rounds: BTreeMap<u32, RoundConfig>,
}

impl RoundCatalog {
    /// Rounds 1-3 with their built-in constants
    pub fn builtin() -> Self {
        let rounds = (1..=3)
            .filter_map(|n| RoundConfig::builtin(n).ok())
            .map(|config| (config.round_number, config))
            .collect();
        Self { rounds }
    }

    /// Load a JSON array of round configurations
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let configs: Vec<RoundConfig> =
            serde_json::from_str(&content).map_err(|e| CoreError::json(path, e))?;

        let mut catalog = Self::default();
        for config in configs {
            catalog.insert(config)?;
        }
        Ok(catalog)
    }

    /// Add or replace a round
    pub fn insert(&mut self, config: RoundConfig) -> Result<()> {
        config.validate()?;
        self.rounds.insert(config.round_number, config);
        Ok(())
    }

    pub fn get(&self, round_number: u32) -> Result<&RoundConfig> {
        self.rounds
            .get(&round_number)
            .ok_or(CoreError::UnknownRound(round_number))
    }

    pub fn round_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.rounds.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_weights_sum_to_100() {
        for round in 1..=3 {
            let config = RoundConfig::builtin(round).unwrap();
            assert_eq!(config.weights.total(), 100, "round {}", round);
        }
    }

    #[test]
    fn test_builtin_round_1() {
        let config = RoundConfig::builtin(1).unwrap();
        assert_eq!(config.weights, ScoringWeights::new(60, 20, 20));
        assert_eq!(config.efficiency_thresholds, EfficiencyThresholds::new(3, 5, 8));
        assert_eq!(config.starting_balance, 390.0);
    }

    #[test]
    fn test_builtin_unknown_round() {
        assert!(matches!(
            RoundConfig::builtin(4),
            Err(CoreError::UnknownRound(4))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_weights() {
        let result = RoundConfig::new(
            1,
            ScoringWeights::new(60, 30, 20),
            EfficiencyThresholds::new(3, 5, 8),
            390.0,
        );
        assert!(matches!(result, Err(CoreError::InvalidRoundConfig { .. })));
    }

    #[test]
    fn test_validate_rejects_non_ascending_thresholds() {
        let result = RoundConfig::new(
            1,
            ScoringWeights::new(60, 20, 20),
            EfficiencyThresholds::new(5, 5, 8),
            390.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_dimension_max() {
        let config = RoundConfig::builtin(2).unwrap();
        assert_eq!(config.dimension_max(200.0, Dimension::Correctness), 100.0);
        assert_eq!(config.dimension_max(200.0, Dimension::Efficiency), 60.0);
        assert_eq!(config.dimension_max(200.0, Dimension::Quality), 40.0);
    }

    #[test]
    fn test_tier_fraction() {
        let t = EfficiencyThresholds::new(3, 5, 8);
        assert_eq!(t.tier_fraction(3), 1.0);
        assert_eq!(t.tier_fraction(4), 0.8);
        assert_eq!(t.tier_fraction(8), 0.6);
        assert_eq!(t.tier_fraction(9), 0.3);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = RoundCatalog::builtin();
        assert_eq!(catalog.round_numbers().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(catalog.get(3).unwrap().weights.efficiency, 40);
        assert!(catalog.get(7).is_err());
    }

    #[test]
    fn test_load_save_round_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.json");
        let config = RoundConfig::builtin(3).unwrap();
        config.save(&path).unwrap();
        assert_eq!(RoundConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_catalog_rejects_invalid_round() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rounds.json");
        std::fs::write(
            &path,
            r#"[{"round_number": 4,
                 "weights": {"correctness": 50, "efficiency": 50, "quality": 50},
                 "efficiency_thresholds": {"excellent": 1, "good": 2, "acceptable": 3},
                 "starting_balance": 100.0}]"#,
        )
        .unwrap();
        assert!(matches!(
            RoundCatalog::load(&path),
            Err(CoreError::InvalidRoundConfig { round: 4, .. })
        ));
    }
}
