//! Task rules - per-task predicates over the final world state
//!
//! Each rule is one of a small set of shapes parameterized by data, so a new
//! task of an existing shape is a table entry, not new code.

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::state::{WorldState, PRIMARY_DROID};

fn primary_droid() -> String {
    PRIMARY_DROID.to_string()
}

/// Open-ended objective judged on several independent criteria
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedCriteria {
    /// Droids must be spread over at least this many locations
    pub min_distinct_locations: usize,
    /// Remaining balance must be strictly above this
    pub balance_floor: f64,
    /// Inventory size must be strictly above this
    pub inventory_floor: usize,
    /// Criteria that must hold (out of four)
    pub required: usize,
}

impl Default for WeightedCriteria {
    fn default() -> Self {
        Self {
            min_distinct_locations: 2,
            balance_floor: 100.0,
            inventory_floor: 5,
            required: 3,
        }
    }
}

impl WeightedCriteria {
    /// Number of criteria satisfied by `state`
    pub fn criteria_met(&self, state: &WorldState) -> usize {
        [
            state.distinct_droid_locations() >= self.min_distinct_locations,
            state.balance().unwrap_or(0.0) > self.balance_floor,
            state.inventory().len() > self.inventory_floor,
            state.has_intelligence(),
        ]
        .iter()
        .filter(|&&met| met)
        .count()
    }

    pub fn is_met(&self, state: &WorldState) -> bool {
        // No droids at all means no coordination was attempted
        !state.droids.is_empty() && self.criteria_met(state) >= self.required
    }
}

/// Shape of a correctness predicate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum TaskRule {
    /// Information task: satisfied by being attempted at all
    AlwaysMet,
    /// A droid stands on a planet
    DroidAt {
        #[serde(default = "primary_droid")]
        droid: String,
        planet: String,
    },
    /// A named item is in the inventory
    HasItem { item: String },
    /// The inventory holds at least `count` items
    InventoryAtLeast { count: usize },
    /// Every sub-rule holds
    All { rules: Vec<TaskRule> },
    /// For every planet, some inventory item is listed in the marketplace as
    /// coming from that planet
    PlanetCoverage { planets: Vec<String> },
    /// At least `required` of four independent criteria hold
    WeightedCriteria(WeightedCriteria),
}

impl TaskRule {
    pub fn droid_at(planet: &str) -> Self {
        TaskRule::DroidAt {
            droid: primary_droid(),
            planet: planet.to_string(),
        }
    }

    pub fn has_item(item: &str) -> Self {
        TaskRule::HasItem {
            item: item.to_string(),
        }
    }

    /// Evaluate the predicate against a final state
    pub fn is_met(&self, state: &WorldState) -> bool {
        match self {
            TaskRule::AlwaysMet => true,
            TaskRule::DroidAt { droid, planet } => {
                state.droid_location(droid) == Some(planet.as_str())
            }
            TaskRule::HasItem { item } => state.has_item(item),
            TaskRule::InventoryAtLeast { count } => state.inventory().len() >= *count,
            TaskRule::All { rules } => rules.iter().all(|r| r.is_met(state)),
            TaskRule::PlanetCoverage { planets } => planets.iter().all(|planet| {
                state
                    .items_from_planet(planet)
                    .any(|name| state.has_item(name))
            }),
            TaskRule::WeightedCriteria(criteria) => criteria.is_met(state),
        }
    }
}

/// Correctness predicates keyed by task id.
///
/// A task without an entry is not an error: the engine awards its
/// fixed unregistered-task credit instead.
#[derive(Clone, Debug, Default)]
pub struct TaskRuleRegistry {
    rules: FxHashMap<u32, TaskRule>,
}

impl TaskRuleRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in rules for the three rounds
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        // Round 1
        registry.insert(1, TaskRule::droid_at("Coruscant"));
        registry.insert(2, TaskRule::has_item("Walkman degli Antichi"));
        registry.insert(3, TaskRule::AlwaysMet);
        registry.insert(
            4,
            TaskRule::All {
                rules: vec![
                    TaskRule::droid_at("Alderaan"),
                    TaskRule::InventoryAtLeast { count: 2 },
                ],
            },
        );
        // Round 2
        registry.insert(
            5,
            TaskRule::All {
                rules: vec![TaskRule::droid_at("Tatooine"), TaskRule::has_item("Holocron")],
            },
        );
        // Round 3
        registry.insert(
            6,
            TaskRule::PlanetCoverage {
                planets: ["Coruscant", "Tatooine", "Alderaan"]
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
            },
        );
        registry.insert(8, TaskRule::WeightedCriteria(WeightedCriteria::default()));
        registry
    }

    /// Load rules from a JSON object mapping task id to rule
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let rules: BTreeMap<u32, TaskRule> =
            serde_json::from_str(&content).map_err(|e| CoreError::json(path, e))?;
        Ok(Self {
            rules: rules.into_iter().collect(),
        })
    }

    /// Overlay another registry; its entries win
    pub fn merged_with(mut self, other: TaskRuleRegistry) -> Self {
        self.rules.extend(other.rules);
        self
    }

    pub fn insert(&mut self, task_id: u32, rule: TaskRule) {
        self.rules.insert(task_id, rule);
    }

    pub fn get(&self, task_id: u32) -> Option<&TaskRule> {
        self.rules.get(&task_id)
    }

    pub fn contains(&self, task_id: u32) -> bool {
        self.rules.contains_key(&task_id)
    }

    /// Correctness predicate; `None` when the task has no registered rule
    pub fn check(&self, task_id: u32, state: &WorldState) -> Option<bool> {
        self.get(task_id).map(|rule| rule.is_met(state))
    }

    /// Whether the objective is satisfied, independent of partial-credit
    /// policy. Unregistered tasks are never considered met.
    pub fn objective_met(&self, task_id: u32, state: &WorldState) -> bool {
        self.check(task_id, state).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
