//! World state - the simulated galaxy as reported at the end of a mission

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// Droid whose location the single-droid rules inspect
pub const PRIMARY_DROID: &str = "R2-D2";

/// Balance of the empty-world default
const DEFAULT_BALANCE: f64 = 1000.0;

/// Location of the primary droid in the empty-world default
const DEFAULT_LOCATION: &str = "Coruscant";

/// Client account: budget and purchased items
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientState {
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::item_names")]
    pub inventory: Vec<String>,
}

/// A droid and where it currently is
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DroidState {
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
}

/// Marketplace catalog entry
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketItem {
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub planet: Option<String>,
}

/// Snapshot of the galaxy: balance, inventory, droids, marketplace, intelligence.
///
/// Parsing is lenient below the top level: a part of the wrong shape reads
/// as absent instead of rejecting the whole state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    #[serde(default, deserialize_with = "lenient::record")]
    pub client: ClientState,
    #[serde(default, deserialize_with = "lenient::records")]
    pub droids: BTreeMap<String, DroidState>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub marketplace: BTreeMap<String, MarketItem>,
    /// Intelligence gathered by the agent; only its non-emptiness matters
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub infosphere: Value,
}

impl WorldState {
    /// Empty world used when nothing else is available
    pub fn empty_default() -> Self {
        let mut droids = BTreeMap::new();
        droids.insert(
            PRIMARY_DROID.to_string(),
            DroidState {
                location: Some(DEFAULT_LOCATION.to_string()),
            },
        );
        Self {
            client: ClientState {
                balance: Some(DEFAULT_BALANCE),
                inventory: Vec::new(),
            },
            droids,
            ..Default::default()
        }
    }

    /// Parse from a JSON value; only a non-object is rejected
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if !value.is_object() {
            return Err(serde::de::Error::custom(format!(
                "world state must be a JSON object, found {}",
                value
            )));
        }
        serde_json::from_value(value)
    }

    /// Load a world-state snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let value: Value = serde_json::from_str(&content).map_err(|e| CoreError::json(path, e))?;
        Self::from_value(value).map_err(|e| CoreError::json(path, e))
    }

    pub fn balance(&self) -> Option<f64> {
        self.client.balance
    }

    pub fn inventory(&self) -> &[String] {
        &self.client.inventory
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.client.inventory.iter().any(|i| i == item)
    }

    /// Location of a named droid, if known
    pub fn droid_location(&self, droid: &str) -> Option<&str> {
        self.droids.get(droid)?.location.as_deref()
    }

    /// Distinct locations across all droids (an unknown location counts once)
    pub fn distinct_droid_locations(&self) -> usize {
        self.droids
            .values()
            .map(|d| d.location.as_deref())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Names of catalog items sold on `planet`
    pub fn items_from_planet<'a>(&'a self, planet: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.marketplace
            .values()
            .filter(move |item| item.planet.as_deref() == Some(planet))
            .filter_map(|item| item.name.as_deref())
    }

    /// True if any intelligence data was gathered
    pub fn has_intelligence(&self) -> bool {
        match &self.infosphere {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::String(s) => !s.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }
}

/// Field deserializers that read a mismatched shape as absent
mod lenient {
    use std::collections::BTreeMap;

    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// A number, or a string holding one
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    /// Item names: plain strings, or objects carrying a `name` string
    pub fn item_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let Value::Array(items) = Value::deserialize(deserializer)? else {
            return Ok(Vec::new());
        };
        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name),
                Value::Object(mut map) => match map.remove("name") {
                    Some(Value::String(name)) => Some(name),
                    _ => None,
                },
                _ => None,
            })
            .collect())
    }

    /// One nested object; anything else is the default
    pub fn record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(parse_object(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    /// A map of nested objects; entries that are not objects are dropped
    pub fn records<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let Value::Object(map) = Value::deserialize(deserializer)? else {
            return Ok(BTreeMap::new());
        };
        Ok(map
            .into_iter()
            .filter_map(|(key, value)| parse_object(value).map(|record| (key, record)))
            .collect())
    }

    fn parse_object<T: DeserializeOwned>(value: Value) -> Option<T> {
        if value.is_object() {
            serde_json::from_value(value).ok()
        } else {
            None
        }
    }
}
