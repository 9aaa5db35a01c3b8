//! The catalogue of items known to a simulation, with their raw measures.
//!
//! Raw measures are plain numbers per criterion (a price, a decibel level,
//! a lifetime in years). Agents never reason on them directly; a
//! `ValueProfile` turns them into ordinal values.
//!
//! Example in TOML:
//! ```toml
//! [[items]]
//! name = "Diesel Engine"
//! description = "A super cool diesel engine"
//! [items.measures]
//! PRODUCTION_COST = 1200.0
//! CONSUMPTION = 6.5
//! DURABILITY = 15.0
//! ENVIRONMENT_IMPACT = 8.0
//! NOISE = 80.0
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    item::{CriterionName, Item},
};

/// One catalogue entry as written in config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Criterion label → raw measure.
    pub measures: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogueFile {
    items: Vec<ItemSpec>,
}

#[derive(Debug, Clone)]
struct Entry {
    item: Item,
    measures: HashMap<CriterionName, f64>,
}

/// Validated item catalogue in declaration order.
#[derive(Debug, Clone)]
pub struct ItemCatalogue {
    entries: Vec<Entry>,
}

impl ItemCatalogue {
    /// Parse a standalone `[[items]]` document.
    pub fn from_toml_str(s: &str) -> ParleyResult<Self> {
        let file: CatalogueFile = toml::from_str(s).map_err(|e| ParleyError::Configuration {
            reason: format!("failed to parse item catalogue: {}", e),
        })?;
        Self::from_specs(&file.items)
    }

    /// Validate specs: non-empty, unique names, and exactly one measure for
    /// every criterion on every item.
    pub fn from_specs(specs: &[ItemSpec]) -> ParleyResult<Self> {
        if specs.is_empty() {
            return Err(config_error("item catalogue is empty".to_string()));
        }

        let mut names = HashSet::new();
        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            if !names.insert(spec.name.as_str()) {
                return Err(config_error(format!("item '{}' is listed twice", spec.name)));
            }

            let mut measures = HashMap::new();
            for (label, raw) in &spec.measures {
                let criterion: CriterionName = label.parse().map_err(|_| {
                    config_error(format!(
                        "item '{}' has a measure for unknown criterion '{}'",
                        spec.name, label
                    ))
                })?;
                measures.insert(criterion, *raw);
            }

            let missing: Vec<&str> = CriterionName::ALL
                .iter()
                .filter(|c| !measures.contains_key(*c))
                .map(|c| c.label())
                .collect();
            if !missing.is_empty() {
                return Err(config_error(format!(
                    "item '{}' has no measure for: {}",
                    spec.name,
                    missing.join(", ")
                )));
            }

            entries.push(Entry {
                item: Item::new(spec.name.clone(), spec.description.clone()),
                measures,
            });
        }

        Ok(Self { entries })
    }

    pub fn items(&self) -> Vec<Item> {
        self.entries.iter().map(|e| e.item.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.entries.iter().find(|e| e.item.name == name).map(|e| &e.item)
    }

    pub fn measure(&self, name: &str, criterion: CriterionName) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.item.name == name)
            .and_then(|e| e.measures.get(&criterion).copied())
    }

    /// Largest raw measure of `criterion` across the catalogue.
    pub fn max_measure(&self, criterion: CriterionName) -> f64 {
        self.entries
            .iter()
            .filter_map(|e| e.measures.get(&criterion).copied())
            .fold(f64::MIN, f64::max)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn config_error(reason: String) -> ParleyError {
    ParleyError::Configuration { reason }
}
