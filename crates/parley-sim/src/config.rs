//! Simulation configuration loaded from TOML.
//!
//! ```toml
//! seed = 42
//! ticks = 40
//! agent_count = 4            # or an explicit [[agents]] list
//! max_conversations = 1
//! acceptance_fraction = 0.10
//! protocol = "negotiation.toml"   # optional, relative to this file
//!
//! [[agents]]
//! name = "Alice"
//! bag = ["Diesel Engine"]    # optional, random when absent
//!
//! [[items]]
//! name = "Diesel Engine"
//! [items.measures]
//! PRODUCTION_COST = 1200.0
//! # ... one measure per criterion
//!
//! [thresholds]               # optional, random cut points when absent
//! NOISE = [30.0, 50.0, 70.0]
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use parley_contracts::error::{ParleyError, ParleyResult};
use parley_preferences::ItemSpec;

/// The bundled five-engine simulation.
const ENGINES: &str = include_str!("../config/engines.toml");

fn default_seed() -> u64 {
    0
}

fn default_ticks() -> u64 {
    20
}

fn default_max_conversations() -> usize {
    1
}

fn default_acceptance_fraction() -> f64 {
    0.10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    /// Names of the catalogue items the agent starts with.
    #[serde(default)]
    pub bag: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    #[serde(default)]
    pub agent_count: Option<usize>,
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
    /// Concurrent conversations an agent may hold.
    #[serde(default = "default_max_conversations")]
    pub max_conversations: usize,
    /// Share of the catalogue an agent accepts without asking why.
    #[serde(default = "default_acceptance_fraction")]
    pub acceptance_fraction: f64,
    #[serde(default)]
    pub protocol: Option<PathBuf>,
    pub items: Vec<ItemSpec>,
    /// Criterion label → three ascending cut points.
    #[serde(default)]
    pub thresholds: Option<HashMap<String, Vec<f64>>>,
}

impl SimulationConfig {
    pub fn from_toml_str(s: &str) -> ParleyResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ParleyError::Configuration {
            reason: format!("failed to parse simulation config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file. A relative `protocol` path is resolved against
    /// the directory holding the config file.
    pub fn from_file(path: &Path) -> ParleyResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ParleyError::Configuration {
            reason: format!("failed to read simulation config '{}': {}", path.display(), e),
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if let (Some(protocol), Some(dir)) = (config.protocol.as_mut(), path.parent()) {
            if protocol.is_relative() {
                *protocol = dir.join(&*protocol);
            }
        }
        Ok(config)
    }

    /// The bundled engine catalogue with four agents.
    pub fn bundled() -> ParleyResult<Self> {
        Self::from_toml_str(ENGINES)
    }

    /// The agents to create: the explicit list, or `agent_count` agents
    /// named `Agent 1`, `Agent 2`, ... with random bags.
    pub fn agent_specs(&self) -> Vec<AgentSpec> {
        if !self.agents.is_empty() {
            return self.agents.clone();
        }
        (1..=self.agent_count.unwrap_or(0))
            .map(|i| AgentSpec {
                name: format!("Agent {}", i),
                bag: None,
            })
            .collect()
    }

    /// Replace the agent list with `count` generated agents.
    pub fn set_agent_count(&mut self, count: usize) {
        self.agents.clear();
        self.agent_count = Some(count);
    }

    pub fn validate(&self) -> ParleyResult<()> {
        if self.agent_count.is_some() && !self.agents.is_empty() {
            return Err(config_error(
                "set either agent_count or [[agents]], not both".to_string(),
            ));
        }

        let specs = self.agent_specs();
        if specs.len() < 2 {
            return Err(config_error(format!(
                "a negotiation needs at least 2 agents, got {}",
                specs.len()
            )));
        }
        let mut names = HashSet::new();
        for spec in &specs {
            if !names.insert(spec.name.as_str()) {
                return Err(config_error(format!("agent '{}' is listed twice", spec.name)));
            }
        }

        if self.max_conversations == 0 {
            return Err(config_error("max_conversations must be at least 1".to_string()));
        }
        if !(self.acceptance_fraction > 0.0 && self.acceptance_fraction <= 1.0) {
            return Err(config_error(format!(
                "acceptance_fraction must be in (0, 1], got {}",
                self.acceptance_fraction
            )));
        }

        let known: HashSet<&str> = self.items.iter().map(|i| i.name.as_str()).collect();
        for spec in &specs {
            for name in spec.bag.iter().flatten() {
                if !known.contains(name.as_str()) {
                    return Err(config_error(format!(
                        "agent '{}' starts with unknown item '{}'",
                        spec.name, name
                    )));
                }
            }
        }
        Ok(())
    }
}

fn config_error(reason: String) -> ParleyError {
    ParleyError::Configuration { reason }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::SimulationConfig;

    const ITEMS: &str = r#"
        [[items]]
        name = "X"
        [items.measures]
        PRODUCTION_COST = 1.0
        CONSUMPTION = 1.0
        DURABILITY = 1.0
        ENVIRONMENT_IMPACT = 1.0
        NOISE = 1.0
    "#;

    #[test]
    fn bundled_config_is_valid() {
        let config = SimulationConfig::bundled().unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.items.len(), 5);
        assert_eq!(config.agent_specs().len(), 4);
        assert_eq!(config.agent_specs()[0].name, "Agent 1");
        assert!(config.protocol.is_none());
    }

    #[test]
    fn defaults_apply() {
        let config = SimulationConfig::from_toml_str(&format!("agent_count = 2\n{ITEMS}")).unwrap();
        assert_eq!(config.max_conversations, 1);
        assert_eq!(config.acceptance_fraction, 0.10);
        assert_eq!(config.ticks, 20);
    }

    #[test]
    fn explicit_agents_with_bags() {
        let toml = format!(
            "[[agents]]\nname = \"A\"\nbag = [\"X\"]\n[[agents]]\nname = \"B\"\n{ITEMS}"
        );
        let config = SimulationConfig::from_toml_str(&toml).unwrap();
        let specs = config.agent_specs();
        assert_eq!(specs[0].bag.as_deref(), Some(&["X".to_string()][..]));
        assert!(specs[1].bag.is_none());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let cases = [
            (format!("agent_count = 1\n{ITEMS}"), "at least 2 agents"),
            (format!("agent_count = 2\nmax_conversations = 0\n{ITEMS}"), "max_conversations"),
            (format!("agent_count = 2\nacceptance_fraction = 1.5\n{ITEMS}"), "acceptance_fraction"),
            (
                format!("agent_count = 2\n[[agents]]\nname = \"A\"\n{ITEMS}"),
                "not both",
            ),
            (
                format!("[[agents]]\nname = \"A\"\n[[agents]]\nname = \"A\"\n{ITEMS}"),
                "listed twice",
            ),
            (
                format!("[[agents]]\nname = \"A\"\nbag = [\"Y\"]\n[[agents]]\nname = \"B\"\n{ITEMS}"),
                "unknown item 'Y'",
            ),
        ];
        for (toml, needle) in cases {
            let err = SimulationConfig::from_toml_str(&toml).unwrap_err();
            assert!(err.to_string().contains(needle), "{needle}: {err}");
        }
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        assert!(SimulationConfig::from_file(Path::new("/nonexistent/sim.toml")).is_err());
    }
}
