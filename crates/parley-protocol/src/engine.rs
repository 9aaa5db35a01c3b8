//! Validated protocol graph implementation.
//!
//! `TomlProtocol` loads a `ProtocolConfig` from a TOML string or file,
//! validates it once, and implements the `Protocol` trait from parley-core.
//!
//! Validation (every failure is `ParleyError::Configuration`):
//!
//! 1. Every node label parses as a `Performative` and appears once.
//! 2. The node set equals the full `Performative` set.
//! 3. Exactly one node is initial; at least one is final.
//! 4. Every edge endpoint parses as a `Performative`.
//!
//! Non-final states reachable from the initial node without successors are
//! reported with `warn!` only; a conversation that reaches one fails with
//! `ParleyError::StateMachine`.
//!
//! After validation the graph is an adjacency map keyed by `Performative`;
//! labels are never consulted again.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use tracing::{debug, warn};

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    performative::Performative,
};
use parley_core::traits::Protocol;

use crate::graph::ProtocolConfig;

/// The standard negotiation protocol shipped with the crate.
const STANDARD_PROTOCOL: &str = include_str!("../protocols/negotiation.toml");

/// A `Protocol` implementation read from a TOML document.
///
/// Construct via `from_toml_str`, `from_file` or `standard`, wrap in an
/// `Arc`, and share it between every conversation.
///
/// ```rust,ignore
/// use parley_protocol::engine::TomlProtocol;
///
/// let protocol = TomlProtocol::from_file(Path::new("protocols/negotiation.toml"))?;
/// ```
#[derive(Debug, Clone)]
pub struct TomlProtocol {
    initial: Performative,
    finals: HashSet<Performative>,
    successors: HashMap<Performative, Vec<Performative>>,
}

impl TomlProtocol {
    /// Parse `s` as TOML and validate the graph.
    pub fn from_toml_str(s: &str) -> ParleyResult<Self> {
        let config: ProtocolConfig = toml::from_str(s).map_err(|e| ParleyError::Configuration {
            reason: format!("failed to parse protocol TOML: {}", e),
        })?;
        Self::from_config(&config)
    }

    /// Read the file at `path` and parse it as a protocol graph.
    pub fn from_file(path: &Path) -> ParleyResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ParleyError::Configuration {
            reason: format!("failed to read protocol file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The bundled negotiation protocol.
    pub fn standard() -> ParleyResult<Self> {
        Self::from_toml_str(STANDARD_PROTOCOL)
    }

    /// Validate an already-deserialized config.
    pub fn from_config(config: &ProtocolConfig) -> ParleyResult<Self> {
        let mut seen = HashSet::new();
        let mut initials = Vec::new();
        let mut finals = HashSet::new();

        for node in &config.nodes {
            let state = parse_label(&node.id, "node list")?;
            if !seen.insert(state) {
                return Err(config_error(format!("node {} is declared twice", state)));
            }
            if node.initial {
                initials.push(state);
            }
            if node.terminal {
                finals.insert(state);
            }
        }

        let missing: Vec<&str> = Performative::ALL
            .iter()
            .filter(|p| !seen.contains(*p))
            .map(|p| p.label())
            .collect();
        if !missing.is_empty() {
            return Err(config_error(format!(
                "protocol graph is missing nodes: {}",
                missing.join(", ")
            )));
        }

        let initial = match initials.as_slice() {
            [only] => *only,
            [] => return Err(config_error("protocol graph has no initial node".to_string())),
            several => {
                let labels: Vec<&str> = several.iter().map(|p| p.label()).collect();
                return Err(config_error(format!(
                    "protocol graph has several initial nodes: {}",
                    labels.join(", ")
                )));
            }
        };

        if finals.is_empty() {
            return Err(config_error("protocol graph has no final node".to_string()));
        }

        let mut successors: HashMap<Performative, Vec<Performative>> = HashMap::new();
        for edge in &config.edges {
            let source = parse_label(&edge.source, "edge source")?;
            let target = parse_label(&edge.target, "edge target")?;
            let targets = successors.entry(source).or_default();
            if targets.contains(&target) {
                debug!(source = %source, target = %target, "ignoring duplicate edge");
                continue;
            }
            targets.push(target);
        }

        let protocol = Self {
            initial,
            finals,
            successors,
        };
        protocol.warn_dead_ends();
        Ok(protocol)
    }

    /// Every final state.
    pub fn finals(&self) -> impl Iterator<Item = Performative> + '_ {
        self.finals.iter().copied()
    }

    /// States reachable from the initial state, the initial state included.
    pub fn reachable(&self) -> HashSet<Performative> {
        let mut visited = HashSet::from([self.initial]);
        let mut queue = VecDeque::from([self.initial]);
        while let Some(state) = queue.pop_front() {
            for next in self.successors(state) {
                if visited.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
        visited
    }

    /// Reachable non-final states without successors, sorted by label.
    pub fn dead_ends(&self) -> Vec<Performative> {
        let mut dead_ends: Vec<Performative> = self
            .reachable()
            .into_iter()
            .filter(|s| !self.finals.contains(s) && self.successors(*s).is_empty())
            .collect();
        dead_ends.sort_unstable_by_key(|s| s.label());
        dead_ends
    }

    fn warn_dead_ends(&self) {
        let dead_ends = self.dead_ends();
        if !dead_ends.is_empty() {
            let labels: Vec<&str> = dead_ends.iter().map(|s| s.label()).collect();
            warn!(states = %labels.join(", "), "protocol graph has reachable dead ends");
        }
    }
}

impl Protocol for TomlProtocol {
    fn initial(&self) -> Performative {
        self.initial
    }

    fn is_final(&self, state: Performative) -> bool {
        self.finals.contains(&state)
    }

    fn successors(&self, state: Performative) -> &[Performative] {
        self.successors.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn parse_label(label: &str, location: &str) -> ParleyResult<Performative> {
    label.parse().map_err(|_| {
        config_error(format!(
            "unknown performative '{}' in {}",
            label, location
        ))
    })
}

fn config_error(reason: String) -> ParleyError {
    ParleyError::Configuration { reason }
}
