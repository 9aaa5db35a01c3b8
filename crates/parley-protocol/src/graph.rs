//! Protocol graph configuration schema.
//!
//! A `ProtocolConfig` is deserialized from TOML and holds the node list and
//! the edge list exactly as written. Labels stay plain strings here so that
//! validation can report every unknown or missing label by name; the
//! validated, enum-keyed form lives in `engine::TomlProtocol`.

use serde::{Deserialize, Serialize};

/// One node of the graph, labelled with a performative name.
///
/// Example in TOML:
/// ```toml
/// [[nodes]]
/// id = "IDLE"
/// initial = true
///
/// [[nodes]]
/// id = "ACK"
/// final = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Performative label, e.g. `"ASK_WHY"`.
    pub id: String,

    /// Exactly one node in the graph must set this.
    #[serde(default)]
    pub initial: bool,

    /// At least one node in the graph must set this.
    #[serde(default, rename = "final")]
    pub terminal: bool,
}

/// A directed edge: `target` may legally follow `source`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub source: String,
    pub target: String,
}

/// The top-level structure deserialized from a protocol file.
///
/// Successor order follows the order of the `edges` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}
