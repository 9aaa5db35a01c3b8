//! Agent identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, human-readable identifier for a negotiating agent.
///
/// Used as the mailbox address and as the key of every per-counterpart
/// structure an agent keeps (conversations, ledgers, bookkeeping).
/// Example: AgentId("Agent 1")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
