//! Message performatives: the speech-act tag of every message.
//!
//! A performative doubles as a node of the conversation protocol graph, so
//! the set is closed and every protocol file must name each value exactly
//! once.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParleyError;

/// The speech-act tag carried by a message.
///
/// Values are opaque identifiers with no ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Performative {
    Idle,
    Finished,
    Ack,
    Reject,
    Propose,
    Accept,
    Commit,
    AskWhy,
    Because,
    Argue,
    QueryRef,
    InformRef,
}

impl Performative {
    /// Every performative, in declaration order.
    pub const ALL: [Performative; 12] = [
        Self::Idle,
        Self::Finished,
        Self::Ack,
        Self::Reject,
        Self::Propose,
        Self::Accept,
        Self::Commit,
        Self::AskWhy,
        Self::Because,
        Self::Argue,
        Self::QueryRef,
        Self::InformRef,
    ];

    /// The label used in protocol files and logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Finished => "FINISHED",
            Self::Ack => "ACK",
            Self::Reject => "REJECT",
            Self::Propose => "PROPOSE",
            Self::Accept => "ACCEPT",
            Self::Commit => "COMMIT",
            Self::AskWhy => "ASK_WHY",
            Self::Because => "BECAUSE",
            Self::Argue => "ARGUE",
            Self::QueryRef => "QUERY_REF",
            Self::InformRef => "INFORM_REF",
        }
    }

    /// Administrative states never put a message on the wire.
    pub fn is_administrative(self) -> bool {
        matches!(self, Self::Idle | Self::Finished)
    }
}

impl fmt::Display for Performative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Performative {
    type Err = ParleyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.label() == s)
            .ok_or_else(|| ParleyError::Configuration {
                reason: format!("unknown performative '{}'", s),
            })
    }
}
