//! Runtime error types for the parley negotiation runtime.
//!
//! All fallible operations return `ParleyResult<T>`. Some variants are
//! expected outcomes of a negotiation rather than faults; see
//! [`ParleyError::is_recoverable`].

use thiserror::Error;

use crate::performative::Performative;

/// The unified error type for the parley runtime.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// The protocol graph or simulation config is malformed.
    ///
    /// Detected eagerly at load time and never retried.
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    /// An agent policy picked a successor the protocol graph does not allow.
    #[error(
        "invalid transition from {from} to {chosen} (legal: {})",
        join_states(.candidates)
    )]
    InvalidTransition {
        from: Performative,
        chosen: Performative,
        candidates: Vec<Performative>,
    },

    /// Argument generation or rebuttal found nothing new to say.
    #[error("no argument available about item '{item}'")]
    NoArgumentAvailable { item: String },

    /// A message carried a payload of the wrong kind for its performative.
    #[error("{performative} message carries {found} payload, expected {expected}")]
    PayloadType {
        performative: Performative,
        expected: String,
        found: String,
    },

    /// A message named an item the agent knows nothing about.
    #[error("unknown item '{name}'")]
    UnknownItem { name: String },

    /// An item was handed over to an agent that already holds it.
    #[error("item '{name}' is already held")]
    AlreadyHeld { name: String },

    /// The conversation state machine was driven out of turn or into a dead end.
    #[error("state machine error: {reason}")]
    StateMachine { reason: String },
}

impl ParleyError {
    /// True when the error only invalidates the message being handled.
    ///
    /// Recoverable errors are logged and the message dropped; the simulation
    /// tick continues for other messages and agents.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoArgumentAvailable { .. }
                | Self::PayloadType { .. }
                | Self::UnknownItem { .. }
                | Self::AlreadyHeld { .. }
        )
    }
}

fn join_states(states: &[Performative]) -> String {
    states
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias used throughout the parley crates.
pub type ParleyResult<T> = Result<T, ParleyError>;
