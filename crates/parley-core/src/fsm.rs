//! The conversation state machine: one instance per (agent, counterpart).
//!
//! Each incoming message is processed in two half-steps:
//!
//!   infer(peer's move) → act(decide → build_message) → outgoing message
//!
//! Inference adopts the performative the counterpart just sent. Acting asks
//! the protocol for the legal successors, lets the agent's `Deliberator`
//! choose among them (only when there is an actual choice), checks the
//! choice against the graph, and asks the deliberator for the message to
//! send. The current state only advances once the message was built.

use std::sync::Arc;

use tracing::{debug, warn};

use parley_contracts::{
    agent::AgentId,
    error::{ParleyError, ParleyResult},
    message::Message,
    performative::Performative,
};

use crate::traits::{Deliberator, Protocol};

/// Whose move comes next in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// The owning agent must act next.
    Mine,
    /// The owning agent has acted; the counterpart must reply.
    Theirs,
}

/// The protocol state of one conversation, as seen by one of its two agents.
///
/// Created lazily on first contact with a counterpart and reset (never
/// dropped) once the exchange has finished.
pub struct ConversationFsm {
    owner: AgentId,
    counterpart: AgentId,
    protocol: Arc<dyn Protocol>,
    current: Performative,
    turn: Turn,
}

impl ConversationFsm {
    /// Start a conversation at the protocol's initial state with our turn.
    pub fn new(owner: AgentId, counterpart: AgentId, protocol: Arc<dyn Protocol>) -> Self {
        let current = protocol.initial();
        Self {
            owner,
            counterpart,
            protocol,
            current,
            turn: Turn::Mine,
        }
    }

    pub fn owner(&self) -> &AgentId {
        &self.owner
    }

    pub fn counterpart(&self) -> &AgentId {
        &self.counterpart
    }

    pub fn current(&self) -> Performative {
        self.current
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Process `input` as one half-step.
    ///
    /// Without a deliberator this is the inference half-step and never
    /// produces a message. With one it is the decision half-step.
    pub fn step(
        &mut self,
        input: &Message,
        deliberator: Option<&mut dyn Deliberator>,
    ) -> ParleyResult<Option<Message>> {
        match deliberator {
            None => {
                self.infer(input);
                Ok(None)
            }
            Some(deliberator) => self.act(input, deliberator),
        }
    }

    /// Inference half-step: adopt the counterpart's performative.
    pub fn infer(&mut self, input: &Message) {
        debug!(
            owner = %self.owner,
            counterpart = %self.counterpart,
            from = %self.current,
            to = %input.performative(),
            "inferred counterpart move"
        );
        self.current = input.performative();
        self.turn = Turn::Mine;
    }

    /// Decision half-step: choose a successor and build the reply.
    ///
    /// # Errors
    ///
    /// - `StateMachine` when called out of turn or from a state with no successor
    /// - `InvalidTransition` when the deliberator picks a state outside the graph
    /// - whatever the deliberator itself returns
    pub fn act(
        &mut self,
        input: &Message,
        deliberator: &mut dyn Deliberator,
    ) -> ParleyResult<Option<Message>> {
        if self.turn == Turn::Theirs {
            return Err(ParleyError::StateMachine {
                reason: format!(
                    "{} acted twice in a row towards {} (state {})",
                    self.owner, self.counterpart, self.current
                ),
            });
        }
        self.turn = Turn::Theirs;

        let protocol = Arc::clone(&self.protocol);
        let candidates = protocol.successors(self.current);

        let chosen = match candidates {
            [] => {
                return Err(ParleyError::StateMachine {
                    reason: format!("state {} has no successor", self.current),
                });
            }
            [only] => *only,
            _ => {
                let chosen = deliberator.decide(input, self.current, candidates)?;
                if !candidates.contains(&chosen) {
                    warn!(
                        owner = %self.owner,
                        counterpart = %self.counterpart,
                        from = %self.current,
                        chosen = %chosen,
                        "agent policy picked an illegal successor"
                    );
                    return Err(ParleyError::InvalidTransition {
                        from: self.current,
                        chosen,
                        candidates: candidates.to_vec(),
                    });
                }
                chosen
            }
        };

        let message = deliberator.build_message(input, chosen)?;

        debug!(
            owner = %self.owner,
            counterpart = %self.counterpart,
            from = %self.current,
            to = %chosen,
            sends = message.is_some(),
            "conversation advanced"
        );
        self.current = chosen;
        Ok(message)
    }

    /// True while the conversation has not progressed past the initial state.
    pub fn is_start(&self) -> bool {
        self.current == self.protocol.initial()
    }

    /// True once the exchange ended in a final state and the counterpart
    /// has nothing left to answer.
    pub fn has_finished(&self) -> bool {
        self.protocol.is_final(self.current) && self.turn == Turn::Theirs
    }

    /// Return to the initial state with our turn.
    pub fn reset(&mut self) {
        self.current = self.protocol.initial();
        self.turn = Turn::Mine;
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
