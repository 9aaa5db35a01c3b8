//! Core trait definitions for the parley negotiation runtime.
//!
//! These three traits are the only seams between the state machine and the
//! rest of the system:
//!
//! - `Protocol`: the fixed, read-only conversation graph
//! - `Deliberator`: agent logic: which successor to pick and what to say
//! - `Transport`: message delivery between agents
//!
//! The state machine owns none of them. A protocol is shared by every
//! conversation, a deliberator is bound to one agent for the duration of a
//! single decision half-step, and the transport belongs to the scheduler.

use parley_contracts::{
    agent::AgentId, error::ParleyResult, message::Message, performative::Performative,
};

/// A validated conversation graph whose nodes are performatives.
///
/// Implementations are immutable after construction so one instance can be
/// shared across every conversation in the simulation.
pub trait Protocol: Send + Sync {
    /// The single initial node.
    fn initial(&self) -> Performative;

    /// True if `state` is flagged final in the graph.
    fn is_final(&self, state: Performative) -> bool;

    /// Legal next states from `state`, in declaration order.
    fn successors(&self, state: Performative) -> &[Performative];
}

/// Agent logic consulted by the state machine on every decision half-step.
///
/// `decide` must not have side effects; `build_message` is where the agent
/// updates its bag, ledgers and bookkeeping.
pub trait Deliberator {
    /// Pick the next state among `candidates`.
    ///
    /// Only called when the graph offers more than one successor. The state
    /// machine rejects any return value that is not in `candidates` with
    /// `ParleyError::InvalidTransition`.
    fn decide(
        &mut self,
        input: &Message,
        current: Performative,
        candidates: &[Performative],
    ) -> ParleyResult<Performative>;

    /// Build the outgoing message for the chosen state.
    ///
    /// Returns `None` for administrative states, meaning nothing is sent
    /// this round.
    fn build_message(&mut self, input: &Message, chosen: Performative) -> ParleyResult<Option<Message>>;
}

/// Message delivery between agents.
///
/// Delivery is deterministic and lossless: a message sent during one tick is
/// available to its receiver on the next tick, never on the same one.
pub trait Transport {
    /// Enqueue `message` for delivery on the next tick.
    fn send(&mut self, message: Message);

    /// Return and clear the messages delivered to `agent`, in send order.
    fn drain(&mut self, agent: &AgentId) -> Vec<Message>;
}
