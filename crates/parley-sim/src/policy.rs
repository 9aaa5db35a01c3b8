//! The agent customization surface.
//!
//! A `NegotiationPolicy` is an agent archetype: it decides which legal move
//! to make and what to say. It is injected when the agent is built and
//! receives the agent's state explicitly on every call.

use rand::rngs::StdRng;

use parley_contracts::{
    agent::AgentId, error::ParleyResult, message::Message, performative::Performative,
};
use parley_core::traits::Deliberator;

use crate::agent::AgentState;

pub trait NegotiationPolicy {
    /// Choose one of `candidates` as the reply to `input`.
    ///
    /// Reads the agent state but must leave it untouched.
    fn decide(
        &self,
        agent: &AgentState,
        counterpart: &AgentId,
        input: &Message,
        current: Performative,
        candidates: &[Performative],
        rng: &mut StdRng,
    ) -> ParleyResult<Performative>;

    /// Build the message for `chosen` and apply its effects on the agent
    /// (bag changes, bookkeeping, ledger entries).
    fn build_message(
        &self,
        agent: &mut AgentState,
        counterpart: &AgentId,
        input: &Message,
        chosen: Performative,
        rng: &mut StdRng,
    ) -> ParleyResult<Option<Message>>;
}

/// Binds a policy to one agent and one counterpart for a single decision
/// half-step of the state machine.
pub struct Deliberation<'a> {
    policy: &'a dyn NegotiationPolicy,
    agent: &'a mut AgentState,
    counterpart: &'a AgentId,
    rng: &'a mut StdRng,
}

impl<'a> Deliberation<'a> {
    pub fn new(
        policy: &'a dyn NegotiationPolicy,
        agent: &'a mut AgentState,
        counterpart: &'a AgentId,
        rng: &'a mut StdRng,
    ) -> Self {
        Self {
            policy,
            agent,
            counterpart,
            rng,
        }
    }
}

impl Deliberator for Deliberation<'_> {
    fn decide(
        &mut self,
        input: &Message,
        current: Performative,
        candidates: &[Performative],
    ) -> ParleyResult<Performative> {
        self.policy
            .decide(self.agent, self.counterpart, input, current, candidates, self.rng)
    }

    fn build_message(&mut self, input: &Message, chosen: Performative) -> ParleyResult<Option<Message>> {
        self.policy
            .build_message(self.agent, self.counterpart, input, chosen, self.rng)
    }
}
