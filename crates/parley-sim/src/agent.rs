//! Negotiating agents.
//!
//! `AgentState` is everything a policy may read or change: preferences,
//! the bag, one argumentation ledger per counterpart, the per-counterpart
//! record of proposed and agreed items, and the items accepted but not yet
//! delivered. `NegotiatingAgent` adds the policy
//! and one conversation state machine per counterpart, and runs the agent's
//! share of a tick.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use parley_argue::Argumentation;
use parley_contracts::{
    agent::AgentId,
    error::{ParleyError, ParleyResult},
    item::Item,
    message::{Message, Payload},
    performative::Performative,
};
use parley_core::{
    traits::{Protocol, Transport},
    ConversationFsm,
};
use parley_preferences::{ItemCatalogue, Preferences};

use crate::policy::{Deliberation, NegotiationPolicy};

// ── Agent state ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AgentState {
    pub id: AgentId,
    pub preferences: Preferences,
    pub catalogue: Arc<ItemCatalogue>,
    /// Share of the catalogue accepted without asking why.
    pub acceptance_fraction: f64,
    bag: Vec<Item>,
    ledgers: HashMap<AgentId, Argumentation>,
    proposed: HashMap<AgentId, HashSet<String>>,
    agreed: HashMap<AgentId, HashSet<String>>,
    /// Item accepted from each counterpart and not yet committed.
    awaiting: HashMap<AgentId, String>,
    given: usize,
    received: usize,
}

impl AgentState {
    pub fn new(
        id: AgentId,
        preferences: Preferences,
        catalogue: Arc<ItemCatalogue>,
        bag: Vec<Item>,
        acceptance_fraction: f64,
    ) -> Self {
        let mut state = Self {
            id,
            preferences,
            catalogue,
            acceptance_fraction,
            bag: Vec::new(),
            ledgers: HashMap::new(),
            proposed: HashMap::new(),
            agreed: HashMap::new(),
            awaiting: HashMap::new(),
            given: 0,
            received: 0,
        };
        for item in bag {
            state.add_to_bag(item);
        }
        state
    }

    pub fn bag(&self) -> &[Item] {
        &self.bag
    }

    pub fn holds(&self, name: &str) -> bool {
        self.bag.iter().any(|i| i.name == name)
    }

    /// Add `item` unless it is already held. Returns whether it was added.
    pub fn add_to_bag(&mut self, item: Item) -> bool {
        if self.holds(&item.name) {
            return false;
        }
        self.bag.push(item);
        true
    }

    pub fn remove_from_bag(&mut self, name: &str) -> Option<Item> {
        let pos = self.bag.iter().position(|i| i.name == name)?;
        Some(self.bag.remove(pos))
    }

    /// Look up `name` in the agent's catalogue.
    pub fn catalogue_item(&self, name: &str) -> ParleyResult<&Item> {
        self.catalogue.get(name).ok_or_else(|| ParleyError::UnknownItem {
            name: name.to_string(),
        })
    }

    /// Bag items neither proposed to nor agreed with `counterpart` yet.
    pub fn eligible_items(&self, counterpart: &AgentId) -> Vec<Item> {
        let proposed = self.proposed.get(counterpart);
        let agreed = self.agreed.get(counterpart);
        self.bag
            .iter()
            .filter(|i| !proposed.is_some_and(|p| p.contains(&i.name)))
            .filter(|i| !agreed.is_some_and(|a| a.contains(&i.name)))
            .cloned()
            .collect()
    }

    pub fn mark_proposed(&mut self, counterpart: &AgentId, name: &str) {
        self.proposed
            .entry(counterpart.clone())
            .or_default()
            .insert(name.to_string());
    }

    pub fn mark_agreed(&mut self, counterpart: &AgentId, name: &str) {
        self.agreed
            .entry(counterpart.clone())
            .or_default()
            .insert(name.to_string());
    }

    pub fn has_agreed(&self, counterpart: &AgentId, name: &str) -> bool {
        self.agreed.get(counterpart).is_some_and(|a| a.contains(name))
    }

    /// Note that `counterpart` was told we accept `name`.
    pub fn expect_item(&mut self, counterpart: &AgentId, name: &str) {
        self.awaiting.insert(counterpart.clone(), name.to_string());
    }

    /// Clear the pending acceptance with `counterpart`, returning its item.
    pub fn take_expected(&mut self, counterpart: &AgentId) -> Option<String> {
        self.awaiting.remove(counterpart)
    }

    /// Held, or accepted from some counterpart and on its way.
    pub fn holds_or_expects(&self, name: &str) -> bool {
        self.holds(name) || self.awaiting.values().any(|n| n == name)
    }

    pub fn ledger(&self, counterpart: &AgentId) -> Option<&Argumentation> {
        self.ledgers.get(counterpart)
    }

    pub fn ledger_mut(&mut self, counterpart: &AgentId) -> &mut Argumentation {
        self.ledgers.entry(counterpart.clone()).or_default()
    }

    /// Forget the arguments exchanged with `counterpart`.
    pub fn discard_ledger(&mut self, counterpart: &AgentId) {
        if let Some(ledger) = self.ledgers.remove(counterpart) {
            debug!(agent = %self.id, counterpart = %counterpart, arguments = ledger.len(), "ledger discarded");
        }
    }

    /// Drop everything tied to the current conversation with `counterpart`.
    pub fn close_conversation(&mut self, counterpart: &AgentId) {
        self.discard_ledger(counterpart);
        if let Some(name) = self.awaiting.remove(counterpart) {
            debug!(agent = %self.id, counterpart = %counterpart, item = %name, "pending acceptance dropped");
        }
    }

    pub fn record_given(&mut self) {
        self.given += 1;
    }

    pub fn record_received(&mut self) {
        self.received += 1;
    }

    /// Items handed over to other agents so far.
    pub fn given(&self) -> usize {
        self.given
    }

    /// Items obtained from other agents so far.
    pub fn received(&self) -> usize {
        self.received
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

pub struct NegotiatingAgent {
    state: AgentState,
    policy: Box<dyn NegotiationPolicy>,
    conversations: BTreeMap<AgentId, ConversationFsm>,
}

impl NegotiatingAgent {
    pub fn new(state: AgentState, policy: Box<dyn NegotiationPolicy>) -> Self {
        Self {
            state,
            policy,
            conversations: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &AgentId {
        &self.state.id
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn conversation(&self, counterpart: &AgentId) -> Option<&ConversationFsm> {
        self.conversations.get(counterpart)
    }

    /// Conversations that have started and not yet finished.
    pub fn active_conversations(&self) -> usize {
        self.conversations.values().filter(|c| is_active(c)).count()
    }

    /// Run this agent's part of one tick.
    ///
    /// 1. Answer every delivered message on the sender's conversation.
    /// 2. Reset finished conversations and drop their ledgers and pending items.
    /// 3. With spare capacity, open a conversation with a random idle peer.
    ///
    /// Recoverable errors abandon the affected conversation and are logged;
    /// any other error is returned.
    pub fn step(
        &mut self,
        peers: &[AgentId],
        protocol: &Arc<dyn Protocol>,
        max_conversations: usize,
        transport: &mut dyn Transport,
        rng: &mut StdRng,
    ) -> ParleyResult<()> {
        for message in transport.drain(&self.state.id) {
            let sender = message.sender().clone();
            self.handle(&sender, &message, protocol, transport, rng)?;
        }

        let finished: Vec<AgentId> = self
            .conversations
            .iter()
            .filter(|(_, fsm)| fsm.has_finished())
            .map(|(peer, _)| peer.clone())
            .collect();
        for peer in finished {
            if let Some(fsm) = self.conversations.get_mut(&peer) {
                debug!(agent = %self.state.id, counterpart = %peer, state = %fsm.current(), "conversation finished");
                fsm.reset();
            }
            self.state.close_conversation(&peer);
        }

        if self.active_conversations() < max_conversations {
            let idle: Vec<&AgentId> = peers
                .iter()
                .filter(|p| **p != self.state.id)
                .filter(|p| !self.conversations.get(*p).is_some_and(is_active))
                .collect();
            if let Some(partner) = idle.choose(rng).map(|p| (*p).clone()) {
                let seed = Message::new(
                    self.state.id.clone(),
                    self.state.id.clone(),
                    Performative::Idle,
                    Payload::Empty,
                );
                self.handle(&partner, &seed, protocol, transport, rng)?;
            }
        }
        Ok(())
    }

    /// Inference then decision on the conversation with `counterpart`.
    fn handle(
        &mut self,
        counterpart: &AgentId,
        input: &Message,
        protocol: &Arc<dyn Protocol>,
        transport: &mut dyn Transport,
        rng: &mut StdRng,
    ) -> ParleyResult<()> {
        let owner = &self.state.id;
        let fsm = self
            .conversations
            .entry(counterpart.clone())
            .or_insert_with(|| ConversationFsm::new(owner.clone(), counterpart.clone(), Arc::clone(protocol)));

        fsm.infer(input);
        let mut deliberation = Deliberation::new(self.policy.as_ref(), &mut self.state, counterpart, rng);
        match fsm.act(input, &mut deliberation) {
            Ok(Some(reply)) => {
                info!(
                    agent = %reply.sender(),
                    counterpart = %reply.receiver(),
                    state = %fsm.current(),
                    "sending message"
                );
                transport.send(reply);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) if e.is_recoverable() => {
                warn!(
                    agent = %self.state.id,
                    counterpart = %counterpart,
                    performative = %input.performative(),
                    error = %e,
                    "dropping message and abandoning conversation"
                );
                fsm.reset();
                self.state.close_conversation(counterpart);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

fn is_active(fsm: &ConversationFsm) -> bool {
    !fsm.is_start() && !fsm.has_finished()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
