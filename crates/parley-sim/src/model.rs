//! The tick scheduler.
//!
//! Every tick first delivers the messages sent during the previous tick,
//! then steps every agent once in a freshly shuffled order. All randomness
//! (preference generation, bags, agent order, partner choice, tie-breaks)
//! comes from one seeded `StdRng`, so a run is reproducible from its seed.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use parley_contracts::{
    agent::AgentId,
    error::{ParleyError, ParleyResult},
    item::Item,
};
use parley_core::traits::Protocol;
use parley_preferences::{generate_preferences, IntervalProfile, ItemCatalogue};
use parley_protocol::TomlProtocol;

use crate::{
    agent::{AgentState, NegotiatingAgent},
    config::SimulationConfig,
    mailbox::Mailbox,
    standard::StandardPolicy,
};

pub struct NegotiationModel {
    agents: Vec<NegotiatingAgent>,
    mailbox: Mailbox,
    protocol: Arc<dyn Protocol>,
    rng: StdRng,
    tick: u64,
    max_conversations: usize,
}

impl NegotiationModel {
    pub fn new(
        agents: Vec<NegotiatingAgent>,
        protocol: Arc<dyn Protocol>,
        rng: StdRng,
        max_conversations: usize,
    ) -> Self {
        Self {
            agents,
            mailbox: Mailbox::new(),
            protocol,
            rng,
            tick: 0,
            max_conversations,
        }
    }

    /// Build every agent from `config` with the standard policy.
    pub fn from_config(config: &SimulationConfig) -> ParleyResult<Self> {
        config.validate()?;

        let catalogue = Arc::new(ItemCatalogue::from_specs(&config.items)?);
        let protocol: Arc<dyn Protocol> = match &config.protocol {
            Some(path) => Arc::new(TomlProtocol::from_file(path)?),
            None => Arc::new(TomlProtocol::standard()?),
        };
        let mut rng = StdRng::seed_from_u64(config.seed);

        let fixed = config
            .thresholds
            .as_ref()
            .map(IntervalProfile::fixed)
            .transpose()?;

        let all_items = catalogue.items();
        let mut agents = Vec::new();
        for spec in config.agent_specs() {
            let profile = match &fixed {
                Some(profile) => profile.clone(),
                None => IntervalProfile::random(&catalogue, &mut rng),
            };
            let preferences = generate_preferences(&catalogue, &profile, &mut rng)?;

            let bag: Vec<Item> = match &spec.bag {
                Some(names) => names
                    .iter()
                    .map(|n| {
                        catalogue.get(n).cloned().ok_or_else(|| ParleyError::Configuration {
                            reason: format!("agent '{}' starts with unknown item '{}'", spec.name, n),
                        })
                    })
                    .collect::<ParleyResult<_>>()?,
                None => {
                    let size = rng.gen_range(0..all_items.len());
                    all_items.choose_multiple(&mut rng, size).cloned().collect()
                }
            };

            info!(
                agent = %spec.name,
                ranking = ?preferences.criterion_name_list(),
                bag = ?bag.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
                "agent created"
            );
            let state = AgentState::new(
                AgentId::new(spec.name.clone()),
                preferences,
                Arc::clone(&catalogue),
                bag,
                config.acceptance_fraction,
            );
            agents.push(NegotiatingAgent::new(state, Box::new(StandardPolicy)));
        }

        Ok(Self::new(agents, protocol, rng, config.max_conversations))
    }

    /// Advance one tick.
    ///
    /// # Errors
    ///
    /// The first non-recoverable error raised by an agent; the remaining
    /// agents are not stepped this tick.
    pub fn step(&mut self) -> ParleyResult<()> {
        self.tick += 1;
        let delivered = self.mailbox.dispatch(self.tick);
        debug!(tick = self.tick, delivered, "tick started");

        let peers: Vec<AgentId> = self.agents.iter().map(|a| a.id().clone()).collect();
        let mut order: Vec<usize> = (0..self.agents.len()).collect();
        order.shuffle(&mut self.rng);

        for idx in order {
            self.agents[idx].step(
                &peers,
                &self.protocol,
                self.max_conversations,
                &mut self.mailbox,
                &mut self.rng,
            )?;
        }
        Ok(())
    }

    /// Advance `n` ticks, stopping at the first error.
    pub fn run_n(&mut self, n: u64) -> ParleyResult<()> {
        for _ in 0..n {
            self.step()?;
        }
        info!(tick = self.tick, deliveries = self.mailbox.transcript().len(), "run finished");
        Ok(())
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn agents(&self) -> &[NegotiatingAgent] {
        &self.agents
    }

    pub fn agent(&self, id: &AgentId) -> Option<&NegotiatingAgent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }
}
