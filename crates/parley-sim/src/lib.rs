//! # parley-sim
//!
//! Tick-based simulation of pairwise negotiations between agents.
//!
//! ## Overview
//!
//! A [`NegotiationModel`] owns the agents, a [`Mailbox`] transport with a
//! one-tick delivery delay, the shared protocol graph and one seeded random
//! source. Each agent holds a [`ConversationFsm`](parley_core::ConversationFsm)
//! per counterpart and delegates every choice to its
//! [`NegotiationPolicy`]; [`StandardPolicy`] is the archetype used by
//! [`NegotiationModel::from_config`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parley_sim::{NegotiationModel, SimulationConfig};
//!
//! let config = SimulationConfig::bundled()?;
//! let mut model = NegotiationModel::from_config(&config)?;
//! model.run_n(config.ticks)?;
//! for agent in model.agents() {
//!     println!("{}: {:?}", agent.id(), agent.state().bag());
//! }
//! ```

pub mod agent;
pub mod config;
pub mod mailbox;
pub mod model;
pub mod policy;
pub mod standard;

pub use agent::{AgentState, NegotiatingAgent};
pub use config::{AgentSpec, SimulationConfig};
pub use mailbox::{Delivery, Mailbox};
pub use model::NegotiationModel;
pub use policy::{Deliberation, NegotiationPolicy};
pub use standard::StandardPolicy;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use parley_contracts::{
        agent::AgentId,
        error::{ParleyError, ParleyResult},
        item::{CriterionName, CriterionValue, Item, Value},
        message::{Message, Payload},
        performative::Performative,
    };
    use parley_core::traits::{Protocol, Transport};
    use parley_preferences::{ItemCatalogue, Preferences};
    use parley_protocol::TomlProtocol;

    use crate::{
        AgentState, NegotiatingAgent, NegotiationModel, NegotiationPolicy, SimulationConfig,
        StandardPolicy,
    };

    use CriterionName::*;
    use Performative::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Standard behaviour, except that an agent with something to offer
    /// always proposes instead of idling.
    struct Proposing;

    impl NegotiationPolicy for Proposing {
        fn decide(
            &self,
            agent: &AgentState,
            counterpart: &AgentId,
            input: &Message,
            current: Performative,
            candidates: &[Performative],
            rng: &mut StdRng,
        ) -> ParleyResult<Performative> {
            if current == Idle
                && candidates.contains(&Propose)
                && !agent.eligible_items(counterpart).is_empty()
            {
                return Ok(Propose);
            }
            StandardPolicy.decide(agent, counterpart, input, current, candidates, rng)
        }

        fn build_message(
            &self,
            agent: &mut AgentState,
            counterpart: &AgentId,
            input: &Message,
            chosen: Performative,
            rng: &mut StdRng,
        ) -> ParleyResult<Option<Message>> {
            StandardPolicy.build_message(agent, counterpart, input, chosen, rng)
        }
    }

    /// Always answers with a move the protocol never allows.
    struct Broken;

    impl NegotiationPolicy for Broken {
        fn decide(
            &self,
            _agent: &AgentState,
            _counterpart: &AgentId,
            _input: &Message,
            _current: Performative,
            _candidates: &[Performative],
            _rng: &mut StdRng,
        ) -> ParleyResult<Performative> {
            Ok(Commit)
        }

        fn build_message(
            &self,
            _agent: &mut AgentState,
            _counterpart: &AgentId,
            _input: &Message,
            _chosen: Performative,
            _rng: &mut StdRng,
        ) -> ParleyResult<Option<Message>> {
            Ok(None)
        }
    }

    fn catalogue() -> Arc<ItemCatalogue> {
        let toml = ["W", "Z"]
            .iter()
            .map(|n| {
                format!(
                    "[[items]]\nname = \"{n}\"\n[items.measures]\nPRODUCTION_COST = 1.0\nCONSUMPTION = 1.0\nDURABILITY = 1.0\nENVIRONMENT_IMPACT = 1.0\nNOISE = 1.0\n"
                )
            })
            .collect::<String>();
        Arc::new(ItemCatalogue::from_toml_str(&toml).unwrap())
    }

    /// Ranking NOISE > DURABILITY. W is VERY_GOOD on both; Z is BAD on
    /// durability and `z_noise` on noise.
    fn preferences(z_noise: Value) -> Preferences {
        let mut prefs = Preferences::new(vec![Noise, Durability]);
        for (name, c, v) in [
            ("W", Noise, Value::VeryGood),
            ("W", Durability, Value::VeryGood),
            ("Z", Noise, z_noise),
            ("Z", Durability, Value::Bad),
        ] {
            prefs.add_criterion_value(CriterionValue::new(Item::new(name, ""), c, v));
        }
        prefs
    }

    fn agent(
        name: &str,
        bag: &[&str],
        z_noise: Value,
        fraction: f64,
        policy: Box<dyn NegotiationPolicy>,
    ) -> NegotiatingAgent {
        let state = AgentState::new(
            AgentId::new(name),
            preferences(z_noise),
            catalogue(),
            bag.iter().map(|n| Item::new(*n, "")).collect(),
            fraction,
        );
        NegotiatingAgent::new(state, policy)
    }

    fn model(agents: Vec<NegotiatingAgent>) -> NegotiationModel {
        let protocol: Arc<dyn Protocol> = Arc::new(TomlProtocol::standard().unwrap());
        NegotiationModel::new(agents, protocol, StdRng::seed_from_u64(7), 1)
    }

    fn performatives(model: &NegotiationModel) -> Vec<Performative> {
        model
            .mailbox()
            .transcript()
            .iter()
            .map(|d| d.message.performative())
            .collect()
    }

    fn bag_total(model: &NegotiationModel) -> usize {
        model.agents().iter().map(|a| a.state().bag().len()).sum()
    }

    fn a() -> AgentId {
        AgentId::new("A")
    }

    fn b() -> AgentId {
        AgentId::new("B")
    }

    // ── 1. delivery timing ────────────────────────────────────────────────────

    #[test]
    fn test_reply_latency_is_exactly_one_tick() {
        let mut model = model(vec![
            agent("A", &["Z"], Value::Good, 0.1, Box::new(Proposing)),
            agent("B", &[], Value::Good, 0.1, Box::new(Proposing)),
        ]);
        model.run_n(3).unwrap();

        let transcript = model.mailbox().transcript();
        assert!(transcript.len() >= 2);

        let proposal = &transcript[0];
        assert_eq!(proposal.message.performative(), Propose);
        assert_eq!(proposal.message.sender(), &a());
        assert_eq!((proposal.sent_at, proposal.delivered_at), (1, 2));

        let reply = &transcript[1];
        assert_eq!(reply.message.sender(), &b());
        assert_eq!((reply.sent_at, reply.delivered_at), (2, 3));
    }

    #[test]
    fn test_bundled_run_is_reproducible_and_delayed() {
        let config = SimulationConfig::bundled().unwrap();
        let mut first = NegotiationModel::from_config(&config).unwrap();
        let mut second = NegotiationModel::from_config(&config).unwrap();
        first.run_n(config.ticks).unwrap();
        second.run_n(config.ticks).unwrap();

        assert_eq!(first.mailbox().transcript(), second.mailbox().transcript());
        for delivery in first.mailbox().transcript() {
            assert_eq!(delivery.delivered_at, delivery.sent_at + 1);
            assert_ne!(delivery.message.sender(), delivery.message.receiver());
        }
        for (x, y) in first.agents().iter().zip(second.agents()) {
            assert_eq!(x.state().bag(), y.state().bag());
        }
    }

    // ── 2. negotiation outcomes ───────────────────────────────────────────────

    #[test]
    fn test_accepted_proposal_transfers_the_item() {
        let mut model = model(vec![
            agent("A", &["Z"], Value::Good, 0.1, Box::new(Proposing)),
            agent("B", &[], Value::Good, 1.0, Box::new(Proposing)),
        ]);
        model.run_n(8).unwrap();

        assert_eq!(performatives(&model), vec![Propose, Accept, Commit, Ack]);

        let giver = model.agent(&a()).unwrap();
        let taker = model.agent(&b()).unwrap();
        assert!(giver.state().bag().is_empty());
        assert!(taker.state().holds("Z"));
        assert_eq!(giver.state().given(), 1);
        assert_eq!(taker.state().received(), 1);
        assert_eq!(giver.active_conversations(), 0);
        assert_eq!(taker.active_conversations(), 0);
        assert!(giver.conversation(&b()).unwrap().is_start());
    }

    #[test]
    fn test_argument_exchange_ends_in_concession() {
        let mut model = model(vec![
            agent("A", &["Z"], Value::Good, 0.1, Box::new(Proposing)),
            agent("B", &[], Value::Bad, 0.1, Box::new(Proposing)),
        ]);
        model.run_n(10).unwrap();

        // B asks why, A supports Z on noise, B disagrees on noise, A has no
        // answer and concedes the CON argument.
        assert_eq!(performatives(&model), vec![Propose, AskWhy, Argue, Argue, Reject]);
        let arguments: Vec<String> = model
            .mailbox()
            .transcript()
            .iter()
            .filter_map(|d| d.message.argument().ok().map(|a| a.canonical()))
            .collect();
        assert_eq!(arguments, vec!["PRO Z: (NOISE, GOOD)", "CON Z: (NOISE, BAD)"]);

        for (id, peer) in [(a(), b()), (b(), a())] {
            let agent = model.agent(&id).unwrap();
            assert_eq!(agent.active_conversations(), 0);
            assert!(agent.state().ledger(&peer).is_none());
        }
        assert!(model.agent(&a()).unwrap().state().holds("Z"));
    }

    #[test]
    fn test_counter_offer_of_a_held_item_is_rejected() {
        let mut model = model(vec![
            agent("A", &["Z", "W"], Value::Good, 0.1, Box::new(Proposing)),
            agent("B", &["W"], Value::Good, 0.1, Box::new(Proposing)),
        ]);
        model.run_n(20).unwrap();

        // B answers A's case for Z with its own W, which A already owns.
        let accepted_by_a: Vec<&str> = model
            .mailbox()
            .transcript()
            .iter()
            .filter(|d| d.message.performative() == Accept && d.message.sender() == &a())
            .filter_map(|d| d.message.item_name().ok())
            .collect();
        assert!(!accepted_by_a.contains(&"W"));

        assert_eq!(bag_total(&model), 3);
        assert!(model.agent(&a()).unwrap().state().holds("W"));
        assert!(model.agent(&b()).unwrap().state().holds("W"));
    }

    #[test]
    fn test_bundled_runs_conserve_items() {
        let mut config = SimulationConfig::bundled().unwrap();
        for seed in 0..30 {
            config.seed = seed;
            let mut model = NegotiationModel::from_config(&config).unwrap();
            let before = bag_total(&model);
            model.run_n(config.ticks).unwrap();

            let given: usize = model.agents().iter().map(|a| a.state().given()).sum();
            let received: usize = model.agents().iter().map(|a| a.state().received()).sum();
            assert_eq!(bag_total(&model), before, "seed {seed} changed the item count");
            assert_eq!(given, received, "seed {seed} lost a handed-over item");
        }
    }

    // ── 3. error handling ─────────────────────────────────────────────────────

    #[test]
    fn test_malformed_payload_is_dropped() {
        let mut model = model(vec![
            agent("A", &[], Value::Good, 0.1, Box::new(StandardPolicy)),
            agent("B", &[], Value::Good, 0.1, Box::new(StandardPolicy)),
        ]);
        model.mailbox_mut().send(Message::new(
            a(),
            b(),
            Propose,
            Payload::Content(serde_json::json!({ "engine": "Z" })),
        ));

        model.run_n(3).unwrap();

        assert_eq!(model.mailbox().transcript().len(), 1);
        assert!(model.agent(&b()).unwrap().conversation(&a()).unwrap().is_start());
    }

    #[test]
    fn test_illegal_policy_choice_aborts_the_tick() {
        let mut model = model(vec![
            agent("A", &["Z"], Value::Good, 0.1, Box::new(Broken)),
            agent("B", &[], Value::Good, 0.1, Box::new(Broken)),
        ]);
        match model.step() {
            Err(ParleyError::InvalidTransition { from, chosen, .. }) => {
                assert_eq!(from, Idle);
                assert_eq!(chosen, Commit);
            }
            other => panic!("expected InvalidTransition, got {:?}", other),
        }
    }
}
