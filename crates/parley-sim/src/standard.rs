//! The default agent archetype.
//!
//! Proposes its favourite eligible item, accepts what it ranks among its
//! top items, asks why otherwise (when it has something against the item),
//! and argues until one side has nothing new to say. A side that runs out
//! of arguments concedes along the polarity of the last argument it heard,
//! but never accepts an item it already holds or is already receiving.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use parley_argue::{list_attacking_proposal, parse_argument, support_proposal, Argumentation};
use parley_contracts::{
    agent::AgentId,
    argument::Argument,
    error::{ParleyError, ParleyResult},
    message::{Message, Payload},
    performative::Performative,
};

use crate::{agent::AgentState, policy::NegotiationPolicy};

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPolicy;

impl StandardPolicy {
    fn fresh_argument(
        agent: &AgentState,
        counterpart: &AgentId,
        input: &Message,
    ) -> ParleyResult<Argument> {
        let empty = Argumentation::new();
        let ledger = agent.ledger(counterpart).unwrap_or(&empty);
        match input.argument() {
            Ok(incoming) => {
                let rebuttal = parse_argument(incoming, &agent.preferences, agent.bag(), &agent.id, ledger)?;
                info!(
                    agent = %agent.id,
                    counterpart = %counterpart,
                    kind = %rebuttal.kind,
                    argument = %rebuttal.argument,
                    "rebuttal found"
                );
                Ok(rebuttal.argument)
            }
            Err(_) => {
                let item = agent.catalogue_item(input.item_name()?)?;
                support_proposal(item, &agent.preferences, &agent.id, ledger)
            }
        }
    }
}

/// `wanted` if the protocol allows it, else the first candidate.
fn pick(wanted: Performative, candidates: &[Performative]) -> Performative {
    if candidates.contains(&wanted) {
        return wanted;
    }
    let fallback = candidates.first().copied().unwrap_or(wanted);
    debug!(wanted = %wanted, fallback = %fallback, "protocol does not offer the preferred move");
    fallback
}

impl NegotiationPolicy for StandardPolicy {
    fn decide(
        &self,
        agent: &AgentState,
        counterpart: &AgentId,
        input: &Message,
        current: Performative,
        candidates: &[Performative],
        rng: &mut StdRng,
    ) -> ParleyResult<Performative> {
        use Performative::*;

        let chosen = match current {
            Idle => {
                if agent.eligible_items(counterpart).is_empty() {
                    pick(Idle, candidates)
                } else {
                    candidates.choose(rng).copied().unwrap_or(Idle)
                }
            }
            Propose => {
                let item = agent.catalogue_item(input.item_name()?)?;
                if agent.holds_or_expects(&item.name) {
                    pick(Reject, candidates)
                } else if agent.preferences.is_item_among_top_percent(
                    item,
                    &agent.catalogue.items(),
                    agent.acceptance_fraction,
                ) {
                    pick(Accept, candidates)
                } else if !list_attacking_proposal(item, &agent.preferences).is_empty() {
                    pick(AskWhy, candidates)
                } else {
                    pick(Accept, candidates)
                }
            }
            Accept => {
                if agent.holds(input.item_name()?) {
                    pick(Commit, candidates)
                } else {
                    pick(Reject, candidates)
                }
            }
            AskWhy => match Self::fresh_argument(agent, counterpart, input) {
                Ok(_) => pick(Argue, candidates),
                Err(e) if e.is_recoverable() => pick(Reject, candidates),
                Err(e) => return Err(e),
            },
            Argue => {
                let incoming = input.argument()?;
                match Self::fresh_argument(agent, counterpart, input) {
                    Ok(_) => pick(Argue, candidates),
                    Err(ParleyError::NoArgumentAvailable { .. })
                        if incoming.decision() && !agent.holds_or_expects(incoming.item().name()) =>
                    {
                        pick(Accept, candidates)
                    }
                    Err(ParleyError::NoArgumentAvailable { .. }) => pick(Reject, candidates),
                    Err(e) => return Err(e),
                }
            }
            _ => candidates.first().copied().unwrap_or(current),
        };

        debug!(
            agent = %agent.id,
            counterpart = %counterpart,
            state = %current,
            chosen = %chosen,
            "decided"
        );
        Ok(chosen)
    }

    fn build_message(
        &self,
        agent: &mut AgentState,
        counterpart: &AgentId,
        input: &Message,
        chosen: Performative,
        rng: &mut StdRng,
    ) -> ParleyResult<Option<Message>> {
        use Performative::*;

        let payload = match chosen {
            Idle | Finished => return Ok(None),
            Propose => {
                let eligible = agent.eligible_items(counterpart);
                let name = agent
                    .preferences
                    .most_preferred(&eligible, rng)
                    .map(|i| i.name.clone())
                    .ok_or_else(|| ParleyError::StateMachine {
                        reason: format!("{} has nothing left to propose to {}", agent.id, counterpart),
                    })?;
                agent.mark_proposed(counterpart, &name);
                Payload::Item(name)
            }
            Accept => {
                let name = input.item_name()?.to_string();
                agent.expect_item(counterpart, &name);
                Payload::Item(name)
            }
            Reject | AskWhy => Payload::Item(input.item_name()?.to_string()),
            Commit => {
                let name = input.item_name()?;
                let item = agent.remove_from_bag(name).ok_or_else(|| ParleyError::UnknownItem {
                    name: name.to_string(),
                })?;
                agent.mark_agreed(counterpart, &item.name);
                agent.record_given();
                info!(agent = %agent.id, counterpart = %counterpart, item = %item, "item handed over");
                Payload::Item(item.name)
            }
            Ack => {
                let item = agent.catalogue_item(input.item_name()?)?.clone();
                agent.take_expected(counterpart);
                if !agent.add_to_bag(item.clone()) {
                    return Err(ParleyError::AlreadyHeld { name: item.name });
                }
                agent.mark_agreed(counterpart, &item.name);
                agent.record_received();
                info!(agent = %agent.id, counterpart = %counterpart, item = %item, "item received");
                Payload::Item(item.name)
            }
            Argue => {
                let outgoing = Self::fresh_argument(agent, counterpart, input)?;
                let ledger = agent.ledger_mut(counterpart);
                let parent = match input.argument() {
                    Ok(incoming) => {
                        let last = ledger.last();
                        Some(ledger.record(incoming.clone(), last))
                    }
                    Err(_) => None,
                };
                ledger.record(outgoing.clone(), parent);
                debug!(
                    agent = %agent.id,
                    counterpart = %counterpart,
                    argument = %outgoing,
                    "argument recorded"
                );
                Payload::Argument(outgoing)
            }
            Because | QueryRef | InformRef => input.payload().clone(),
        };

        Ok(Some(Message::new(
            agent.id.clone(),
            counterpart.clone(),
            chosen,
            payload,
        )))
    }
}
