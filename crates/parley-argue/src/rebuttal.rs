//! Searching for a counter-argument to an opponent's argument.
//!
//! For every couple-value premise `(c, v)` of the incoming argument about
//! item X, three kinds of rebuttal are tried in priority order:
//!
//! 1. `BetterAlternative`: another held item Y beats v on c; argue for Y.
//! 2. `ContradictingEvaluation`: the agent rates X lower than v on c.
//! 3. `OutrankingCriterion`: a criterion the agent ranks above c on which
//!    X is BAD or VERY_BAD; the argument also states the ranking.
//!
//! Candidates already in the ledger are skipped. When nothing is left the
//! result is `NoArgumentAvailable`, which callers treat as a concession.

use std::fmt;

use tracing::debug;

use parley_contracts::{
    agent::AgentId,
    argument::Argument,
    error::{ParleyError, ParleyResult},
    item::Item,
};
use parley_preferences::Preferences;

use crate::ledger::Argumentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebuttalKind {
    BetterAlternative,
    ContradictingEvaluation,
    OutrankingCriterion,
}

impl fmt::Display for RebuttalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BetterAlternative => "better alternative",
            Self::ContradictingEvaluation => "contradicting evaluation",
            Self::OutrankingCriterion => "outranking criterion",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rebuttal {
    pub kind: RebuttalKind,
    pub argument: Argument,
}

/// Every rebuttal of `incoming` the agent could make, in priority order.
///
/// `bag` is the set of items the agent currently holds; only those can be
/// offered as better alternatives.
pub fn rebuttal_candidates(
    incoming: &Argument,
    preferences: &Preferences,
    bag: &[Item],
    owner: &AgentId,
) -> Vec<Rebuttal> {
    let target = incoming.item();
    let mut out = Vec::new();

    for premise in incoming.couple_values() {
        let (criterion, claimed) = (premise.criterion, premise.value);

        let mut alternatives: Vec<(&Item, _)> = bag
            .iter()
            .filter(|y| *y != target)
            .filter_map(|y| preferences.get_value(y, criterion).map(|v| (y, v)))
            .filter(|(_, v)| *v > claimed)
            .collect();
        alternatives.sort_by(|a, b| b.1.cmp(&a.1));
        for (y, value) in alternatives {
            out.push(Rebuttal {
                kind: RebuttalKind::BetterAlternative,
                argument: Argument::new(true, y.clone(), owner.clone()).with_couple_value(criterion, value),
            });
        }

        if let Some(own) = preferences.get_value(target, criterion).filter(|own| *own < claimed) {
            out.push(Rebuttal {
                kind: RebuttalKind::ContradictingEvaluation,
                argument: Argument::new(false, target.clone(), owner.clone()).with_couple_value(criterion, own),
            });
        }

        for better in preferences
            .criterion_name_list()
            .iter()
            .copied()
            .filter(|c| preferences.is_preferred_criterion(*c, criterion))
        {
            if let Some(value) = preferences.get_value(target, better).filter(|v| v.is_unfavourable()) {
                out.push(Rebuttal {
                    kind: RebuttalKind::OutrankingCriterion,
                    argument: Argument::new(false, target.clone(), owner.clone())
                        .with_couple_value(better, value)
                        .with_comparison(better, criterion),
                });
            }
        }
    }

    out
}

/// The highest-priority rebuttal of `incoming` that is not in `ledger`.
///
/// # Errors
///
/// `NoArgumentAvailable` when every candidate has already been used or
/// there was none to begin with.
pub fn parse_argument(
    incoming: &Argument,
    preferences: &Preferences,
    bag: &[Item],
    owner: &AgentId,
    ledger: &Argumentation,
) -> ParleyResult<Rebuttal> {
    rebuttal_candidates(incoming, preferences, bag, owner)
        .into_iter()
        .find(|r| r.argument != *incoming && !ledger.contains(&r.argument))
        .ok_or_else(|| {
            debug!(owner = %owner, incoming = %incoming, "no fresh rebuttal");
            ParleyError::NoArgumentAvailable {
                item: incoming.item().name.clone(),
            }
        })
}
