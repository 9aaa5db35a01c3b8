//! Building arguments for or against an item from an agent's preferences.
//!
//! Premises are listed in the agent's criterion ranking order, so index 0 is
//! always the strongest premise. An empty list is a normal outcome meaning
//! there is nothing to say, not a failure.

use tracing::debug;

use parley_contracts::{
    agent::AgentId,
    argument::{Argument, CoupleValue},
    error::{ParleyError, ParleyResult},
    item::{Item, Value},
};
use parley_preferences::Preferences;

use crate::ledger::Argumentation;

/// Premises in favour of `item`: every ranked criterion it scores GOOD or
/// VERY_GOOD on.
pub fn list_supporting_proposal(item: &Item, preferences: &Preferences) -> Vec<CoupleValue> {
    premises_where(item, preferences, Value::is_favourable)
}

/// Premises against `item`: every ranked criterion it scores BAD or
/// VERY_BAD on.
pub fn list_attacking_proposal(item: &Item, preferences: &Preferences) -> Vec<CoupleValue> {
    premises_where(item, preferences, Value::is_unfavourable)
}

fn premises_where(item: &Item, preferences: &Preferences, keep: fn(Value) -> bool) -> Vec<CoupleValue> {
    preferences
        .criterion_name_list()
        .iter()
        .filter_map(|c| {
            preferences
                .get_value(item, *c)
                .filter(|v| keep(*v))
                .map(|v| CoupleValue::new(*c, v))
        })
        .collect()
}

/// The strongest PRO argument about `item` not yet in `ledger`.
///
/// # Errors
///
/// `NoArgumentAvailable` once every supporting premise has been used.
pub fn support_proposal(
    item: &Item,
    preferences: &Preferences,
    owner: &AgentId,
    ledger: &Argumentation,
) -> ParleyResult<Argument> {
    first_fresh(true, item, list_supporting_proposal(item, preferences), owner, ledger)
}

/// The strongest CON argument about `item` not yet in `ledger`.
///
/// # Errors
///
/// `NoArgumentAvailable` once every attacking premise has been used.
pub fn attack_proposal(
    item: &Item,
    preferences: &Preferences,
    owner: &AgentId,
    ledger: &Argumentation,
) -> ParleyResult<Argument> {
    first_fresh(false, item, list_attacking_proposal(item, preferences), owner, ledger)
}

fn first_fresh(
    decision: bool,
    item: &Item,
    premises: Vec<CoupleValue>,
    owner: &AgentId,
    ledger: &Argumentation,
) -> ParleyResult<Argument> {
    let total = premises.len();
    premises
        .into_iter()
        .map(|p| Argument::new(decision, item.clone(), owner.clone()).with_couple_value(p.criterion, p.value))
        .find(|candidate| !ledger.contains(candidate))
        .ok_or_else(|| {
            debug!(item = %item, decision, premises = total, "argument candidates exhausted");
            ParleyError::NoArgumentAvailable {
                item: item.name.clone(),
            }
        })
}

#[cfg(test)]
mod tests {
    use parley_contracts::{
        agent::AgentId,
        argument::CoupleValue,
        error::ParleyError,
        item::{CriterionName, CriterionValue, Item, Value},
    };
    use parley_preferences::Preferences;

    use super::{attack_proposal, list_attacking_proposal, list_supporting_proposal, support_proposal};
    use crate::ledger::Argumentation;

    use CriterionName::*;

    fn x() -> Item {
        Item::new("X", "")
    }

    #[test]
    fn premises_follow_the_criterion_ranking() {
        let mut prefs = Preferences::new(vec![Durability, ProductionCost]);
        prefs.add_criterion_value(CriterionValue::new(x(), Durability, Value::Good));
        prefs.add_criterion_value(CriterionValue::new(x(), ProductionCost, Value::Bad));

        assert_eq!(
            list_supporting_proposal(&x(), &prefs),
            vec![CoupleValue::new(Durability, Value::Good)]
        );
        assert_eq!(
            list_attacking_proposal(&x(), &prefs),
            vec![CoupleValue::new(ProductionCost, Value::Bad)]
        );
    }

    #[test]
    fn no_qualifying_criterion_gives_empty_list() {
        let mut prefs = Preferences::new(vec![Noise]);
        prefs.add_criterion_value(CriterionValue::new(x(), Noise, Value::VeryGood));
        assert!(list_attacking_proposal(&x(), &prefs).is_empty());
        assert!(list_supporting_proposal(&Item::new("unknown", ""), &prefs).is_empty());
    }

    #[test]
    fn strongest_premise_comes_first() {
        let mut prefs = Preferences::new(vec![Noise, Consumption, Durability]);
        prefs.add_criterion_value(CriterionValue::new(x(), Durability, Value::VeryGood));
        prefs.add_criterion_value(CriterionValue::new(x(), Noise, Value::Good));
        prefs.add_criterion_value(CriterionValue::new(x(), Consumption, Value::VeryBad));

        let owner = AgentId::new("a");
        let argument = support_proposal(&x(), &prefs, &owner, &Argumentation::new()).unwrap();
        assert_eq!(argument.canonical(), "PRO X: (NOISE, GOOD)");
        assert_eq!(argument.owner(), &owner);

        let attack = attack_proposal(&x(), &prefs, &owner, &Argumentation::new()).unwrap();
        assert_eq!(attack.canonical(), "CON X: (CONSUMPTION, VERY_BAD)");
    }

    #[test]
    fn deduplication_exhausts_after_k_arguments() {
        let ranking = vec![ProductionCost, Consumption, Durability, EnvironmentImpact, Noise];
        let mut prefs = Preferences::new(ranking);
        // K = 3 favourable criteria.
        for (c, v) in [
            (ProductionCost, Value::Good),
            (Consumption, Value::VeryGood),
            (Durability, Value::Bad),
            (EnvironmentImpact, Value::Good),
            (Noise, Value::VeryBad),
        ] {
            prefs.add_criterion_value(CriterionValue::new(x(), c, v));
        }

        let owner = AgentId::new("a");
        let mut ledger = Argumentation::new();
        let mut sent = Vec::new();
        for _ in 0..3 {
            let argument = support_proposal(&x(), &prefs, &owner, &ledger).unwrap();
            sent.push(argument.canonical());
            ledger.record(argument, ledger.last());
        }

        assert_eq!(
            sent,
            vec![
                "PRO X: (PRODUCTION_COST, GOOD)",
                "PRO X: (CONSUMPTION, VERY_GOOD)",
                "PRO X: (ENVIRONMENT_IMPACT, GOOD)",
            ]
        );
        match support_proposal(&x(), &prefs, &owner, &ledger) {
            Err(ParleyError::NoArgumentAvailable { item }) => assert_eq!(item, "X"),
            other => panic!("expected NoArgumentAvailable, got {:?}", other),
        }
    }
}
