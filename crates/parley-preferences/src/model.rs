//! The preference model owned by one agent.
//!
//! `Preferences` holds a strict ranking of criteria (most important first)
//! and one ordinal `Value` per (item, criterion) pair. Item scores, the
//! "most preferred" choice and the top-fraction acceptance test are all
//! derived from those two pieces.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    item::{CriterionName, CriterionValue, Item, Value},
};

#[derive(Debug, Clone, Default)]
pub struct Preferences {
    criterion_names: Vec<CriterionName>,
    criterion_values: Vec<CriterionValue>,
    /// (item name, criterion) → position in `criterion_values`.
    index: HashMap<(String, CriterionName), usize>,
}

impl Preferences {
    pub fn new(criterion_names: Vec<CriterionName>) -> Self {
        Self {
            criterion_names,
            ..Self::default()
        }
    }

    /// Criteria, most important first.
    pub fn criterion_name_list(&self) -> &[CriterionName] {
        &self.criterion_names
    }

    pub fn set_criterion_name_list(&mut self, criterion_names: Vec<CriterionName>) {
        self.criterion_names = criterion_names;
    }

    pub fn criterion_value_list(&self) -> &[CriterionValue] {
        &self.criterion_values
    }

    /// Record a judgment. A later judgment on the same (item, criterion)
    /// replaces the earlier one, so each pair holds exactly one value.
    pub fn add_criterion_value(&mut self, criterion_value: CriterionValue) {
        let key = (criterion_value.item.name.clone(), criterion_value.criterion);
        match self.index.get(&key) {
            Some(&pos) => self.criterion_values[pos] = criterion_value,
            None => {
                self.index.insert(key, self.criterion_values.len());
                self.criterion_values.push(criterion_value);
            }
        }
    }

    pub fn get_value(&self, item: &Item, criterion: CriterionName) -> Option<Value> {
        self.value_by_name(&item.name, criterion)
    }

    pub fn value_by_name(&self, item_name: &str, criterion: CriterionName) -> Option<Value> {
        self.index
            .get(&(item_name.to_string(), criterion))
            .map(|&pos| self.criterion_values[pos].value)
    }

    /// Position of `criterion` in the ranking, 0 being the most important.
    pub fn rank_of(&self, criterion: CriterionName) -> Option<usize> {
        self.criterion_names.iter().position(|c| *c == criterion)
    }

    /// True if `first` is ranked above `second`.
    ///
    /// An unranked criterion loses against any ranked one.
    pub fn is_preferred_criterion(&self, first: CriterionName, second: CriterionName) -> bool {
        match (self.rank_of(first), self.rank_of(second)) {
            (Some(a), Some(b)) => a < b,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Rank-weighted sum of the item's values.
    ///
    /// With `n` ranked criteria the most important one weighs `n`, the least
    /// important weighs 1. Missing judgments contribute nothing.
    pub fn item_score(&self, item: &Item) -> u32 {
        let n = self.criterion_names.len() as u32;
        self.criterion_names
            .iter()
            .enumerate()
            .filter_map(|(rank, c)| {
                self.get_value(item, *c)
                    .map(|v| v.weight() * (n - rank as u32))
            })
            .sum()
    }

    pub fn is_preferred_item(&self, first: &Item, second: &Item) -> bool {
        self.item_score(first) > self.item_score(second)
    }

    /// Items with their scores, best first; equal scores by name.
    pub fn sort_items<'a>(&self, items: &'a [Item]) -> Vec<(u32, &'a Item)> {
        let mut scored: Vec<(u32, &Item)> = items.iter().map(|i| (self.item_score(i), i)).collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.name.cmp(&b.1.name)));
        scored
    }

    /// The best-scored item; ties are broken uniformly at random.
    pub fn most_preferred<'a, R: Rng + ?Sized>(&self, items: &'a [Item], rng: &mut R) -> Option<&'a Item> {
        let best = items.iter().map(|i| self.item_score(i)).max()?;
        let tied: Vec<&Item> = items.iter().filter(|i| self.item_score(i) == best).collect();
        tied.choose(rng).copied()
    }

    /// True if `item` scores at least as well as the item at rank
    /// `ceil(len × fraction) − 1` of `items`.
    ///
    /// With the default fraction of 0.10 this is "among the top 10%".
    pub fn is_item_among_top_percent(&self, item: &Item, items: &[Item], fraction: f64) -> bool {
        let sorted = self.sort_items(items);
        if sorted.is_empty() {
            return false;
        }
        let cutoff = ((sorted.len() as f64 * fraction).ceil() as usize)
            .saturating_sub(1)
            .min(sorted.len() - 1);
        self.item_score(item) >= sorted[cutoff].0
    }

    /// Check that every item has exactly one value per ranked criterion.
    pub fn check_complete(&self, items: &[Item]) -> ParleyResult<()> {
        for item in items {
            for criterion in &self.criterion_names {
                if self.get_value(item, *criterion).is_none() {
                    return Err(ParleyError::Configuration {
                        reason: format!("no {} judgment for item '{}'", criterion, item.name),
                    });
                }
            }
        }
        Ok(())
    }
}
