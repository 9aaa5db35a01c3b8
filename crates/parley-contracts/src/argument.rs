//! Arguments and the premises that justify them.
//!
//! An `Argument` claims that an item should be accepted (`decision = true`)
//! or rejected (`decision = false`) and carries premises of two kinds:
//!
//! - `CoupleValue`: "item is VALUE on CRITERION"
//! - `Comparison`:  "CRITERION_A matters more than CRITERION_B"
//!
//! Identity is the canonical string form over decision, item and premises.
//! The owning agent is provenance only and takes no part in equality.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{
    agent::AgentId,
    item::{CriterionName, Item, Value},
};

/// A (criterion, value) premise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoupleValue {
    pub criterion: CriterionName,
    pub value: Value,
}

impl CoupleValue {
    pub fn new(criterion: CriterionName, value: Value) -> Self {
        Self { criterion, value }
    }
}

impl fmt::Display for CoupleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.criterion, self.value)
    }
}

/// A premise stating that `best` is more important than `worst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comparison {
    pub best: CriterionName,
    pub worst: CriterionName,
}

impl Comparison {
    pub fn new(best: CriterionName, worst: CriterionName) -> Self {
        Self { best, worst }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {}", self.best, self.worst)
    }
}

/// A claim for or against an item plus its justifying premises.
///
/// The `(decision, item)` pair is fixed at construction; premises are
/// append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argument {
    decision: bool,
    item: Item,
    owner: AgentId,
    comparisons: Vec<Comparison>,
    couple_values: Vec<CoupleValue>,
}

impl Argument {
    pub fn new(decision: bool, item: Item, owner: AgentId) -> Self {
        Self {
            decision,
            item,
            owner,
            comparisons: Vec::new(),
            couple_values: Vec::new(),
        }
    }

    pub fn add_premiss_comparison(&mut self, best: CriterionName, worst: CriterionName) {
        self.comparisons.push(Comparison::new(best, worst));
    }

    pub fn add_premiss_couple_value(&mut self, criterion: CriterionName, value: Value) {
        self.couple_values.push(CoupleValue::new(criterion, value));
    }

    /// Builder form of [`Argument::add_premiss_couple_value`].
    pub fn with_couple_value(mut self, criterion: CriterionName, value: Value) -> Self {
        self.add_premiss_couple_value(criterion, value);
        self
    }

    /// Builder form of [`Argument::add_premiss_comparison`].
    pub fn with_comparison(mut self, best: CriterionName, worst: CriterionName) -> Self {
        self.add_premiss_comparison(best, worst);
        self
    }

    pub fn decision(&self) -> bool {
        self.decision
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn owner(&self) -> &AgentId {
        &self.owner
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn couple_values(&self) -> &[CoupleValue] {
        &self.couple_values
    }

    /// Canonical form used for equality, hashing and ledger fingerprints.
    ///
    /// Example: `PRO Diesel Engine: (DURABILITY, GOOD); DURABILITY > NOISE`
    pub fn canonical(&self) -> String {
        let mut premises: Vec<String> = self.couple_values.iter().map(|c| c.to_string()).collect();
        premises.extend(self.comparisons.iter().map(|c| c.to_string()));
        format!(
            "{} {}: {}",
            if self.decision { "PRO" } else { "CON" },
            self.item.name,
            premises.join("; ")
        )
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Argument {}

impl Hash for Argument {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}
