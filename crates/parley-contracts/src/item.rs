//! Items under negotiation and the ordinal judgments agents hold about them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParleyError;

/// A tradeable item. Two items are the same item iff their names match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
}

impl Item {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The criteria items are judged on in this deployment.
///
/// Each criterion has a fixed polarity: for a benefit a larger raw measure
/// is better, for a cost a smaller one is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionName {
    ProductionCost,
    Consumption,
    Durability,
    EnvironmentImpact,
    Noise,
}

impl CriterionName {
    pub const ALL: [CriterionName; 5] = [
        Self::ProductionCost,
        Self::Consumption,
        Self::Durability,
        Self::EnvironmentImpact,
        Self::Noise,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ProductionCost => "PRODUCTION_COST",
            Self::Consumption => "CONSUMPTION",
            Self::Durability => "DURABILITY",
            Self::EnvironmentImpact => "ENVIRONMENT_IMPACT",
            Self::Noise => "NOISE",
        }
    }

    /// True for a benefit criterion, false for a cost.
    pub fn is_benefit(self) -> bool {
        matches!(self, Self::Durability)
    }
}

impl fmt::Display for CriterionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CriterionName {
    type Err = ParleyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label() == s)
            .ok_or_else(|| ParleyError::Configuration {
                reason: format!("unknown criterion '{}'", s),
            })
    }
}

/// Four-point ordinal scale, `VeryBad < Bad < Good < VeryGood`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Value {
    VeryBad,
    Bad,
    Good,
    VeryGood,
}

impl Value {
    /// Ascending order.
    pub const ALL: [Value; 4] = [Self::VeryBad, Self::Bad, Self::Good, Self::VeryGood];

    /// Scoring weight, 1 for `VeryBad` up to 4 for `VeryGood`.
    pub fn weight(self) -> u32 {
        match self {
            Self::VeryBad => 1,
            Self::Bad => 2,
            Self::Good => 3,
            Self::VeryGood => 4,
        }
    }

    pub fn is_favourable(self) -> bool {
        matches!(self, Self::Good | Self::VeryGood)
    }

    pub fn is_unfavourable(self) -> bool {
        !self.is_favourable()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryBad => "VERY_BAD",
            Self::Bad => "BAD",
            Self::Good => "GOOD",
            Self::VeryGood => "VERY_GOOD",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The judgment of one item on one criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionValue {
    pub item: Item,
    pub criterion: CriterionName,
    pub value: Value,
}

impl CriterionValue {
    pub fn new(item: Item, criterion: CriterionName, value: Value) -> Self {
        Self {
            item,
            criterion,
            value,
        }
    }
}
