//! Turning raw catalogue measures into an agent's ordinal judgments.
//!
//! An `IntervalProfile` cuts each criterion's raw range with three ascending
//! thresholds. A measure above `k` thresholds lands in bucket `k`; benefit
//! criteria map bucket 0..=3 to `VeryBad..=VeryGood`, cost criteria map it
//! the other way round.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use parley_contracts::{
    error::{ParleyError, ParleyResult},
    item::{CriterionName, CriterionValue, Item, Value},
};

use crate::{catalogue::ItemCatalogue, model::Preferences};

/// Number of thresholds needed to split a range into the four values.
pub const CUT_POINTS: usize = Value::ALL.len() - 1;

/// Source of an agent's ordinal judgment on one item and criterion.
pub trait ValueProfile {
    fn value_of(
        &self,
        catalogue: &ItemCatalogue,
        item: &Item,
        criterion: CriterionName,
    ) -> ParleyResult<Value>;
}

#[derive(Debug, Clone)]
pub struct IntervalProfile {
    cuts: HashMap<CriterionName, [f64; CUT_POINTS]>,
}

impl IntervalProfile {
    /// Draw thresholds uniformly in `[0, max measure]` for every criterion.
    pub fn random<R: Rng + ?Sized>(catalogue: &ItemCatalogue, rng: &mut R) -> Self {
        let mut cuts = HashMap::new();
        for criterion in CriterionName::ALL {
            let max = catalogue.max_measure(criterion).max(0.0);
            let mut points = [0.0; CUT_POINTS];
            for p in points.iter_mut() {
                *p = rng.gen::<f64>() * max;
            }
            points.sort_by(f64::total_cmp);
            debug!(criterion = %criterion, cuts = ?points, "generated random profile");
            cuts.insert(criterion, points);
        }
        Self { cuts }
    }

    /// Use fixed thresholds, keyed by criterion label.
    ///
    /// Every criterion needs exactly three ascending thresholds.
    pub fn fixed(thresholds: &HashMap<String, Vec<f64>>) -> ParleyResult<Self> {
        let mut cuts = HashMap::new();
        for (label, points) in thresholds {
            let criterion: CriterionName = label.parse()?;
            let points: [f64; CUT_POINTS] = points.as_slice().try_into().map_err(|_| {
                config_error(format!(
                    "criterion {} needs {} thresholds, got {}",
                    criterion,
                    CUT_POINTS,
                    points.len()
                ))
            })?;
            if points.windows(2).any(|w| w[0] > w[1]) {
                return Err(config_error(format!(
                    "thresholds for {} must be ascending",
                    criterion
                )));
            }
            cuts.insert(criterion, points);
        }

        let missing: Vec<&str> = CriterionName::ALL
            .iter()
            .filter(|c| !cuts.contains_key(*c))
            .map(|c| c.label())
            .collect();
        if !missing.is_empty() {
            return Err(config_error(format!(
                "no thresholds for: {}",
                missing.join(", ")
            )));
        }
        Ok(Self { cuts })
    }

    /// Classify a raw measure on `criterion`.
    pub fn classify(&self, criterion: CriterionName, raw: f64) -> Option<Value> {
        let cuts = self.cuts.get(&criterion)?;
        let bucket = cuts.iter().filter(|cut| raw > **cut).count();
        let bucket = if criterion.is_benefit() {
            bucket
        } else {
            CUT_POINTS - bucket
        };
        Some(Value::ALL[bucket])
    }
}

impl ValueProfile for IntervalProfile {
    fn value_of(
        &self,
        catalogue: &ItemCatalogue,
        item: &Item,
        criterion: CriterionName,
    ) -> ParleyResult<Value> {
        let raw = catalogue
            .measure(&item.name, criterion)
            .ok_or_else(|| ParleyError::UnknownItem {
                name: item.name.clone(),
            })?;
        self.classify(criterion, raw).ok_or_else(|| {
            config_error(format!("profile has no thresholds for {}", criterion))
        })
    }
}

/// Build a complete preference model for one agent.
///
/// The criterion ranking is a seeded shuffle; every (item, criterion) pair
/// of the catalogue gets exactly one value from `profile`.
pub fn generate_preferences<R: Rng + ?Sized>(
    catalogue: &ItemCatalogue,
    profile: &dyn ValueProfile,
    rng: &mut R,
) -> ParleyResult<Preferences> {
    let mut order = CriterionName::ALL.to_vec();
    order.shuffle(rng);

    let mut preferences = Preferences::new(order);
    let items = catalogue.items();
    for criterion in CriterionName::ALL {
        for item in &items {
            let value = profile.value_of(catalogue, item, criterion)?;
            preferences.add_criterion_value(CriterionValue::new(item.clone(), criterion, value));
        }
    }
    preferences.check_complete(&items)?;
    Ok(preferences)
}

fn config_error(reason: String) -> ParleyError {
    ParleyError::Configuration { reason }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use parley_contracts::item::{CriterionName, Value};

    use super::{generate_preferences, IntervalProfile, ValueProfile};
    use crate::catalogue::ItemCatalogue;

    fn thresholds() -> HashMap<String, Vec<f64>> {
        CriterionName::ALL
            .iter()
            .map(|c| (c.label().to_string(), vec![10.0, 20.0, 30.0]))
            .collect()
    }

    fn catalogue() -> ItemCatalogue {
        ItemCatalogue::from_toml_str(
            r#"
            [[items]]
            name = "Quiet"
            [items.measures]
            PRODUCTION_COST = 5.0
            CONSUMPTION = 15.0
            DURABILITY = 35.0
            ENVIRONMENT_IMPACT = 25.0
            NOISE = 5.0

            [[items]]
            name = "Loud"
            [items.measures]
            PRODUCTION_COST = 35.0
            CONSUMPTION = 25.0
            DURABILITY = 5.0
            ENVIRONMENT_IMPACT = 15.0
            NOISE = 35.0
            "#,
        )
        .unwrap()
    }

    #[test]
    fn benefit_criterion_maps_high_measures_to_good_values() {
        let profile = IntervalProfile::fixed(&thresholds()).unwrap();
        assert_eq!(profile.classify(CriterionName::Durability, 5.0), Some(Value::VeryBad));
        assert_eq!(profile.classify(CriterionName::Durability, 15.0), Some(Value::Bad));
        assert_eq!(profile.classify(CriterionName::Durability, 25.0), Some(Value::Good));
        assert_eq!(profile.classify(CriterionName::Durability, 35.0), Some(Value::VeryGood));
    }

    #[test]
    fn cost_criterion_maps_high_measures_to_bad_values() {
        let profile = IntervalProfile::fixed(&thresholds()).unwrap();
        assert_eq!(profile.classify(CriterionName::Noise, 5.0), Some(Value::VeryGood));
        assert_eq!(profile.classify(CriterionName::Noise, 35.0), Some(Value::VeryBad));
        // A measure equal to a threshold is not above it.
        assert_eq!(profile.classify(CriterionName::Noise, 10.0), Some(Value::VeryGood));
    }

    #[test]
    fn fixed_profile_validates_thresholds() {
        let mut short = thresholds();
        short.insert("NOISE".to_string(), vec![1.0, 2.0]);
        assert!(IntervalProfile::fixed(&short).is_err());

        let mut unordered = thresholds();
        unordered.insert("NOISE".to_string(), vec![3.0, 2.0, 1.0]);
        assert!(IntervalProfile::fixed(&unordered).is_err());

        let mut missing = thresholds();
        missing.remove("DURABILITY");
        let err = IntervalProfile::fixed(&missing).unwrap_err();
        assert!(err.to_string().contains("DURABILITY"));
    }

    #[test]
    fn random_profile_cuts_stay_within_catalogue_range() {
        let catalogue = catalogue();
        let mut rng = StdRng::seed_from_u64(3);
        let profile = IntervalProfile::random(&catalogue, &mut rng);

        for item in catalogue.items() {
            for criterion in CriterionName::ALL {
                assert!(profile.value_of(&catalogue, &item, criterion).is_ok());
            }
        }
    }

    #[test]
    fn generated_preferences_are_complete_and_reproducible() {
        let catalogue = catalogue();
        let profile = IntervalProfile::fixed(&thresholds()).unwrap();

        let a = generate_preferences(&catalogue, &profile, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = generate_preferences(&catalogue, &profile, &mut StdRng::seed_from_u64(11)).unwrap();

        assert_eq!(a.criterion_name_list(), b.criterion_name_list());
        assert_eq!(a.criterion_name_list().len(), CriterionName::ALL.len());
        assert_eq!(a.criterion_value_list().len(), 2 * CriterionName::ALL.len());
        assert!(a.check_complete(&catalogue.items()).is_ok());

        let quiet = catalogue.get("Quiet").unwrap();
        assert_eq!(a.get_value(quiet, CriterionName::Noise), Some(Value::VeryGood));
        assert_eq!(a.get_value(quiet, CriterionName::Durability), Some(Value::VeryGood));
    }
}
