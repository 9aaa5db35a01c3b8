//! # parley-preferences
//!
//! What a parley agent believes about the items under negotiation.
//!
//! - [`ItemCatalogue`]: the items of a simulation and their raw measures.
//! - [`ValueProfile`] / [`IntervalProfile`]: turn raw measures into the
//!   ordinal `Value` scale.
//! - [`Preferences`]: a criterion ranking plus one value per
//!   (item, criterion), with scoring and acceptance queries on top.
//!
//! ```rust,ignore
//! let catalogue = ItemCatalogue::from_toml_str(CATALOGUE)?;
//! let profile = IntervalProfile::random(&catalogue, &mut rng);
//! let prefs = generate_preferences(&catalogue, &profile, &mut rng)?;
//! let favourite = prefs.most_preferred(&catalogue.items(), &mut rng);
//! ```

pub mod catalogue;
pub mod model;
pub mod profile;

pub use catalogue::{ItemCatalogue, ItemSpec};
pub use model::Preferences;
pub use profile::{generate_preferences, IntervalProfile, ValueProfile};
