//! # parley-argue
//!
//! Argument generation, rebuttal search, and per-conversation argumentation
//! ledgers for parley agents.
//!
//! ## Overview
//!
//! An agent asked "why?" about one of its proposals answers with
//! [`support_proposal`]; an agent receiving an argument answers with
//! [`parse_argument`]. Both consult the conversation's [`Argumentation`]
//! ledger and never repeat an argument already exchanged, so every
//! argumentative thread ends after finitely many rounds with
//! `ParleyError::NoArgumentAvailable`.
//!
//! Ledger entries are keyed by a SHA-256 fingerprint of the argument's
//! canonical form and chained along their rebuttal links, so
//! [`Argumentation::verify_integrity`] detects an entry edited in place.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parley_argue::{parse_argument, support_proposal, Argumentation};
//!
//! let mut ledger = Argumentation::new();
//! let argument = support_proposal(&item, &prefs, &me, &ledger)?;
//! let id = ledger.record(argument.clone(), None);
//! // ... later, on the counterpart's side:
//! let rebuttal = parse_argument(&argument, &their_prefs, &their_bag, &them, &their_ledger)?;
//! ```

pub mod fingerprint;
pub mod generation;
pub mod ledger;
pub mod rebuttal;

pub use fingerprint::fingerprint;
pub use generation::{attack_proposal, list_attacking_proposal, list_supporting_proposal, support_proposal};
pub use ledger::{ArgumentId, Argumentation, LedgerEntry};
pub use rebuttal::{parse_argument, rebuttal_candidates, Rebuttal, RebuttalKind};
