//! # parley-core
//!
//! The conversation state machine that drives every negotiation.
//!
//! This crate provides:
//! - The three seams (`Protocol`, `Deliberator`, `Transport`)
//! - `ConversationFsm`, which alternates inference and decision half-steps
//!   over a shared protocol graph and delegates every choice to a
//!   `Deliberator`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parley_core::{ConversationFsm, traits::{Deliberator, Protocol, Transport}};
//! ```

pub mod fsm;
pub mod traits;

pub use fsm::{ConversationFsm, Turn};
