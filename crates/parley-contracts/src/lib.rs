//! # parley-contracts
//!
//! Shared types, message formats, and error contracts for the parley
//! negotiation runtime.
//!
//! All crates in the workspace import from here. No negotiation logic lives
//! in this crate, only data definitions and error types.

pub mod agent;
pub mod argument;
pub mod error;
pub mod item;
pub mod message;
pub mod performative;
