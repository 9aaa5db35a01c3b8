//! # parley-protocol
//!
//! TOML-driven conversation protocol graphs for the parley runtime.
//!
//! ## Overview
//!
//! This crate provides [`TomlProtocol`], which implements the
//! [`Protocol`](parley_core::traits::Protocol) trait. Nodes are performative
//! labels, edges are legal transitions, one node is initial and one or more
//! are final. The whole graph is validated when it is loaded; a graph that
//! disagrees with the `Performative` enum never reaches a conversation.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use parley_protocol::TomlProtocol;
//!
//! let protocol = Arc::new(TomlProtocol::standard()?);
//! // Share `protocol` with every `ConversationFsm`.
//! ```

pub mod engine;
pub mod graph;

pub use engine::TomlProtocol;
pub use graph::{EdgeSpec, NodeSpec, ProtocolConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────
