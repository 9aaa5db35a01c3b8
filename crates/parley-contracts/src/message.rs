//! Messages exchanged between agents.
//!
//! A message is immutable once built. The payload is one of an item name,
//! an argument, or opaque JSON content; handlers that need a specific kind
//! use the typed accessors, which fail with `ParleyError::PayloadType`.

use serde::{Deserialize, Serialize};

use crate::{
    agent::AgentId,
    argument::Argument,
    error::{ParleyError, ParleyResult},
    performative::Performative,
};

/// The body of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum Payload {
    Empty,
    /// Name of the item the message is about.
    Item(String),
    Argument(Argument),
    /// Arbitrary JSON. The runtime never inspects this.
    Content(serde_json::Value),
}

impl Payload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Item(_) => "item",
            Self::Argument(_) => "argument",
            Self::Content(_) => "content",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    sender: AgentId,
    receiver: AgentId,
    performative: Performative,
    payload: Payload,
}

impl Message {
    pub fn new(
        sender: AgentId,
        receiver: AgentId,
        performative: Performative,
        payload: Payload,
    ) -> Self {
        Self {
            sender,
            receiver,
            performative,
            payload,
        }
    }

    pub fn sender(&self) -> &AgentId {
        &self.sender
    }

    pub fn receiver(&self) -> &AgentId {
        &self.receiver
    }

    pub fn performative(&self) -> Performative {
        self.performative
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The item this message is about.
    ///
    /// An argument payload names its target item, so it is accepted too.
    pub fn item_name(&self) -> ParleyResult<&str> {
        match &self.payload {
            Payload::Item(name) => Ok(name),
            Payload::Argument(argument) => Ok(argument.item().name()),
            other => Err(self.payload_error("item", other)),
        }
    }

    pub fn argument(&self) -> ParleyResult<&Argument> {
        match &self.payload {
            Payload::Argument(argument) => Ok(argument),
            other => Err(self.payload_error("argument", other)),
        }
    }

    fn payload_error(&self, expected: &str, found: &Payload) -> ParleyError {
        ParleyError::PayloadType {
            performative: self.performative,
            expected: expected.to_string(),
            found: found.kind().to_string(),
        }
    }
}
