//! In-process transport with a one-tick delivery delay.
//!
//! Messages sent during tick `t` sit in the pending queue until the
//! scheduler calls `dispatch(t + 1)`, which moves them into the receivers'
//! inboxes. An agent therefore never sees a message in the tick it was sent,
//! including its own.

use std::collections::HashMap;

use tracing::debug;

use parley_contracts::{agent::AgentId, message::Message};
use parley_core::traits::Transport;

/// One delivered message and its timing.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub message: Message,
    pub sent_at: u64,
    pub delivered_at: u64,
}

#[derive(Debug, Default)]
pub struct Mailbox {
    tick: u64,
    pending: Vec<(u64, Message)>,
    inboxes: HashMap<AgentId, Vec<Message>>,
    transcript: Vec<Delivery>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tick of the last dispatch.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Start tick `tick`: deliver everything sent before it.
    ///
    /// Returns the number of messages delivered.
    pub fn dispatch(&mut self, tick: u64) -> usize {
        self.tick = tick;
        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(sent_at, _)| *sent_at < tick);
        self.pending = later;

        let count = due.len();
        for (sent_at, message) in due {
            debug!(
                tick,
                sent_at,
                sender = %message.sender(),
                receiver = %message.receiver(),
                performative = %message.performative(),
                "delivering message"
            );
            self.inboxes
                .entry(message.receiver().clone())
                .or_default()
                .push(message.clone());
            self.transcript.push(Delivery {
                message,
                sent_at,
                delivered_at: tick,
            });
        }
        count
    }

    /// Messages sent but not delivered yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Every delivery so far, in delivery order.
    pub fn transcript(&self) -> &[Delivery] {
        &self.transcript
    }
}

impl Transport for Mailbox {
    fn send(&mut self, message: Message) {
        debug!(
            tick = self.tick,
            sender = %message.sender(),
            receiver = %message.receiver(),
            performative = %message.performative(),
            "message sent"
        );
        self.pending.push((self.tick, message));
    }

    fn drain(&mut self, agent: &AgentId) -> Vec<Message> {
        self.inboxes.remove(agent).unwrap_or_default()
    }
}
