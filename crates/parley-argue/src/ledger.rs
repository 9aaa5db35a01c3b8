//! Per-conversation argumentation ledger.
//!
//! The ledger is an append-only arena. Each entry stores the argument, the
//! index of the argument it rebuts (if any), its fingerprint, and a thread
//! hash chained from the root of its thread. Parent links are indices into
//! the arena, never owning references.
//!
//! Recording an argument that is already present returns the existing id,
//! so the ledger holds each distinct argument exactly once.

use std::collections::HashMap;

use tracing::{debug, warn};

use parley_contracts::argument::Argument;

use crate::fingerprint::{fingerprint, thread_hash, ROOT_HASH};

/// Position of an argument in its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArgumentId(usize);

impl ArgumentId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub argument: Argument,
    /// The argument this one rebuts.
    pub parent: Option<ArgumentId>,
    pub fingerprint: String,
    pub thread_hash: String,
}

/// The arguments exchanged with one counterpart during one conversation.
#[derive(Debug, Clone, Default)]
pub struct Argumentation {
    entries: Vec<LedgerEntry>,
    by_fingerprint: HashMap<String, ArgumentId>,
}

impl Argumentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `argument` as a rebuttal of `parent`.
    ///
    /// Idempotent: an argument equal to one already recorded keeps its
    /// original entry and parent. A `parent` id that does not belong to this
    /// ledger is dropped.
    pub fn record(&mut self, argument: Argument, parent: Option<ArgumentId>) -> ArgumentId {
        let fp = fingerprint(&argument);
        if let Some(&id) = self.by_fingerprint.get(&fp) {
            debug!(argument = %argument, "argument already recorded");
            return id;
        }

        let parent = match parent {
            Some(p) if p.0 < self.entries.len() => Some(p),
            Some(p) => {
                warn!(parent = p.0, len = self.entries.len(), "ignoring foreign parent id");
                None
            }
            None => None,
        };
        let parent_hash = parent
            .map(|p| self.entries[p.0].thread_hash.as_str())
            .unwrap_or(ROOT_HASH);
        let link = thread_hash(parent_hash, &fp);

        let id = ArgumentId(self.entries.len());
        self.by_fingerprint.insert(fp.clone(), id);
        self.entries.push(LedgerEntry {
            argument,
            parent,
            fingerprint: fp,
            thread_hash: link,
        });
        id
    }

    pub fn contains(&self, argument: &Argument) -> bool {
        self.by_fingerprint.contains_key(&fingerprint(argument))
    }

    pub fn id_of(&self, argument: &Argument) -> Option<ArgumentId> {
        self.by_fingerprint.get(&fingerprint(argument)).copied()
    }

    pub fn get(&self, id: ArgumentId) -> Option<&LedgerEntry> {
        self.entries.get(id.0)
    }

    pub fn parent_of(&self, id: ArgumentId) -> Option<ArgumentId> {
        self.get(id).and_then(|e| e.parent)
    }

    /// Arguments recorded as rebuttals of `id`, oldest first.
    pub fn rebuttals_of(&self, id: ArgumentId) -> Vec<ArgumentId> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.parent == Some(id))
            .map(|(i, _)| ArgumentId(i))
            .collect()
    }

    /// The arguments from the root of `id`'s thread down to `id`.
    pub fn thread(&self, id: ArgumentId) -> Vec<&Argument> {
        let mut path = Vec::new();
        let mut cursor = self.get(id).map(|_| id);
        while let Some(current) = cursor {
            let entry = &self.entries[current.0];
            path.push(&entry.argument);
            cursor = entry.parent;
        }
        path.reverse();
        path
    }

    /// The most recently recorded argument.
    pub fn last(&self) -> Option<ArgumentId> {
        self.entries.len().checked_sub(1).map(ArgumentId)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArgumentId, &LedgerEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (ArgumentId(i), e))
    }

    /// Recompute every fingerprint and thread hash.
    ///
    /// Returns `false` on the first entry whose stored hashes disagree with
    /// its argument or its parent.
    pub fn verify_integrity(&self) -> bool {
        self.entries.iter().all(|entry| {
            let parent_hash = match entry.parent {
                Some(p) => match self.entries.get(p.0) {
                    Some(parent) => parent.thread_hash.as_str(),
                    None => return false,
                },
                None => ROOT_HASH,
            };
            entry.fingerprint == fingerprint(&entry.argument)
                && entry.thread_hash == thread_hash(parent_hash, &entry.fingerprint)
        })
    }
}

#[cfg(test)]
mod tests {
    use parley_contracts::{
        agent::AgentId,
        argument::Argument,
        item::{CriterionName, Item, Value},
    };

    use super::{ArgumentId, Argumentation};

    fn arg(decision: bool, item: &str, criterion: CriterionName, value: Value) -> Argument {
        Argument::new(decision, Item::new(item, ""), AgentId::new("a")).with_couple_value(criterion, value)
    }

    #[test]
    fn record_is_idempotent() {
        let mut ledger = Argumentation::new();
        let first = ledger.record(arg(true, "X", CriterionName::Noise, Value::Good), None);
        let again = ledger.record(arg(true, "X", CriterionName::Noise, Value::Good), Some(first));

        assert_eq!(first, again);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.parent_of(first), None);
    }

    #[test]
    fn parent_links_form_threads() {
        let mut ledger = Argumentation::new();
        let root = ledger.record(arg(true, "X", CriterionName::Noise, Value::Good), None);
        let reply = ledger.record(arg(false, "X", CriterionName::Noise, Value::Bad), Some(root));
        let counter = ledger.record(arg(true, "Y", CriterionName::Noise, Value::VeryGood), Some(reply));
        let sibling = ledger.record(arg(false, "X", CriterionName::Durability, Value::VeryBad), Some(root));

        assert_eq!(ledger.parent_of(counter), Some(reply));
        assert_eq!(ledger.rebuttals_of(root), vec![reply, sibling]);
        assert_eq!(ledger.last(), Some(sibling));

        let thread: Vec<String> = ledger.thread(counter).iter().map(|a| a.canonical()).collect();
        assert_eq!(
            thread,
            vec![
                "PRO X: (NOISE, GOOD)",
                "CON X: (NOISE, BAD)",
                "PRO Y: (NOISE, VERY_GOOD)",
            ]
        );
        assert!(ledger.verify_integrity());
    }

    #[test]
    fn foreign_parent_is_dropped() {
        let mut ledger = Argumentation::new();
        let id = ledger.record(arg(true, "X", CriterionName::Noise, Value::Good), Some(ArgumentId(9)));
        assert_eq!(ledger.parent_of(id), None);
    }

    #[test]
    fn tampering_breaks_integrity() {
        let mut ledger = Argumentation::new();
        let root = ledger.record(arg(true, "X", CriterionName::Noise, Value::Good), None);
        ledger.record(arg(false, "X", CriterionName::Noise, Value::Bad), Some(root));
        assert!(ledger.verify_integrity());

        ledger.entries[0].argument = arg(true, "X", CriterionName::Noise, Value::VeryGood);
        assert!(!ledger.verify_integrity());
    }

    #[test]
    fn empty_ledger() {
        let ledger = Argumentation::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.last(), None);
        assert!(ledger.thread(ArgumentId(0)).is_empty());
        assert!(!ledger.contains(&arg(true, "X", CriterionName::Noise, Value::Good)));
    }
}
