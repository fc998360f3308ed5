//! Per-respondent reference graph.
//!
//! Nodes are question ids. An edge `B -> A` means "the answer to B mentions A".
//! Only answers whose reference cache is known contribute edges; an answer with
//! no entry here has never been analysed (or its cache was unreadable).

use std::collections::{BTreeMap, BTreeSet};

use crate::store::QuestionId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceGraph {
    outgoing: BTreeMap<QuestionId, BTreeSet<QuestionId>>,
    incoming: BTreeMap<QuestionId, BTreeSet<QuestionId>>,
}

impl ReferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the outgoing edges of `dependent`.
    pub fn set_references(&mut self, dependent: QuestionId, referenced: BTreeSet<QuestionId>) {
        self.clear(dependent);
        for target in &referenced {
            self.incoming.entry(*target).or_default().insert(dependent);
        }
        self.outgoing.insert(dependent, referenced);
    }

    /// Forgets everything known about `dependent`'s references.
    pub fn clear(&mut self, dependent: QuestionId) {
        if let Some(previous) = self.outgoing.remove(&dependent) {
            for target in previous {
                if let Some(sources) = self.incoming.get_mut(&target) {
                    sources.remove(&dependent);
                    if sources.is_empty() {
                        self.incoming.remove(&target);
                    }
                }
            }
        }
    }

    /// Known references of `dependent`, or `None` if it has never been analysed.
    pub fn references_of(&self, dependent: QuestionId) -> Option<&BTreeSet<QuestionId>> {
        self.outgoing.get(&dependent)
    }

    /// Whether `dependent`'s known references include `target`.
    pub fn depends_on(&self, dependent: QuestionId, target: QuestionId) -> bool {
        self.outgoing
            .get(&dependent)
            .is_some_and(|refs| refs.contains(&target))
    }

    /// Answers known to mention `target`, ascending.
    pub fn dependents_of(&self, target: QuestionId) -> Vec<QuestionId> {
        self.incoming
            .get(&target)
            .map(|sources| sources.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_known(&self, dependent: QuestionId) -> bool {
        self.outgoing.contains_key(&dependent)
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(BTreeSet::len).sum()
    }
}
