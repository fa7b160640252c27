//! Partial injective node mappings between two comparison graphs, and the
//! scoring primitives built on top of them.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::LabelledGraph;

/// A partial injective function from graph-1 node ids to graph-2 node ids.
/// Insertion fails (returning `false`, leaving the mapping unchanged) if the
/// key is already mapped or the value is already somebody's image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Mapping {
    forward: BTreeMap<String, String>,
    backward: BTreeMap<String, String>,
}

impl Mapping {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Attempts to add `a -> b`; returns whether it was added.
    pub(crate) fn insert(&mut self, a: String, b: String) -> bool {
        if self.forward.contains_key(&a) || self.backward.contains_key(&b) {
            return false;
        }
        self.forward.insert(a.clone(), b.clone());
        self.backward.insert(b, a);
        true
    }

    pub(crate) fn get(&self, a: &str) -> Option<&String> {
        self.forward.get(a)
    }

    /// True iff `b` is already the image of some key (used to filter "other
    /// endpoint already mapped" edge sets in the greedy matcher).
    pub(crate) fn is_mapped_value(&self, b: &str) -> bool {
        self.backward.contains_key(b)
    }

    pub(crate) fn is_mapped_key(&self, a: &str) -> bool {
        self.forward.contains_key(a)
    }

    pub(crate) fn pairs(&self) -> impl Iterator<Item = (&String, &String)> {
        self.forward.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.forward.len()
    }
}

/// `matches(G1, G2, M)`: every labelled atom of `G1` whose node
/// is mapped to a node of `G2` carrying the same label.
pub(crate) fn matches(
    g1: &LabelledGraph,
    g2: &LabelledGraph,
    m: &Mapping,
) -> BTreeSet<((String, String), (String, String))> {
    let mut out = BTreeSet::new();
    for (id, label) in g1.labelled_atoms() {
        if let Some(mapped) = m.get(&id) {
            if g2.has_label(mapped, &label) {
                out.insert(((id.clone(), label.clone()), (mapped.clone(), label)));
            }
        }
    }
    out
}

/// `score(M) = |matches(G1, G2, M)|`.
pub(crate) fn score(g1: &LabelledGraph, g2: &LabelledGraph, m: &Mapping) -> usize {
    matches(g1, g2, m).len()
}

/// The classification used for `state_similarity` and diff
/// grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AtomClass {
    Hierarchy,
    Transition,
    State,
}

/// Classifies a node's full label set.
pub(crate) fn classify(labels: &BTreeSet<String>) -> AtomClass {
    if labels.len() == 1 && labels.contains("hierarchy") {
        return AtomClass::Hierarchy;
    }
    let is_transition = labels.iter().any(|l| {
        l == "transition" || l.starts_with("trigger_") || l.starts_with("guard_") || l.starts_with("effect_")
    });
    if is_transition {
        AtomClass::Transition
    } else {
        AtomClass::State
    }
}
