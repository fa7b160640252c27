//! Immutable-in-spirit value types for hierarchical statecharts.
//!
//! A [`Statechart`] is produced by the external parser (or, for tests and
//! embedders, [`crate::builder::StatechartBuilder`]) and consumed by the
//! normaliser, which returns a new canonical value rather than mutating the
//! caller's copy in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The fixed id of the single root node.
pub const ROOT_ID: &str = "root";

/// A `(triggers, guard, effects)` tuple attached to a transition or a state.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Specification {
    /// Event names (or reserved words `"entry"`/`"exit"` on state specs) that fire this spec.
    pub triggers: Vec<String>,
    /// Optional guard expression, compared verbatim apart from whitespace in the comparison graph.
    pub guard: Option<String>,
    /// Side-effect names performed when this spec fires.
    pub effects: Vec<String>,
}

impl Specification {
    /// Builds a specification, sorting and deduplicating triggers/effects so that
    /// equality and hashing behave as set semantics.
    pub fn new<T, E>(triggers: T, guard: Option<String>, effects: E) -> Self
    where
        T: IntoIterator<Item = String>,
        E: IntoIterator<Item = String>,
    {
        Self {
            triggers: sorted_unique(triggers),
            guard,
            effects: sorted_unique(effects),
        }
    }

    /// True iff the trigger set contains `trigger`.
    #[must_use]
    pub fn has_trigger(&self, trigger: &str) -> bool {
        self.triggers.iter().any(|t| t == trigger)
    }

    /// Unions `other`'s effects into this spec's effects, keeping the set sorted and unique.
    pub fn union_effects<I: IntoIterator<Item = String>>(&mut self, other: I) {
        self.effects.extend(other);
        self.effects = sorted_unique(std::mem::take(&mut self.effects));
    }
}

fn sorted_unique(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut v: Vec<String> = items.into_iter().collect();
    v.sort();
    v.dedup();
    v
}

/// The history annotation on a [`Region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryMode {
    /// No history; re-entry always goes through the region's initial state.
    None,
    /// Re-entry resumes the last active direct child state.
    Shallow,
    /// Re-entry resumes the last active state at every nested level.
    Deep,
}

/// The subtype of a [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateKind {
    /// An ordinary state that may be marked `initial`.
    Normal,
    /// A terminal state of its region.
    Final,
    /// A pseudo-state used purely for branching transitions.
    Choice,
}

/// A region: a container of sibling states, parented by `Root` or by a [`State`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// The region's unique id.
    pub id: String,
    /// `"root"` if this region sits directly under the root, else the owning state's id.
    pub parent: String,
    /// The region's history mode.
    pub history: HistoryMode,
    /// Child state ids, in declaration order.
    pub children: Vec<String>,
}

/// A state: a child of exactly one [`Region`], itself optionally containing child regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// The state's unique id.
    pub id: String,
    /// The id of the region this state is a direct child of.
    pub parent_region: String,
    /// Human-readable name, used only by the tie-break graph.
    pub name: String,
    /// The state's subtype.
    pub kind: StateKind,
    /// Whether this is the default starting child of its region.
    pub initial: bool,
    /// Entry/exit/internal specifications attached directly to this state.
    pub specs: Vec<Specification>,
    /// Child region ids, in declaration order. Empty for a leaf state.
    pub children: Vec<String>,
}

impl State {
    /// A state is composite iff it has exactly one child region.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.children.len() == 1
    }

    /// A state is orthogonal iff it has more than one child region.
    #[must_use]
    pub fn is_orthogonal(&self) -> bool {
        self.children.len() > 1
    }

    /// A state is a leaf iff it has no child regions.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A labelled, directed edge between two states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    /// The transition's unique id.
    pub id: String,
    /// The id of the source state.
    pub source_id: String,
    /// The id of the target state.
    pub target_id: String,
    /// The transition's specification.
    pub spec: Specification,
}

/// A hierarchical statechart: a rooted tree of regions/states plus a transition table.
///
/// Construction is via the external parser or [`crate::builder::StatechartBuilder`];
/// this type itself only exposes read access plus the crate-internal mutation
/// helpers the normaliser needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statechart {
    /// Region ids directly under the root, in declaration order.
    pub(crate) root_children: Vec<String>,
    pub(crate) regions: BTreeMap<String, Region>,
    pub(crate) states: BTreeMap<String, State>,
    /// Transitions, keyed by `source_id`, in declaration order within each bucket.
    pub(crate) transitions: BTreeMap<String, Vec<Transition>>,
}

impl Statechart {
    /// Starts building a statechart with an empty root.
    #[must_use]
    pub fn builder() -> crate::builder::StatechartBuilder {
        crate::builder::StatechartBuilder::new()
    }

    /// The region ids directly under the root.
    #[must_use]
    pub fn root_children(&self) -> &[String] {
        &self.root_children
    }

    /// Looks up a region by id.
    #[must_use]
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Looks up a state by id.
    #[must_use]
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    /// All state ids, sorted, for deterministic downstream enumeration.
    #[must_use]
    pub fn state_ids_sorted(&self) -> Vec<String> {
        self.states.keys().cloned().collect()
    }

    /// All region ids, sorted.
    #[must_use]
    pub fn region_ids_sorted(&self) -> Vec<String> {
        self.regions.keys().cloned().collect()
    }

    /// The transitions whose `source_id` is `id`, in declaration order.
    #[must_use]
    pub fn transitions_from(&self, id: &str) -> &[Transition] {
        self.transitions.get(id).map_or(&[], Vec::as_slice)
    }

    /// All transitions across every source bucket, in `(source id, declaration order)` order.
    pub fn all_transitions(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.values().flatten()
    }

    /// The root-initial states: state-children of the root's regions marked `initial`.
    #[must_use]
    pub fn root_initial_states(&self) -> Vec<String> {
        let mut out = Vec::new();
        for region_id in &self.root_children {
            if let Some(region) = self.regions.get(region_id) {
                for state_id in &region.children {
                    if self.states.get(state_id).is_some_and(|s| s.initial) {
                        out.push(state_id.clone());
                    }
                }
            }
        }
        out
    }
}

/// Crate-internal mutation helpers used by the normaliser's rewriting passes.
/// None of these are exposed publicly: the only supported way to obtain a
/// canonical [`Statechart`] is [`crate::normalise::normalise`].
impl Statechart {
    pub(crate) fn state_mut(&mut self, id: &str) -> Option<&mut State> {
        self.states.get_mut(id)
    }

    pub(crate) fn region_mut(&mut self, id: &str) -> Option<&mut Region> {
        self.regions.get_mut(id)
    }

    pub(crate) fn remove_state(&mut self, id: &str) -> Option<State> {
        self.transitions.remove(id);
        self.states.remove(id)
    }

    pub(crate) fn remove_region(&mut self, id: &str) -> Option<Region> {
        self.regions.remove(id)
    }

    /// Replaces `old` with `new` in the child list of region `region_id`, preserving position.
    pub(crate) fn replace_child_in_region(&mut self, region_id: &str, old: &str, new: &str) {
        if let Some(region) = self.regions.get_mut(region_id) {
            for child in &mut region.children {
                if child == old {
                    *child = new.to_string();
                }
            }
        }
    }

    /// Removes `old` from the child list of region `region_id`.
    pub(crate) fn remove_child_from_region(&mut self, region_id: &str, old: &str) {
        if let Some(region) = self.regions.get_mut(region_id) {
            region.children.retain(|c| c != old);
        }
    }

    /// Rewrites every transition endpoint referring to `old` to refer to `new` instead,
    /// preserving transition ids, specifications, and the source-bucket's declaration order.
    pub(crate) fn rewrite_transition_endpoint(&mut self, old: &str, new: &str) {
        if let Some(mut moved) = self.transitions.remove(old) {
            for t in &mut moved {
                t.source_id = new.to_string();
            }
            self.transitions.entry(new.to_string()).or_default().extend(moved);
        }
        for bucket in self.transitions.values_mut() {
            for t in bucket.iter_mut() {
                if t.target_id == old {
                    t.target_id = new.to_string();
                }
            }
        }
    }

    /// Transitions whose `target_id` is `id`, mutable, across every source bucket.
    pub(crate) fn transitions_targeting_mut<'a>(&'a mut self, id: &'a str) -> impl Iterator<Item = &'a mut Transition> {
        self.transitions
            .values_mut()
            .flat_map(|bucket| bucket.iter_mut())
            .filter(move |t| t.target_id == id)
    }

    /// Transitions whose `source_id` is `id`, mutable.
    pub(crate) fn transitions_from_mut(&mut self, id: &str) -> impl Iterator<Item = &mut Transition> + '_ {
        self.transitions
            .get_mut(id)
            .into_iter()
            .flat_map(|bucket| bucket.iter_mut())
    }

    /// Removes every transition incident to `id` (as source or target), returning their ids.
    pub(crate) fn remove_transitions_incident(&mut self, id: &str) -> Vec<String> {
        let mut removed: Vec<String> = self
            .transitions
            .remove(id)
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.id)
            .collect();
        for bucket in self.transitions.values_mut() {
            let before = bucket.len();
            bucket.retain(|t| t.target_id != id);
            if bucket.len() != before {
                // the retained-out elements' ids are lost here deliberately; the caller
                // only needs source-bucket removals to report discarded transitions by id,
                // target-side prunes are incidental cleanup of dangling edges.
            }
        }
        removed.sort();
        removed
    }

    /// The region a state's parent region belongs to, i.e. its grandparent state,
    /// or `None` if the parent region sits directly under the root.
    pub(crate) fn grandparent_state(&self, region_id: &str) -> Option<String> {
        self.regions.get(region_id).and_then(|r| {
            if r.parent == ROOT_ID {
                None
            } else {
                Some(r.parent.clone())
            }
        })
    }

    /// Whether a region's parent is the root.
    pub(crate) fn region_parent_is_root(&self, region_id: &str) -> bool {
        self.regions.get(region_id).is_some_and(|r| r.parent == ROOT_ID)
    }

    /// A pre-order snapshot of state ids: for each region (root's, then recursively
    /// each visited state's), its child states in declaration order, descending into
    /// each state's own child regions before moving to the next sibling state.
    pub(crate) fn preorder_state_ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        for region_id in &self.root_children {
            self.preorder_region(region_id, &mut out);
        }
        out
    }

    fn preorder_region(&self, region_id: &str, out: &mut Vec<String>) {
        let Some(region) = self.regions.get(region_id) else { return };
        for state_id in &region.children {
            out.push(state_id.clone());
            if let Some(state) = self.states.get(state_id) {
                for child_region in &state.children {
                    self.preorder_region(child_region, out);
                }
            }
        }
    }
}
