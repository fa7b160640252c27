//! A minimal, invariant-enforcing construction API for [`Statechart`] values.
//!
//! The external parser is the normal source of `Statechart`s; this builder is
//! the primitive it (or a test, or an embedder skipping the on-disk format
//! entirely) would drive. It is not a general-purpose editing API: states and
//! regions can only be added, never removed or reparented, and every id must
//! be fresh when it is introduced.

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::model::{HistoryMode, Region, Specification, State, StateKind, Statechart, Transition, ROOT_ID};

/// Builds a [`Statechart`] one region/state/transition at a time.
#[derive(Debug, Default)]
pub struct StatechartBuilder {
    root_children: Vec<String>,
    regions: BTreeMap<String, Region>,
    states: BTreeMap<String, State>,
    transitions: BTreeMap<String, Vec<Transition>>,
}

impl StatechartBuilder {
    /// Starts a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region under the root.
    pub fn region(mut self, id: &str, history: HistoryMode) -> CoreResult<Self> {
        self.insert_region(id, ROOT_ID, history)?;
        self.root_children.push(id.to_string());
        Ok(self)
    }

    /// Adds a region as a child of an existing state.
    pub fn region_under(mut self, id: &str, parent_state: &str, history: HistoryMode) -> CoreResult<Self> {
        if !self.states.contains_key(parent_state) {
            return Err(CoreError::StructuralIntegrity(format!(
                "region `{id}` declared under unknown state `{parent_state}`"
            )));
        }
        self.insert_region(id, parent_state, history)?;
        self.states.get_mut(parent_state).unwrap().children.push(id.to_string());
        Ok(self)
    }

    fn insert_region(&mut self, id: &str, parent: &str, history: HistoryMode) -> CoreResult<()> {
        if self.regions.contains_key(id) {
            return Err(CoreError::StructuralIntegrity(format!("duplicate region id `{id}`")));
        }
        self.regions.insert(
            id.to_string(),
            Region { id: id.to_string(), parent: parent.to_string(), history, children: Vec::new() },
        );
        Ok(())
    }

    /// Adds a state as a child of an existing region.
    #[allow(clippy::too_many_arguments)]
    pub fn state(
        mut self,
        id: &str,
        parent_region: &str,
        name: &str,
        kind: StateKind,
        initial: bool,
        specs: Vec<Specification>,
    ) -> CoreResult<Self> {
        if !self.regions.contains_key(parent_region) {
            return Err(CoreError::StructuralIntegrity(format!(
                "state `{id}` declared under unknown region `{parent_region}`"
            )));
        }
        if self.states.contains_key(id) {
            return Err(CoreError::StructuralIntegrity(format!("duplicate state id `{id}`")));
        }
        self.states.insert(
            id.to_string(),
            State {
                id: id.to_string(),
                parent_region: parent_region.to_string(),
                name: name.to_string(),
                kind,
                initial,
                specs,
                children: Vec::new(),
            },
        );
        self.regions.get_mut(parent_region).unwrap().children.push(id.to_string());
        Ok(self)
    }

    /// Adds a transition between two already-declared states.
    pub fn transition(mut self, id: &str, source_id: &str, target_id: &str, spec: Specification) -> CoreResult<Self> {
        if !self.states.contains_key(source_id) {
            return Err(CoreError::StructuralIntegrity(format!("transition `{id}` has unknown source `{source_id}`")));
        }
        if !self.states.contains_key(target_id) {
            return Err(CoreError::StructuralIntegrity(format!("transition `{id}` has unknown target `{target_id}`")));
        }
        self.transitions.entry(source_id.to_string()).or_default().push(Transition {
            id: id.to_string(),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            spec,
        });
        Ok(self)
    }

    /// Finishes construction, returning the assembled statechart.
    #[must_use]
    pub fn finish(self) -> Statechart {
        Statechart {
            root_children: self.root_children,
            regions: self.regions,
            states: self.states,
            transitions: self.transitions,
        }
    }
}
