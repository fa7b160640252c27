//! Lowers a canonical [`Statechart`] into the labelled directed multigraph the
//! matchers operate on.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoreError, CoreResult};
use crate::model::{HistoryMode, StateKind, Statechart};

/// What an atom of the comparison graph represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    State,
    Transition,
    Hierarchy,
}

/// A single node of the comparison graph: a state, a transition, or a
/// synthesised hierarchy edge, together with its label set.
#[derive(Debug, Clone)]
pub(crate) struct GraphNode {
    pub(crate) id: String,
    pub(crate) kind: NodeKind,
    pub(crate) labels: BTreeSet<String>,
    /// For transition/hierarchy nodes: the state id the edge originates from.
    pub(crate) source_id: Option<String>,
    /// For transition/hierarchy nodes: the state id the edge terminates at.
    pub(crate) target_id: Option<String>,
}

/// The labelled directed multigraph a single statechart lowers to,
/// or the smaller tie-break variant containing only named state nodes.
#[derive(Debug, Clone, Default)]
pub(crate) struct LabelledGraph {
    nodes: BTreeMap<String, GraphNode>,
    /// State ids, sorted, for deterministic enumeration.
    state_ids: Vec<String>,
    /// `(source_id, target_id) -> node ids`, combining transitions and
    /// hierarchy edges, since both occupy the same state-id-pair key space
    /// ("max_parallel_edges" counts them together).
    groups: BTreeMap<(String, String), Vec<String>>,
}

impl LabelledGraph {
    fn insert(&mut self, node: GraphNode) -> CoreResult<()> {
        if let Some(existing) = self.nodes.get(&node.id) {
            if let Some(shared) = existing.labels.intersection(&node.labels).next() {
                return Err(CoreError::AmbiguousLabelledNode { id: node.id.clone(), label: shared.clone() });
            }
        }
        if node.kind == NodeKind::State {
            self.state_ids.push(node.id.clone());
        }
        if let (Some(s), Some(t)) = (&node.source_id, &node.target_id) {
            self.groups.entry((s.clone(), t.clone())).or_default().push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    pub(crate) fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub(crate) fn has_label(&self, id: &str, label: &str) -> bool {
        self.nodes.get(id).is_some_and(|n| n.labels.contains(label))
    }

    /// State ids, sorted, as required for deterministic enumeration.
    pub(crate) fn sorted_state_ids(&self) -> &[String] {
        &self.state_ids
    }

    pub(crate) fn state_count(&self) -> usize {
        self.state_ids.len()
    }

    pub(crate) fn group(&self, source: &str, target: &str) -> Option<&[String]> {
        self.groups.get(&(source.to_string(), target.to_string())).map(Vec::as_slice)
    }

    pub(crate) fn groups(&self) -> impl Iterator<Item = (&(String, String), &Vec<String>)> {
        self.groups.iter()
    }

    /// The largest number of transition/hierarchy edges sharing a
    /// `(source, target)` pair (the matcher-size threshold input).
    pub(crate) fn max_parallel_edges(&self) -> usize {
        self.groups.values().map(Vec::len).max().unwrap_or(0)
    }

    /// All labelled atoms of the graph: `(node id, label)` for every label of
    /// every node.
    pub(crate) fn labelled_atoms(&self) -> BTreeSet<(String, String)> {
        let mut out = BTreeSet::new();
        for node in self.nodes.values() {
            for label in &node.labels {
                out.insert((node.id.clone(), label.clone()));
            }
        }
        out
    }

    /// Transition nodes whose `source_id` is `v`, i.e. `v`'s outgoing edges.
    pub(crate) fn transitions_from<'a>(&'a self, v: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes
            .values()
            .filter(move |n| n.kind == NodeKind::Transition && n.source_id.as_deref() == Some(v))
    }

    /// Transition nodes whose `target_id` is `v`, i.e. `v`'s incoming edges.
    pub(crate) fn transitions_to<'a>(&'a self, v: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes
            .values()
            .filter(move |n| n.kind == NodeKind::Transition && n.target_id.as_deref() == Some(v))
    }

    /// Every edge (transition or hierarchy) node incident to `v` as source.
    pub(crate) fn edges_from<'a>(&'a self, v: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes.values().filter(move |n| n.kind != NodeKind::State && n.source_id.as_deref() == Some(v))
    }

    /// Every edge (transition or hierarchy) node incident to `v` as target.
    pub(crate) fn edges_to<'a>(&'a self, v: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes.values().filter(move |n| n.kind != NodeKind::State && n.target_id.as_deref() == Some(v))
    }
}

/// Builds the full comparison graph for a canonical statechart.
pub(crate) fn build_comparison_graph(sc: &Statechart) -> CoreResult<LabelledGraph> {
    let mut g = LabelledGraph::default();

    for id in sc.state_ids_sorted() {
        let state = sc.state(&id).expect("id came from state_ids_sorted");
        let mut labels: BTreeSet<String> = BTreeSet::from(["state".to_string()]);

        if state.initial && matches!(state.kind, StateKind::Normal) {
            labels.insert("initial".to_string());
        }
        match state.kind {
            StateKind::Final => {
                labels.insert("final".to_string());
            }
            StateKind::Choice => {
                labels.insert("choice".to_string());
            }
            StateKind::Normal => {}
        }
        if state.is_composite() {
            labels.insert("composite".to_string());
        } else if state.is_orthogonal() {
            labels.insert("orthogonal".to_string());
        }
        if let Some(region) = sc.region(&state.parent_region) {
            match region.history {
                HistoryMode::None => {}
                HistoryMode::Shallow => {
                    labels.insert("history".to_string());
                    labels.insert("shallow_history".to_string());
                }
                HistoryMode::Deep => {
                    labels.insert("history".to_string());
                    labels.insert("deep_history".to_string());
                }
            }
        }

        g.insert(GraphNode { id, kind: NodeKind::State, labels, source_id: None, target_id: None })?;
    }

    for t in sc.all_transitions() {
        let mut labels: BTreeSet<String> = BTreeSet::from(["transition".to_string()]);
        for trigger in &t.spec.triggers {
            labels.insert(format!("trigger_{trigger}"));
        }
        for effect in &t.spec.effects {
            labels.insert(format!("effect_{effect}"));
        }
        if let Some(guard) = &t.spec.guard {
            if !guard.is_empty() {
                let stripped: String = guard.chars().filter(|c| !c.is_whitespace()).collect();
                labels.insert(format!("guard_{stripped}"));
            }
        }

        g.insert(GraphNode {
            id: t.id.clone(),
            kind: NodeKind::Transition,
            labels,
            source_id: Some(t.source_id.clone()),
            target_id: Some(t.target_id.clone()),
        })?;
    }

    for s1_id in sc.state_ids_sorted() {
        let s1 = sc.state(&s1_id).expect("id came from state_ids_sorted");
        for region_id in &s1.children {
            let Some(region) = sc.region(region_id) else { continue };
            for s2_id in &region.children {
                let node_id = format!("{s1_id}{s2_id}");
                g.insert(GraphNode {
                    id: node_id,
                    kind: NodeKind::Hierarchy,
                    labels: BTreeSet::from(["hierarchy".to_string()]),
                    source_id: Some(s1_id.clone()),
                    target_id: Some(s2_id.clone()),
                })?;
            }
        }
    }

    Ok(g)
}

/// Builds the tie-break graph: state nodes only, labelled with
/// `"state"` and `"name_" ++ <state name>`.
pub(crate) fn build_tie_break_graph(sc: &Statechart) -> LabelledGraph {
    let mut g = LabelledGraph::default();
    for id in sc.state_ids_sorted() {
        let state = sc.state(&id).expect("id came from state_ids_sorted");
        let labels = BTreeSet::from(["state".to_string(), format!("name_{}", state.name)]);
        // State ids are unique; this cannot fail.
        g.insert(GraphNode { id, kind: NodeKind::State, labels, source_id: None, target_id: None })
            .expect("tie-break graph ids are unique state ids");
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoryMode, Specification, StateKind, Statechart};

    fn sample() -> Statechart {
        Statechart::builder()
            .region("r0", HistoryMode::Shallow)
            .unwrap()
            .state("Off", "r0", "Off", StateKind::Normal, true, vec![])
            .unwrap()
            .state("On", "r0", "On", StateKind::Normal, false, vec![])
            .unwrap()
            .transition("t1", "Off", "On", Specification::new(["operate".to_string()], Some("x>0".to_string()), ["beep".to_string()]))
            .unwrap()
            .finish()
    }

    #[test]
    fn state_labels_follow_kind_and_history() {
        let sc = sample();
        let g = build_comparison_graph(&sc).unwrap();
        let off = g.node("Off").unwrap();
        assert!(off.labels.contains("state"));
        assert!(off.labels.contains("initial"));
        assert!(off.labels.contains("history"));
        assert!(off.labels.contains("shallow_history"));
    }

    #[test]
    fn transition_labels_include_trigger_guard_effect() {
        let sc = sample();
        let g = build_comparison_graph(&sc).unwrap();
        let t = g.node("t1").unwrap();
        assert!(t.labels.contains("transition"));
        assert!(t.labels.contains("trigger_operate"));
        assert!(t.labels.contains("effect_beep"));
        assert!(t.labels.contains("guard_x>0"));
    }

    #[test]
    fn hierarchy_edges_connect_composite_states_to_children() {
        let sc = Statechart::builder()
            .region("r0", HistoryMode::None)
            .unwrap()
            .state("Outer", "r0", "Outer", StateKind::Normal, true, vec![])
            .unwrap()
            .region_under("r1", "Outer", HistoryMode::None)
            .unwrap()
            .state("Inner", "r1", "Inner", StateKind::Normal, true, vec![])
            .unwrap()
            .finish();

        let g = build_comparison_graph(&sc).unwrap();
        let h = g.node("OuterInner").unwrap();
        assert_eq!(h.labels, BTreeSet::from(["hierarchy".to_string()]));
        assert_eq!(h.source_id.as_deref(), Some("Outer"));
        assert_eq!(h.target_id.as_deref(), Some("Inner"));
    }
}
