//! Pass 2: remove unreachable states.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::model::Statechart;

/// Removes every state not reachable from a root-initial state via
/// composite-initial-descent edges and transitions, along with their
/// descendant regions/states and all incident transitions. Returns the ids
/// that were removed.
pub(crate) fn remove_unreachable_states(sc: &mut Statechart) -> BTreeSet<String> {
    let reachable = reachable_set(sc);
    let all: BTreeSet<String> = sc.state_ids_sorted().into_iter().collect();
    let unreachable: BTreeSet<String> = all.difference(&reachable).cloned().collect();

    for id in &unreachable {
        if sc.state(id).is_some() {
            remove_state_subtree(sc, id);
        }
    }

    unreachable
}

fn reachable_set(sc: &Statechart) -> BTreeSet<String> {
    let adjacency = auxiliary_graph(sc);
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<String> = sc.root_initial_states().into_iter().collect();

    for start in &queue {
        visited.insert(start.clone());
    }

    while let Some(id) = queue.pop_front() {
        if let Some(next) = adjacency.get(&id) {
            for n in next {
                if visited.insert(n.clone()) {
                    queue.push_back(n.clone());
                }
            }
        }
    }

    visited
}

/// Builds the auxiliary `state id -> state id` graph used for reachability: a
/// composite-initial-descent edge for every composite state's initial
/// grand-child, plus an edge for every transition.
fn auxiliary_graph(sc: &Statechart) -> BTreeMap<String, Vec<String>> {
    let mut adjacency: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for id in sc.state_ids_sorted() {
        let Some(state) = sc.state(&id) else { continue };
        if !state.is_composite() {
            continue;
        }
        for region_id in &state.children {
            let Some(region) = sc.region(region_id) else { continue };
            for grandchild_id in &region.children {
                if sc.state(grandchild_id).is_some_and(|g| g.initial) {
                    adjacency.entry(id.clone()).or_default().push(grandchild_id.clone());
                }
            }
        }
    }

    for t in sc.all_transitions() {
        adjacency.entry(t.source_id.clone()).or_default().push(t.target_id.clone());
    }

    adjacency
}

/// Removes `id` and, recursively, every state nested in its child regions
/// (which, being reachable only through `id`, are themselves unreachable),
/// along with all transitions incident to any removed state.
fn remove_state_subtree(sc: &mut Statechart, id: &str) {
    let children_regions: Vec<String> = sc.state(id).map(|s| s.children.clone()).unwrap_or_default();

    for region_id in &children_regions {
        let child_states: Vec<String> = sc.region(region_id).map(|r| r.children.clone()).unwrap_or_default();
        for child_state_id in &child_states {
            if sc.state(child_state_id).is_some() {
                remove_state_subtree(sc, child_state_id);
            }
        }
        sc.remove_region(region_id);
    }

    if let Some(parent_region) = sc.state(id).map(|s| s.parent_region.clone()) {
        sc.remove_child_from_region(&parent_region, id);
    }

    sc.remove_transitions_incident(id);
    sc.remove_state(id);
}
