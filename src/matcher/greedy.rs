//! The greedy matcher: a linear-in-practice fallback used once either
//! statechart grows past the exhaustive matcher's size threshold.

use std::collections::BTreeSet;

use crate::graph::{GraphNode, LabelledGraph};
use crate::mapping::{self, Mapping};

pub(crate) fn best_mapping(g1: &LabelledGraph, g2: &LabelledGraph) -> Mapping {
    let mut mapping = greedy_state_mapping(g1, g2);
    extend_edges_greedily(g1, g2, &mut mapping);
    mapping
}

/// Repeatedly picks the unmapped `(state1, state2)` pair with the highest
/// `pair_score`, breaking ties with `look_ahead`, until no remaining pair
/// scores above zero.
fn greedy_state_mapping(g1: &LabelledGraph, g2: &LabelledGraph) -> Mapping {
    let mut mapping = Mapping::new();
    let states1 = g1.sorted_state_ids();
    let states2 = g2.sorted_state_ids();

    loop {
        let mut best: Option<(String, String, f64, usize)> = None;

        for a in states1 {
            if mapping.is_mapped_key(a) {
                continue;
            }
            for b in states2 {
                if mapping.is_mapped_value(b) {
                    continue;
                }
                let score = pair_score(g1, g2, &mapping, a, b);
                if score <= 0.0 {
                    continue;
                }
                let ahead = look_ahead(g1, g2, &mapping, a, b);
                let better = match &best {
                    None => true,
                    Some((_, _, bs, ba)) => score > *bs || ((score - *bs).abs() < f64::EPSILON && ahead > *ba),
                };
                if better {
                    best = Some((a.clone(), b.clone(), score, ahead));
                }
            }
        }

        match best {
            Some((a, b, _, _)) => {
                mapping.insert(a, b);
            }
            None => break,
        }
    }

    mapping
}

/// `match_count(x, y) + edges_score(predecessors) + edges_score(successors)`.
#[allow(clippy::cast_precision_loss)]
fn pair_score(g1: &LabelledGraph, g2: &LabelledGraph, mapping: &Mapping, a: &str, b: &str) -> f64 {
    let match_count = 2.0 * shared_label_count(g1, g2, a, b) as f64;

    let preds1 = predecessors(g1, a, |s| mapping.is_mapped_key(s));
    let preds2 = predecessors(g2, b, |s| mapping.is_mapped_value(s));
    let succs1 = successors(g1, a, |s| mapping.is_mapped_key(s));
    let succs2 = successors(g2, b, |s| mapping.is_mapped_value(s));

    match_count + edges_score(&preds1, &preds2) + edges_score(&succs1, &succs2)
}

fn shared_label_count(g1: &LabelledGraph, g2: &LabelledGraph, a: &str, b: &str) -> usize {
    let (Some(na), Some(nb)) = (g1.node(a), g2.node(b)) else { return 0 };
    na.labels.intersection(&nb.labels).count()
}

/// Incoming transitions to `v` whose source (the other endpoint) satisfies `other_mapped`.
fn predecessors<'a>(g: &'a LabelledGraph, v: &'a str, other_mapped: impl Fn(&str) -> bool) -> Vec<&'a GraphNode> {
    g.transitions_to(v).filter(|n| n.source_id.as_deref().is_some_and(&other_mapped)).collect()
}

/// Outgoing transitions from `v` whose target (the other endpoint) satisfies `other_mapped`.
fn successors<'a>(g: &'a LabelledGraph, v: &'a str, other_mapped: impl Fn(&str) -> bool) -> Vec<&'a GraphNode> {
    g.transitions_from(v).filter(|n| n.target_id.as_deref().is_some_and(&other_mapped)).collect()
}

/// `(Σ 2·|labels(e1)∩labels(e2)| / (|labels(e1)|+|labels(e2)|) over E1×E2) / |E1×E2|
///  × (total labels on E1 + total labels on E2)`, zero if either set is empty.
#[allow(clippy::cast_precision_loss)]
fn edges_score(e1: &[&GraphNode], e2: &[&GraphNode]) -> f64 {
    if e1.is_empty() || e2.is_empty() {
        return 0.0;
    }

    let mut sum = 0.0;
    for a in e1 {
        for b in e2 {
            let overlap = a.labels.intersection(&b.labels).count() as f64;
            let denom = (a.labels.len() + b.labels.len()) as f64;
            if denom > 0.0 {
                sum += 2.0 * overlap / denom;
            }
        }
    }

    let pair_count = (e1.len() * e2.len()) as f64;
    let total_labels: usize =
        e1.iter().map(|n| n.labels.len()).sum::<usize>() + e2.iter().map(|n| n.labels.len()).sum::<usize>();

    (sum / pair_count) * total_labels as f64
}

/// `|potential(out(x), out(y))| + |potential(out(y), out(x))| + |potential(in(x), in(y))| + |potential(in(y), in(x))|`.
fn look_ahead(g1: &LabelledGraph, g2: &LabelledGraph, mapping: &Mapping, a: &str, b: &str) -> usize {
    let out_a = labelled_atoms_of(g1.transitions_from(a));
    let out_b = labelled_atoms_of(g2.transitions_from(b));
    let in_a = labelled_atoms_of(g1.transitions_to(a));
    let in_b = labelled_atoms_of(g2.transitions_to(b));

    potential(&out_a, &label_set_of(&out_b))
        + potential(&out_b, &label_set_of(&out_a))
        + potential(&in_a, &label_set_of(&in_b))
        + potential(&in_b, &label_set_of(&in_a))
}

fn labelled_atoms_of<'a>(nodes: impl Iterator<Item = &'a GraphNode>) -> Vec<(&'a str, &'a str)> {
    nodes.flat_map(|n| n.labels.iter().map(move |l| (n.id.as_str(), l.as_str()))).collect()
}

fn label_set_of(atoms: &[(&str, &str)]) -> BTreeSet<String> {
    atoms.iter().map(|(_, l)| (*l).to_string()).collect()
}

/// `potential(A, B) = { (n, l) in A : l in labels(B) }`.
fn potential(a: &[(&str, &str)], b_labels: &BTreeSet<String>) -> usize {
    a.iter().filter(|(_, l)| b_labels.contains(*l)).count()
}

/// Once the state mapping is fixed, greedily maps each edge group
/// `(a, b)` -> `(mapping(a), mapping(b))` with no backtracking: within a
/// group, repeatedly pick the highest-overlap unmapped pair.
fn extend_edges_greedily(g1: &LabelledGraph, g2: &LabelledGraph, mapping: &mut Mapping) {
    for ((a, b), ids1) in g1.groups() {
        let (Some(ma), Some(mb)) = (mapping.get(a), mapping.get(b)) else { continue };
        let Some(ids2) = g2.group(ma, mb) else { continue };
        greedy_match_group(g1, g2, ids1, ids2, mapping);
    }
}

fn greedy_match_group(g1: &LabelledGraph, g2: &LabelledGraph, ids1: &[String], ids2: &[String], mapping: &mut Mapping) {
    let mut used2: BTreeSet<&String> = BTreeSet::new();
    let mut remaining1: Vec<&String> = ids1.iter().collect();

    while !remaining1.is_empty() {
        let mut best: Option<(usize, usize, usize)> = None;
        for (i, id1) in remaining1.iter().enumerate() {
            let Some(n1) = g1.node(id1) else { continue };
            for (j, id2) in ids2.iter().enumerate() {
                if used2.contains(id2) {
                    continue;
                }
                let Some(n2) = g2.node(id2) else { continue };
                let overlap = n1.labels.intersection(&n2.labels).count();
                if overlap == 0 {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((bo, ..)) => overlap > bo,
                };
                if better {
                    best = Some((overlap, i, j));
                }
            }
        }
        match best {
            Some((_, i, j)) => {
                let id1 = remaining1.remove(i).clone();
                let id2 = ids2[j].clone();
                used2.insert(&ids2[j]);
                mapping.insert(id1, id2);
            }
            None => break,
        }
    }
}
