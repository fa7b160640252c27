//! Assembles a [`ComparisonResult`] from a chosen mapping: the matched,
//! added, and removed labelled atoms grouped into label sets, plus the
//! similarity metrics derived from them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::graph::LabelledGraph;
use crate::mapping::{self, AtomClass, Mapping};

/// The similarity metrics, all normalised to `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Similarities {
    /// `2 * score / (|L(G1)| + |L(G2)|)`.
    pub similarity: f64,
    /// `score / |L(G1)|`.
    pub single_similarity_0: f64,
    /// `score / |L(G2)|`.
    pub single_similarity_1: f64,
    /// `max(single_similarity_0, single_similarity_1)`.
    pub max_similarity: f64,
    /// `2 * |state-matches| / (|state atoms in G1| + |state atoms in G2|)`.
    pub state_similarity: f64,
}

/// The full output of comparing two statecharts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Labels present in both graphs under the chosen mapping, keyed by
    /// `(G1 node id, G2 node id)` and grouped into the set of labels shared
    /// by that matched node pair.
    pub matches: BTreeMap<(String, String), BTreeSet<String>>,
    /// Labels of `G1` with no counterpart in `G2` under the chosen mapping,
    /// keyed by `G1` node id.
    pub deletions: BTreeMap<String, BTreeSet<String>>,
    /// Labels of `G2` with no counterpart in `G1` under the chosen mapping,
    /// keyed by `G2` node id.
    pub additions: BTreeMap<String, BTreeSet<String>>,
    /// The similarity metrics derived from `matches`/`deletions`/`additions`.
    pub similarities: Similarities,
    /// Whether the greedy matcher (rather than the exhaustive one) produced this result.
    pub is_greedy: bool,
}

pub(crate) fn assemble(g1: &LabelledGraph, g2: &LabelledGraph, m: &Mapping, is_greedy: bool) -> ComparisonResult {
    let matched_set = mapping::matches(g1, g2, m);
    let atoms1 = g1.labelled_atoms();
    let atoms2 = g2.labelled_atoms();

    let matched_g1: BTreeSet<(String, String)> = matched_set.iter().map(|(a, _)| a.clone()).collect();
    let matched_g2: BTreeSet<(String, String)> = matched_set.iter().map(|(_, b)| b.clone()).collect();
    let matched_count = matched_set.len();

    let mut matches: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
    for ((id1, label), (id2, _)) in matched_set {
        matches.entry((id1, id2)).or_default().insert(label);
    }

    let deletions = group_by_node(atoms1.difference(&matched_g1));
    let additions = group_by_node(atoms2.difference(&matched_g2));

    let similarities = compute_similarities(g1, g2, &atoms1, &atoms2, &matched_g1, matched_count);

    ComparisonResult { matches, deletions, additions, similarities, is_greedy }
}

fn group_by_node<'a>(atoms: impl Iterator<Item = &'a (String, String)>) -> BTreeMap<String, BTreeSet<String>> {
    let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (id, label) in atoms {
        grouped.entry(id.clone()).or_default().insert(label.clone());
    }
    grouped
}

fn compute_similarities(
    g1: &LabelledGraph,
    g2: &LabelledGraph,
    atoms1: &BTreeSet<(String, String)>,
    atoms2: &BTreeSet<(String, String)>,
    matched_g1: &BTreeSet<(String, String)>,
    matched_count: usize,
) -> Similarities {
    let similarity = ratio(2 * matched_count, atoms1.len() + atoms2.len());
    let single_similarity_0 = ratio(matched_count, atoms1.len());
    let single_similarity_1 = ratio(matched_count, atoms2.len());
    let max_similarity = single_similarity_0.max(single_similarity_1);

    let state_total_1 = atoms1.iter().filter(|(id, _)| classify_node(g1, id) == AtomClass::State).count();
    let state_total_2 = atoms2.iter().filter(|(id, _)| classify_node(g2, id) == AtomClass::State).count();
    let state_matched = matched_g1.iter().filter(|(id, _)| classify_node(g1, id) == AtomClass::State).count();
    let state_similarity = ratio(2 * state_matched, state_total_1 + state_total_2);

    Similarities { similarity, single_similarity_0, single_similarity_1, max_similarity, state_similarity }
}

fn classify_node(g: &LabelledGraph, id: &str) -> AtomClass {
    g.node(id).map_or(AtomClass::State, |n| mapping::classify(&n.labels))
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
