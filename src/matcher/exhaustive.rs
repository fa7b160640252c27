//! The exhaustive matcher: enumerates every maximal injective
//! state mapping, extends each with every injective per-edge-group mapping,
//! and picks the highest-scoring candidate with deterministic tie-breaking.

use itertools::Itertools;

use crate::graph::LabelledGraph;
use crate::mapping::{self, Mapping};

pub(crate) fn best_mapping(g1: &LabelledGraph, g2: &LabelledGraph, tb1: &LabelledGraph, tb2: &LabelledGraph) -> Mapping {
    let states1 = g1.sorted_state_ids();
    let states2 = g2.sorted_state_ids();
    let k = states1.len().min(states2.len());

    let candidates = enumerate_candidates(g1, g2, states1, states2, k);
    log::debug!("exhaustive matcher scored {} candidate mapping(s)", candidates.len());

    select_best(g1, g2, tb1, tb2, candidates)
}

/// Every candidate full mapping: a size-`k` state mapping extended by the
/// Cartesian product of per-edge-group injective mappings.
fn enumerate_candidates(g1: &LabelledGraph, g2: &LabelledGraph, states1: &[String], states2: &[String], k: usize) -> Vec<Mapping> {
    if k == 0 {
        return vec![Mapping::new()];
    }

    let mut out = Vec::new();
    for perm in states1.iter().cloned().permutations(k) {
        for combo in states2.iter().cloned().combinations(k) {
            let mut sigma = Mapping::new();
            for (a, b) in perm.iter().zip(combo.iter()) {
                sigma.insert(a.clone(), b.clone());
            }
            out.extend(extend_with_edges(g1, g2, &sigma));
        }
    }
    out
}

/// Extends a state mapping `sigma` with every combination of per-edge-group
/// injective mappings.
fn extend_with_edges(g1: &LabelledGraph, g2: &LabelledGraph, sigma: &Mapping) -> Vec<Mapping> {
    let mut group_candidates: Vec<Vec<Vec<(String, String)>>> = Vec::new();

    for ((a, b), ids1) in g1.groups() {
        let (Some(ma), Some(mb)) = (sigma.get(a), sigma.get(b)) else { continue };
        let Some(ids2) = g2.group(ma, mb) else { continue };
        group_candidates.push(enumerate_injective(ids1, ids2));
    }

    let mut results = vec![sigma.clone()];
    for candidates in group_candidates {
        let mut next = Vec::with_capacity(results.len() * candidates.len().max(1));
        for base in &results {
            for assoc in &candidates {
                let mut m = base.clone();
                let mut ok = true;
                for (x, y) in assoc {
                    if !m.insert(x.clone(), y.clone()) {
                        ok = false;
                        break;
                    }
                }
                if ok {
                    next.push(m);
                }
            }
        }
        results = next;
    }
    results
}

/// Every size-`min(|ids1|, |ids2|)` injective pairing between two id lists,
/// via the same permutation-x-combination scheme as the state mapping.
fn enumerate_injective(ids1: &[String], ids2: &[String]) -> Vec<Vec<(String, String)>> {
    let k = ids1.len().min(ids2.len());
    if k == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for perm in ids1.iter().cloned().permutations(k) {
        for combo in ids2.iter().cloned().combinations(k) {
            out.push(perm.iter().cloned().zip(combo.iter().cloned()).collect());
        }
    }
    out
}

/// Scores every candidate, takes the arg-max set, and breaks ties against the
/// tie-break graphs.
fn select_best(g1: &LabelledGraph, g2: &LabelledGraph, tb1: &LabelledGraph, tb2: &LabelledGraph, candidates: Vec<Mapping>) -> Mapping {
    let scored: Vec<(usize, Mapping)> = candidates.into_iter().map(|m| (mapping::score(g1, g2, &m), m)).collect();
    let max_score = scored.iter().map(|(s, _)| *s).max().unwrap_or(0);
    let argmax: Vec<Mapping> = scored.into_iter().filter(|(s, _)| *s == max_score).map(|(_, m)| m).collect();

    if argmax.len() == 1 {
        return argmax.into_iter().next().unwrap();
    }

    let tb_scored: Vec<(usize, Mapping)> = argmax.into_iter().map(|m| (mapping::score(tb1, tb2, &m), m)).collect();
    let tb_max = tb_scored.iter().map(|(s, _)| *s).max().unwrap_or(0);
    tb_scored.into_iter().find(|(s, _)| *s == tb_max).map(|(_, m)| m).unwrap_or_default()
}
