//! Selects between the exhaustive matcher and the greedy
//! fallback based on statechart size.

mod exhaustive;
mod greedy;

use crate::graph::LabelledGraph;
use crate::mapping::Mapping;

/// Finds the best mapping between `g1` and `g2`, choosing the exhaustive
/// matcher when both graphs are small enough (per `threshold`) and falling
/// back to the greedy heuristic otherwise. Returns the mapping and whether
/// the greedy matcher was used.
pub(crate) fn best_mapping(
    g1: &LabelledGraph,
    g2: &LabelledGraph,
    tb1: &LabelledGraph,
    tb2: &LabelledGraph,
    threshold: usize,
) -> (Mapping, bool) {
    let bound = [g1.state_count(), g2.state_count(), g1.max_parallel_edges(), g2.max_parallel_edges()]
        .into_iter()
        .max()
        .unwrap_or(0);

    if bound <= threshold {
        log::debug!("comparison size {bound} <= threshold {threshold}: using exhaustive matcher");
        (exhaustive::best_mapping(g1, g2, tb1, tb2), false)
    } else {
        log::debug!("comparison size {bound} > threshold {threshold}: falling back to greedy matcher");
        (greedy::best_mapping(g1, g2), true)
    }
}
