//! Normalises hierarchical statecharts into a canonical form and compares two
//! of them for structural similarity.
//!
//! The pipeline is: parse (external to this crate) -> [`normalise`] ->
//! lower to a labelled comparison graph -> find the best node mapping
//! between two such graphs -> assemble a [`diff::ComparisonResult`].

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![warn(missing_docs)]

mod builder;
mod diff;
mod error;
mod graph;
mod mapping;
mod matcher;
mod model;
mod normalise;

pub use self::diff::{ComparisonResult, Similarities};
pub use self::error::{CoreError, CoreResult};
pub use self::model::{HistoryMode, Region, Specification, State, StateKind, Statechart, Transition, ROOT_ID};
pub use self::normalise::{normalise, NormalisationReport};

/// Tuning knobs for [`compare_with_options`].
#[derive(Debug, Clone, Copy)]
pub struct CompareOptions {
    /// The matcher-size threshold below which the exhaustive matcher is used
    /// instead of the greedy fallback. Measured against the larger of the two
    /// graphs' state counts and the larger of their per-edge-group sizes.
    pub exhaustive_threshold: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self { exhaustive_threshold: 10 }
    }
}

/// Normalises, then compares, two statecharts with the default
/// [`CompareOptions`].
///
/// # Errors
/// Returns an error if either statechart fails normalisation (see
/// [`normalise`]) or if lowering either canonical form to a comparison graph
/// finds two nodes sharing an `(id, label)` pair.
pub fn compare(a: &Statechart, b: &Statechart) -> CoreResult<ComparisonResult> {
    compare_with_options(a, b, CompareOptions::default())
}

/// As [`compare`], with explicit [`CompareOptions`].
///
/// # Errors
/// See [`compare`].
pub fn compare_with_options(a: &Statechart, b: &Statechart, options: CompareOptions) -> CoreResult<ComparisonResult> {
    let report1 = normalise::normalise(a)?;
    let report2 = normalise::normalise(b)?;

    let g1 = graph::build_comparison_graph(&report1.canonical)?;
    let g2 = graph::build_comparison_graph(&report2.canonical)?;
    let tb1 = graph::build_tie_break_graph(&report1.canonical);
    let tb2 = graph::build_tie_break_graph(&report2.canonical);

    let (mapping, is_greedy) = matcher::best_mapping(&g1, &g2, &tb1, &tb2, options.exhaustive_threshold);

    Ok(diff::assemble(&g1, &g2, &mapping, is_greedy))
}

#[cfg(test)]
mod tests;
