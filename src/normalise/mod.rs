//! The canonicalising rewriting pipeline.
//!
//! Each pass takes a `&mut Statechart` and mutates it in place; the public
//! [`normalise`] entry point clones its input so the operation still reads as
//! a pure, functional rewrite to callers.

mod actions;
mod dedup;
mod nesting;
mod reachability;
mod time_units;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::model::Statechart;

/// The bookkeeping produced by a single [`normalise`] call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalisationReport {
    /// Ids of states removed because they were unreachable from any root-initial state.
    pub unreachable_removed: BTreeSet<String>,
    /// Ids of single-region wrapper states collapsed away.
    pub collapsed_wrapper_states: BTreeSet<String>,
    /// Ids of transitions discarded as exact duplicates of an earlier transition.
    pub discarded_duplicate_transitions: BTreeSet<String>,
    /// The canonical statechart.
    pub canonical: Statechart,
}

/// Canonicalises `statechart`, applying five rewriting passes in order:
/// remove unnecessary nesting, remove unreachable states, convert entry/exit
/// actions, remove duplicate transitions, normalise time-unit triggers. A
/// final duplicate-removal sweep follows the time-unit pass so that
/// normalisation stays idempotent even when unit canonicalisation exposes new
/// duplicates.
pub fn normalise(statechart: &Statechart) -> CoreResult<NormalisationReport> {
    let mut sc = statechart.clone();

    let collapsed = nesting::remove_unnecessary_nesting(&mut sc)?;
    log::debug!("nesting pass collapsed {} wrapper state(s)", collapsed.len());

    let unreachable = reachability::remove_unreachable_states(&mut sc);
    log::debug!("reachability pass removed {} unreachable state(s)", unreachable.len());

    actions::convert_entry_exit_actions(&mut sc);

    let mut discarded = dedup::remove_duplicate_transitions(&mut sc);

    time_units::normalise_time_units(&mut sc)?;
    discarded.extend(dedup::remove_duplicate_transitions(&mut sc));
    log::debug!("dedup passes discarded {} duplicate transition(s)", discarded.len());

    Ok(NormalisationReport {
        unreachable_removed: unreachable,
        collapsed_wrapper_states: collapsed,
        discarded_duplicate_transitions: discarded,
        canonical: sc,
    })
}

#[cfg(test)]
mod tests;
