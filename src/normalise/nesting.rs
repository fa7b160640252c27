//! Pass 1: remove unnecessary nesting.

use std::collections::BTreeSet;

use crate::error::{CoreError, CoreResult};
use crate::model::Statechart;

/// Removes single-region wrapper states, returning the ids of the collapsed
/// wrapper states.
pub(crate) fn remove_unnecessary_nesting(sc: &mut Statechart) -> CoreResult<BTreeSet<String>> {
    let mut collapsed = BTreeSet::new();

    // Snapshot taken before any mutation; later iterations skip ids that no
    // longer exist, since an earlier collapse may have removed them.
    for s_id in sc.preorder_state_ids() {
        if sc.state(&s_id).is_none() {
            continue;
        }
        if let Some((g_id, r_id)) = collapse_target(sc, &s_id)? {
            collapse(sc, &s_id, &g_id, &r_id)?;
            collapsed.insert(g_id);
        }
    }

    Ok(collapsed)
}

/// Identifies `(G, R)` for state `s_id` if it is a collapse candidate, or `None`
/// if it is not. Returns a structural-integrity error if a dangling region or
/// state reference is found at any tier inspected.
fn collapse_target(sc: &Statechart, s_id: &str) -> CoreResult<Option<(String, String)>> {
    let s = sc
        .state(s_id)
        .ok_or_else(|| CoreError::StructuralIntegrity(format!("state `{s_id}` vanished mid-traversal")))?;
    let r_id = s.parent_region.clone();
    let r = sc
        .region(&r_id)
        .ok_or_else(|| CoreError::StructuralIntegrity(format!("state `{s_id}` has unknown parent region `{r_id}`")))?;

    if r.children.len() != 1 {
        return Ok(None);
    }

    // The top-level region (directly under root) is never collapsed.
    if sc.region_parent_is_root(&r_id) {
        return Ok(None);
    }

    let g_id = sc
        .grandparent_state(&r_id)
        .ok_or_else(|| CoreError::StructuralIntegrity(format!("region `{r_id}` has neither root nor a state as parent")))?;
    let g = sc
        .state(&g_id)
        .ok_or_else(|| CoreError::StructuralIntegrity(format!("region `{r_id}`'s parent `{g_id}` is not a known state")))?;

    if !g.is_composite() {
        return Ok(None);
    }

    let gr_id = g.parent_region.clone();
    if sc.region(&gr_id).is_none() {
        return Err(CoreError::StructuralIntegrity(format!("state `{g_id}` has no parent region")));
    }

    Ok(Some((g_id, r_id)))
}

/// Performs the collapse for wrapper `g_id`/`r_id` around `s_id`.
fn collapse(sc: &mut Statechart, s_id: &str, g_id: &str, r_id: &str) -> CoreResult<()> {
    sc.rewrite_transition_endpoint(g_id, s_id);

    let (g_initial, g_specs, gr_id) = {
        let g = sc
            .state(g_id)
            .ok_or_else(|| CoreError::StructuralIntegrity(format!("wrapper state `{g_id}` vanished during collapse")))?;
        (g.initial, g.specs.clone(), g.parent_region.clone())
    };

    {
        let s = sc
            .state_mut(s_id)
            .ok_or_else(|| CoreError::StructuralIntegrity(format!("state `{s_id}` vanished during collapse")))?;
        s.initial = g_initial;
        s.specs.extend(g_specs);
    }

    sc.replace_child_in_region(&gr_id, g_id, s_id);
    sc.state_mut(s_id)
        .ok_or_else(|| CoreError::StructuralIntegrity(format!("state `{s_id}` vanished during collapse")))?
        .parent_region = gr_id;

    sc.remove_state(g_id);
    sc.remove_region(r_id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoryMode, Specification, StateKind};

    #[test]
    fn collapses_single_region_wrapper() {
        // root -> r0 -> Outer(composite) -> r1 -> Inner -> [t: Inner--go-->Inner]
        let sc = Statechart::builder()
            .region("r0", HistoryMode::None)
            .unwrap()
            .state("Outer", "r0", "Outer", StateKind::Normal, true, vec![Specification::new(["entry".to_string()], None, ["beep".to_string()])])
            .unwrap()
            .region_under("r1", "Outer", HistoryMode::None)
            .unwrap()
            .state("Inner", "r1", "Inner", StateKind::Normal, true, vec![])
            .unwrap()
            .transition("t", "Outer", "Inner", Specification::new(["go".to_string()], None, []))
            .unwrap()
            .finish();

        let mut sc = sc;
        let collapsed = remove_unnecessary_nesting(&mut sc).unwrap();

        assert_eq!(collapsed, BTreeSet::from(["Outer".to_string()]));
        assert!(sc.state("Outer").is_none());
        assert!(sc.region("r1").is_none());
        let inner = sc.state("Inner").unwrap();
        assert!(inner.initial);
        assert_eq!(inner.parent_region, "r0");
        assert_eq!(inner.specs.len(), 1);
        // The transition that used to target/source Outer now references Inner.
        let moved = sc.transitions_from("Inner");
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].target_id, "Inner");
    }

    #[test]
    fn preserves_top_level_region() {
        let sc = Statechart::builder()
            .region("r0", HistoryMode::None)
            .unwrap()
            .state("Solo", "r0", "Solo", StateKind::Normal, true, vec![])
            .unwrap()
            .finish();

        let mut sc = sc;
        let collapsed = remove_unnecessary_nesting(&mut sc).unwrap();
        assert!(collapsed.is_empty());
        assert!(sc.state("Solo").is_some());
    }
}
