//! Pass 3: convert entry/exit actions into transition effects.

use crate::model::Statechart;

/// For each state, folds `"entry"`-triggered spec effects into every transition
/// targeting it and `"exit"`-triggered spec effects into every transition
/// sourced from it, then drops those specs from the state.
pub(crate) fn convert_entry_exit_actions(sc: &mut Statechart) {
    for id in sc.state_ids_sorted() {
        let Some(state) = sc.state(&id) else { continue };

        let mut entry_effects = Vec::new();
        let mut exit_effects = Vec::new();
        let mut keep = Vec::new();

        for spec in &state.specs {
            let is_entry = spec.has_trigger("entry");
            let is_exit = spec.has_trigger("exit");
            if is_entry {
                entry_effects.extend(spec.effects.iter().cloned());
            }
            if is_exit {
                exit_effects.extend(spec.effects.iter().cloned());
            }
            if !is_entry && !is_exit {
                keep.push(spec.clone());
            }
        }

        if !entry_effects.is_empty() {
            for t in sc.transitions_targeting_mut(&id) {
                t.spec.union_effects(entry_effects.iter().cloned());
            }
        }
        if !exit_effects.is_empty() {
            for t in sc.transitions_from_mut(&id) {
                t.spec.union_effects(exit_effects.iter().cloned());
            }
        }

        sc.state_mut(&id).unwrap().specs = keep;
    }
}
