use super::normalise;
use crate::model::{HistoryMode, Specification, StateKind, Statechart};

fn off_on() -> Statechart {
    Statechart::builder()
        .region("r0", HistoryMode::None)
        .unwrap()
        .state("Off", "r0", "Off", StateKind::Normal, true, vec![])
        .unwrap()
        .state("On", "r0", "On", StateKind::Normal, false, vec![])
        .unwrap()
        .transition("t1", "Off", "On", Specification::new(["operate".to_string()], None, []))
        .unwrap()
        .transition("t2", "On", "Off", Specification::new(["operate".to_string()], None, []))
        .unwrap()
        .finish()
}

#[test]
fn normalising_a_well_formed_statechart_changes_nothing_essential() {
    let sc = off_on();
    let report = normalise(&sc).unwrap();
    assert!(report.unreachable_removed.is_empty());
    assert!(report.collapsed_wrapper_states.is_empty());
    assert!(report.discarded_duplicate_transitions.is_empty());
    assert_eq!(report.canonical.state_ids_sorted(), vec!["Off".to_string(), "On".to_string()]);
}

#[test]
fn is_idempotent_including_across_unit_driven_duplicates() {
    let sc = Statechart::builder()
        .region("r0", HistoryMode::None)
        .unwrap()
        .state("A", "r0", "A", StateKind::Normal, true, vec![])
        .unwrap()
        .state("B", "r0", "B", StateKind::Normal, false, vec![])
        .unwrap()
        .transition("t1", "A", "B", Specification::new(["after 1 ms".to_string()], None, []))
        .unwrap()
        .transition("t2", "A", "B", Specification::new(["after 1000000 ns".to_string()], None, []))
        .unwrap()
        .finish();

    let once = normalise(&sc).unwrap();
    assert_eq!(once.discarded_duplicate_transitions.len(), 1);
    assert_eq!(once.canonical.transitions_from("A").len(), 1);

    let twice = normalise(&once.canonical).unwrap();
    assert!(twice.discarded_duplicate_transitions.is_empty());
    assert_eq!(twice.canonical.transitions_from("A").len(), 1);
    assert_eq!(
        twice.canonical.transitions_from("A")[0].spec.triggers,
        once.canonical.transitions_from("A")[0].spec.triggers
    );
}

#[test]
fn every_surviving_state_is_reachable_from_a_root_initial_state() {
    let sc = Statechart::builder()
        .region("r0", HistoryMode::None)
        .unwrap()
        .state("Off", "r0", "Off", StateKind::Normal, true, vec![])
        .unwrap()
        .state("On", "r0", "On", StateKind::Normal, false, vec![])
        .unwrap()
        .state("Orphan", "r0", "Orphan", StateKind::Normal, false, vec![])
        .unwrap()
        .transition("t1", "Off", "On", Specification::new(["operate".to_string()], None, []))
        .unwrap()
        .finish();

    let report = normalise(&sc).unwrap();
    assert_eq!(report.unreachable_removed, ["Orphan".to_string()].into_iter().collect());
    assert!(report.canonical.state("Orphan").is_none());
}
