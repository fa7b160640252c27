//! Crate-level property tests exercising the public `compare`/`normalise`
//! surface end to end.

use super::*;

fn toggle(prefix: &str) -> Statechart {
    Statechart::builder()
        .region(&format!("{prefix}r0"), HistoryMode::None)
        .unwrap()
        .state(&format!("{prefix}Off"), &format!("{prefix}r0"), "Off", StateKind::Normal, true, vec![])
        .unwrap()
        .state(&format!("{prefix}On"), &format!("{prefix}r0"), "On", StateKind::Normal, false, vec![])
        .unwrap()
        .transition(
            &format!("{prefix}t1"),
            &format!("{prefix}Off"),
            &format!("{prefix}On"),
            Specification::new(["operate".to_string()], None, []),
        )
        .unwrap()
        .transition(
            &format!("{prefix}t2"),
            &format!("{prefix}On"),
            &format!("{prefix}Off"),
            Specification::new(["operate".to_string()], None, []),
        )
        .unwrap()
        .finish()
}

#[test]
fn self_comparison_reaches_full_similarity() {
    let sc = toggle("a_");
    let result = compare(&sc, &sc).unwrap();
    assert!((result.similarities.similarity - 1.0).abs() < f64::EPSILON);
    assert!(result.additions.is_empty());
    assert!(result.deletions.is_empty());
}

#[test]
fn comparison_is_symmetric_in_similarity_score() {
    let a = toggle("a_");
    let b = toggle("b_");
    let ab = compare(&a, &b).unwrap();
    let ba = compare(&b, &a).unwrap();
    assert!((ab.similarities.similarity - ba.similarities.similarity).abs() < 1e-9);
}

#[test]
fn unrelated_statecharts_score_below_full_similarity() {
    let a = toggle("a_");
    let b = Statechart::builder()
        .region("b_r0", HistoryMode::None)
        .unwrap()
        .state("b_Idle", "b_r0", "Idle", StateKind::Normal, true, vec![])
        .unwrap()
        .finish();

    let result = compare(&a, &b).unwrap();
    assert!(result.similarities.similarity < 1.0);
}

#[test]
fn normalise_then_compare_is_idempotent_on_the_canonical_form() {
    let sc = toggle("a_");
    let canonical = normalise(&sc).unwrap().canonical;
    let first = compare(&sc, &canonical).unwrap();
    let second = compare(&canonical, &canonical).unwrap();
    assert!((first.similarities.similarity - second.similarities.similarity).abs() < 1e-9);
}

#[test]
fn greedy_and_exhaustive_agree_on_a_small_fixture() {
    let a = toggle("a_");
    let b = toggle("b_");
    let exhaustive = compare_with_options(&a, &b, CompareOptions { exhaustive_threshold: 10 }).unwrap();
    let greedy = compare_with_options(&a, &b, CompareOptions { exhaustive_threshold: 0 }).unwrap();
    assert!(!exhaustive.is_greedy);
    assert!(greedy.is_greedy);
    assert!((exhaustive.similarities.similarity - greedy.similarities.similarity).abs() < 1e-9);
}
