//! Pass 4: remove duplicate transitions.

use std::collections::BTreeSet;

use crate::model::Statechart;

/// Within each source bucket, keeps the first transition of every
/// `(target_id, specification)` group and discards the rest, returning the
/// discarded ids.
pub(crate) fn remove_duplicate_transitions(sc: &mut Statechart) -> BTreeSet<String> {
    let mut discarded = BTreeSet::new();

    for bucket in sc.transitions.values_mut() {
        let mut seen = Vec::new();
        let mut kept = Vec::with_capacity(bucket.len());

        for t in bucket.drain(..) {
            let key = (t.target_id.clone(), t.spec.clone());
            if seen.contains(&key) {
                discarded.insert(t.id.clone());
            } else {
                seen.push(key);
                kept.push(t);
            }
        }

        *bucket = kept;
    }

    discarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoryMode, Specification, StateKind};

    #[test]
    fn keeps_first_of_each_duplicate_group() {
        let sc = Statechart::builder()
            .region("r0", HistoryMode::None)
            .unwrap()
            .state("A", "r0", "A", StateKind::Normal, true, vec![])
            .unwrap()
            .state("B", "r0", "B", StateKind::Normal, false, vec![])
            .unwrap()
            .transition("t1", "A", "B", Specification::new(["go".to_string()], None, []))
            .unwrap()
            .transition("t2", "A", "B", Specification::new(["go".to_string()], None, []))
            .unwrap()
            .transition("t3", "A", "B", Specification::new(["other".to_string()], None, []))
            .unwrap()
            .finish();

        let mut sc = sc;
        let discarded = remove_duplicate_transitions(&mut sc);

        assert_eq!(discarded, BTreeSet::from(["t2".to_string()]));
        let remaining: Vec<_> = sc.transitions_from("A").iter().map(|t| t.id.clone()).collect();
        assert_eq!(remaining, vec!["t1".to_string(), "t3".to_string()]);
    }
}
