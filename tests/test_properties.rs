//! Property-based tests for refined reward process construction.

use std::collections::HashMap;

use proptest::prelude::*;

use refined_mrp::{split_info, MrpError, MRPRefined, RefinedInfo};

/// Strategy: a refined specification over states 0..n. Every state reaches itself
/// plus a random subset of the others; probabilities are normalised per state.
fn spec_strategy() -> impl Strategy<Value = RefinedInfo<u32>> {
    (1usize..8)
        .prop_flat_map(|n| {
            prop::collection::vec(
                prop::collection::vec((any::<bool>(), 0.01f64..1.0, -100.0f64..100.0), n),
                n,
            )
        })
        .prop_map(|rows| {
            let mut info: RefinedInfo<u32> = HashMap::new();
            for (s, row) in rows.iter().enumerate() {
                let kept: Vec<(usize, f64, f64)> = row
                    .iter()
                    .enumerate()
                    .filter(|(d, (keep, _, _))| *keep || *d == s)
                    .map(|(d, (_, w, r))| (d, *w, *r))
                    .collect();
                let total: f64 = kept.iter().map(|(_, w, _)| w).sum();
                let v = kept
                    .into_iter()
                    .map(|(d, w, r)| (d as u32, (w / total, r)))
                    .collect();
                info.insert(s as u32, v);
            }
            info
        })
}

proptest! {
    // 1. Splitting then recombining gives back every (p, r) pair
    #[test]
    fn split_round_trip(info in spec_strategy()) {
        let split = split_info(&info).unwrap();
        prop_assert_eq!(split.transitions.len(), info.len());
        for (s, v) in info.iter() {
            prop_assert_eq!(split.transitions[s].len(), v.len());
            prop_assert_eq!(split.rewards_refined[s].len(), v.len());
            for (d, (p, r)) in v.iter() {
                prop_assert_eq!(split.transitions[s][d], *p);
                prop_assert_eq!(split.rewards_refined[s][d], *r);
            }
        }
    }

    // 2. Expected reward equals the probability weighted sum of transition rewards
    #[test]
    fn expected_reward_recomputed(info in spec_strategy()) {
        let mrp_refined = MRPRefined::new(&info, 0.9).unwrap();
        for (i, s) in mrp_refined.all_states().iter().enumerate() {
            let expected: f64 = info[s].values().map(|(p, r)| p * r).sum();
            let got = mrp_refined.rewards_vec()[i];
            prop_assert!((got - expected).abs() < 1e-9, "state={} got={} expected={}", s, got, expected);
            prop_assert_eq!(mrp_refined.mrp().rewards()[s], got);
        }
    }

    // 3. Refined matrix cell (s, d) holds reward(s, d) or 0
    #[test]
    fn matrix_alignment(info in spec_strategy()) {
        let mrp_refined = MRPRefined::new(&info, 1.0).unwrap();
        let mp = mrp_refined.mp();
        let m = mrp_refined.rewards_refined_matrix();
        prop_assert_eq!(m.dim(), (mp.num_states(), mp.num_states()));
        for s in mp.all_states() {
            for d in mp.all_states() {
                let cell = m[[mp.index_of(s).unwrap(), mp.index_of(d).unwrap()]];
                let want = info[s].get(d).map(|(_, r)| *r).unwrap_or(0.0);
                prop_assert_eq!(cell, want);
            }
        }
    }

    // 4. Normalised input gives stochastic rows
    #[test]
    fn rows_sum_to_one(info in spec_strategy()) {
        let mrp_refined = MRPRefined::new(&info, 1.0).unwrap();
        for row in mrp_refined.trans_matrix().outer_iter() {
            prop_assert!((row.sum() - 1.0).abs() < 1e-9);
        }
        prop_assert!(mrp_refined.mp().check_normalised(1e-9).is_ok());
    }

    // 5. Construction is deterministic
    #[test]
    fn construction_deterministic(info in spec_strategy()) {
        let a = MRPRefined::new(&info, 0.5).unwrap();
        let b = MRPRefined::new(&info.clone(), 0.5).unwrap();
        prop_assert_eq!(a.all_states(), b.all_states());
        prop_assert_eq!(a.trans_matrix(), b.trans_matrix());
        prop_assert_eq!(a.rewards_vec(), b.rewards_vec());
        prop_assert_eq!(a.rewards_refined_matrix(), b.rewards_refined_matrix());
        prop_assert_eq!(a.rewards_refined(), b.rewards_refined());
    }
}

// Any destination that is never a source makes construction fail
#[test]
fn destination_only_state_fails() {
    let mut info: RefinedInfo<u32> = HashMap::new();
    info.insert(0, vec![(0, (0.5, 1.0)), (9, (0.5, 2.0))].into_iter().collect());
    match MRPRefined::new(&info, 1.0) {
        Err(MrpError::UnknownState { state, from }) => {
            assert_eq!(state, "9");
            assert_eq!(from, "0");
        }
        other => panic!("expected UnknownState, got {:?}", other),
    }
}
