//! Property-based tests for conflict resolution using proptest.
//!
//! These tests verify invariants that hold for *any* list of well-formed passes,
//! not just the examples in `resolver_tests.rs`.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use consolidation_engine::{
    clashes, find_clashes, resolve_conflicts, resolve_with, sort_passes, sweep, Decision, Pass,
    ResolutionStrategy,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A pass starting within one day at 5-minute granularity, lasting 0-180 min.
fn arb_pass() -> impl Strategy<Value = Pass> {
    (0i64..288, 0i64..=36, prop_oneof![Just(300u32), Just(400), Just(500), 0u32..1000])
        .prop_map(|(slot, len, importance)| {
            let day = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
            let start = day + Duration::minutes(slot * 5);
            let end = start + Duration::minutes(len * 5);
            Pass::new(1, format!("p{slot}-{importance}"), start, end, importance)
        })
}

fn arb_passes() -> impl Strategy<Value = Vec<Pass>> {
    prop::collection::vec(arb_pass(), 0..40)
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Survivors are ordered by start time
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn survivors_are_sorted_by_start(passes in arb_passes()) {
        let kept = resolve_conflicts(passes);
        for window in kept.windows(2) {
            prop_assert!(window[0].start <= window[1].start);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Survivors are a sub-multiset of the input
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn survivors_come_from_the_input(passes in arb_passes()) {
        let kept = resolve_conflicts(passes.clone());
        prop_assert!(kept.len() <= passes.len());
        let mut remaining = passes;
        for p in &kept {
            let idx = remaining.iter().position(|q| q == p);
            prop_assert!(idx.is_some(), "survivor {:?} not in input", p);
            remaining.swap_remove(idx.unwrap());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: No false negatives among neighbours
//
// Two consecutive survivors may only clash if they were not adjacent in the
// sorted input.
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn consecutive_survivors_that_clash_were_never_adjacent(passes in arb_passes()) {
        let mut sorted = passes;
        sort_passes(&mut sorted);
        let decisions = sweep(&sorted);

        let kept_idx: Vec<usize> = decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_kept())
            .map(|(i, _)| i)
            .collect();

        for pair in kept_idx.windows(2) {
            let (i, j) = (pair[0], pair[1]);
            if clashes(&sorted[i], &sorted[j]) {
                prop_assert!(j > i + 1, "adjacent survivors {} and {} clash", i, j);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Idempotence once no residual clash is left
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn rerun_is_identity_without_residual_clashes(passes in arb_passes()) {
        let once = resolve_conflicts(passes);
        if find_clashes(&once).is_empty() {
            let twice = resolve_conflicts(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: The active-set strategy is clash-free and idempotent
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn active_set_leaves_no_clash(passes in arb_passes()) {
        let once = resolve_with(passes, ResolutionStrategy::ActiveSet);
        prop_assert!(find_clashes(&once).is_empty());

        let twice = resolve_with(once.clone(), ResolutionStrategy::ActiveSet);
        prop_assert_eq!(once, twice);
    }
}

// ---------------------------------------------------------------------------
// Property 6: Every culled pass lost to a clashing pass of at least its weight,
// or was the lighter side of a clash with a heavier successor
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn culled_passes_lost_a_real_clash(passes in arb_passes()) {
        let mut sorted = passes;
        sort_passes(&mut sorted);

        for (i, d) in sweep(&sorted).into_iter().enumerate() {
            if let Decision::Cull { lost_to } = d {
                let (first, second) = if lost_to < i { (lost_to, i) } else { (i, lost_to) };
                prop_assert_eq!(second, first + 1);
                prop_assert!(clashes(&sorted[first], &sorted[second]));
                if lost_to < i {
                    prop_assert!(sorted[lost_to].importance >= sorted[i].importance);
                } else {
                    prop_assert!(sorted[lost_to].importance > sorted[i].importance);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 7: Determinism
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn resolution_is_deterministic(passes in arb_passes()) {
        prop_assert_eq!(resolve_conflicts(passes.clone()), resolve_conflicts(passes));
    }
}
