//! The clash predicate and all-pairs clash detection.
//!
//! Unlike a plain interval-overlap test, two passes that start at the same
//! instant always clash, even when one of them has zero length.

use crate::pass::Pass;
use crate::resolve::sort_passes;

/// A detected clash between two passes, `first` sorting before `second`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clash {
    pub first: Pass,
    pub second: Pass,
    pub overlap_minutes: i64,
}

/// Whether `previous` and `current` clash.
///
/// The caller guarantees `previous.start <= current.start` (the passes come in
/// sort order), so only `previous` running into `current` is checked.
pub fn clashes(previous: &Pass, current: &Pass) -> bool {
    previous.start == current.start || previous.end > current.start
}

/// Find every clashing pair in `passes`, not just neighbours.
///
/// The input is sorted first, so pairs are reported in timeline order. Touching
/// passes (one ends exactly when the next starts) do not clash.
pub fn find_clashes(passes: &[Pass]) -> Vec<Clash> {
    let mut sorted = passes.to_vec();
    sort_passes(&mut sorted);

    let mut found = Vec::new();
    for (i, first) in sorted.iter().enumerate() {
        for second in &sorted[i + 1..] {
            // Later passes start no earlier, so once one starts after `first`
            // ends (and not at the same instant) none of the rest can clash.
            if second.start >= first.end && second.start != first.start {
                break;
            }
            if clashes(first, second) {
                let overlap_start = first.start.max(second.start);
                let overlap_end = first.end.min(second.end);
                let overlap_minutes = (overlap_end - overlap_start).num_minutes().max(0);

                found.push(Clash {
                    first: first.clone(),
                    second: second.clone(),
                    overlap_minutes,
                });
            }
        }
    }

    found
}
