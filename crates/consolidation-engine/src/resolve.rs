//! Remove lower-priority passes that clash with their neighbours.
//!
//! Resolution runs in three steps:
//!
//! 1. **Sort** by start time ascending, ties broken by importance descending.
//! 2. **Sweep** the sorted slice and record a [`Decision`] per pass. The input
//!    is never mutated; decisions live in a parallel vector.
//! 3. **Filter** the passes whose decision is [`Decision::Keep`].
//!
//! The default [`ResolutionStrategy::AdjacentSweep`] only compares neighbours
//! in sort order. A chain of three or more overlapping passes can therefore
//! leave two survivors that still clash when they were never adjacent.
//! [`ResolutionStrategy::ActiveSet`] checks every kept pass instead and always
//! produces a clash-free result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clash::clashes;
use crate::error::{EngineError, Result};
use crate::pass::Pass;

/// Outcome of the sweep for one pass, indexed like the sorted slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    /// Removed after losing to the pass at index `lost_to`.
    Cull { lost_to: usize },
}

impl Decision {
    pub fn is_kept(self) -> bool {
        self == Decision::Keep
    }
}

/// How clashes are detected during the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionStrategy {
    /// Compare each pass with its predecessor only.
    #[default]
    AdjacentSweep,
    /// Compare each pass with every pass kept so far.
    ActiveSet,
}

impl ResolutionStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionStrategy::AdjacentSweep => "adjacent-sweep",
            ResolutionStrategy::ActiveSet => "active-set",
        }
    }

    /// Run this strategy's sweep over an already sorted slice.
    pub fn sweep(self, sorted: &[Pass]) -> Vec<Decision> {
        match self {
            ResolutionStrategy::AdjacentSweep => sweep(sorted),
            ResolutionStrategy::ActiveSet => sweep_active_set(sorted),
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "adjacent-sweep" => Ok(ResolutionStrategy::AdjacentSweep),
            "active-set" => Ok(ResolutionStrategy::ActiveSet),
            other => Err(EngineError::UnknownStrategy(other.to_string())),
        }
    }
}

/// A pass removed during resolution, with the pass it lost to.
#[derive(Debug, Clone, PartialEq)]
pub struct CulledPass {
    pub pass: Pass,
    pub lost_to: Pass,
}

/// Full result of a resolution run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    /// Survivors in sort order.
    pub kept: Vec<Pass>,
    /// Removed passes in sort order.
    pub culled: Vec<CulledPass>,
}

/// Sort by start ascending, then importance descending.
///
/// The sort is stable, so passes equal on both keys keep their merge order.
pub fn sort_passes(passes: &mut [Pass]) {
    passes.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.importance.cmp(&a.importance))
    });
}

/// Single adjacent-pair sweep over a sorted slice.
///
/// On a clash the predecessor wins when its importance is greater or equal,
/// otherwise the current pass wins. A predecessor that was already culled
/// loses every later comparison: it stays culled and never removes `current`.
pub fn sweep(sorted: &[Pass]) -> Vec<Decision> {
    let mut decisions = vec![Decision::Keep; sorted.len()];

    for i in 1..sorted.len() {
        let previous = &sorted[i - 1];
        let current = &sorted[i];
        if !clashes(previous, current) || !decisions[i - 1].is_kept() {
            continue;
        }
        if previous.importance >= current.importance {
            decisions[i] = Decision::Cull { lost_to: i - 1 };
        } else {
            decisions[i - 1] = Decision::Cull { lost_to: i };
        }
    }

    decisions
}

/// Sweep that compares each pass against every pass kept so far.
///
/// A pass is culled when any clashing kept pass is at least as important;
/// otherwise it displaces all the kept passes it clashes with.
pub fn sweep_active_set(sorted: &[Pass]) -> Vec<Decision> {
    let mut decisions = vec![Decision::Keep; sorted.len()];
    let mut active: Vec<usize> = Vec::new();

    for (i, current) in sorted.iter().enumerate() {
        let rivals: Vec<usize> = active
            .iter()
            .copied()
            .filter(|&k| clashes(&sorted[k], current))
            .collect();

        if let Some(&winner) = rivals
            .iter()
            .find(|&&k| sorted[k].importance >= current.importance)
        {
            decisions[i] = Decision::Cull { lost_to: winner };
            continue;
        }

        for &k in &rivals {
            decisions[k] = Decision::Cull { lost_to: i };
        }
        active.retain(|k| !rivals.contains(k));
        active.push(i);
    }

    decisions
}

/// Resolve with the default adjacent sweep and return the survivors.
pub fn resolve_conflicts(passes: Vec<Pass>) -> Vec<Pass> {
    resolve_with_report(passes, ResolutionStrategy::default()).kept
}

/// Resolve with an explicit strategy and return the survivors.
pub fn resolve_with(passes: Vec<Pass>, strategy: ResolutionStrategy) -> Vec<Pass> {
    resolve_with_report(passes, strategy).kept
}

/// Sort, sweep and filter, keeping track of what was removed and why.
pub fn resolve_with_report(mut passes: Vec<Pass>, strategy: ResolutionStrategy) -> Resolution {
    if passes.len() <= 1 {
        return Resolution {
            kept: passes,
            culled: Vec::new(),
        };
    }

    sort_passes(&mut passes);
    let decisions = strategy.sweep(&passes);

    let winners: Vec<Option<Pass>> = decisions
        .iter()
        .map(|d| match d {
            Decision::Keep => None,
            Decision::Cull { lost_to } => Some(passes[*lost_to].clone()),
        })
        .collect();

    let mut resolution = Resolution::default();
    for (pass, winner) in passes.into_iter().zip(winners) {
        match winner {
            None => resolution.kept.push(pass),
            Some(lost_to) => {
                info!(
                    culled = %pass.name,
                    start = %pass.start,
                    importance = pass.importance,
                    winner = %lost_to.name,
                    "pass culled by clash"
                );
                resolution.culled.push(CulledPass { pass, lost_to });
            }
        }
    }

    debug!(
        strategy = %strategy,
        kept = resolution.kept.len(),
        culled = resolution.culled.len(),
        "resolution finished"
    );

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap()
    }

    fn pass(name: &str, start: (u32, u32), end: (u32, u32), importance: u32) -> Pass {
        Pass::new(1, name, at(start.0, start.1), at(end.0, end.1), importance)
    }

    #[test]
    fn sort_breaks_start_ties_by_importance_descending() {
        let mut passes = vec![
            pass("low", (9, 0), (10, 0), 100),
            pass("early", (8, 0), (8, 30), 1),
            pass("high", (9, 0), (9, 30), 500),
        ];
        sort_passes(&mut passes);
        let names: Vec<&str> = passes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["early", "high", "low"]);
    }

    #[test]
    fn winner_of_one_clash_carries_into_the_next() {
        let sorted = vec![
            pass("a", (9, 0), (10, 0), 100),
            pass("b", (9, 30), (11, 0), 300),
            pass("c", (10, 30), (12, 0), 200),
        ];
        let decisions = sweep(&sorted);
        assert_eq!(
            decisions,
            vec![
                Decision::Cull { lost_to: 1 },
                Decision::Keep,
                Decision::Cull { lost_to: 1 },
            ]
        );
    }

    #[test]
    fn removed_previous_lets_current_survive() {
        let sorted = vec![
            pass("a", (9, 0), (12, 0), 500),
            pass("b", (10, 0), (11, 30), 300),
            pass("c", (11, 0), (13, 0), 100),
        ];
        let decisions = sweep(&sorted);
        assert_eq!(decisions[1], Decision::Cull { lost_to: 0 });
        assert_eq!(decisions[2], Decision::Keep);
    }

    #[test]
    fn strategy_parses_from_kebab_case() {
        assert_eq!(
            "active-set".parse::<ResolutionStrategy>().unwrap(),
            ResolutionStrategy::ActiveSet
        );
        assert_eq!(
            ResolutionStrategy::AdjacentSweep.to_string(),
            "adjacent-sweep"
        );
        assert!("greedy".parse::<ResolutionStrategy>().is_err());
    }
}
