//! Activity categories and the importance weights assigned to them.
//!
//! A [`PriorityTable`] is an explicit configuration object: it is built once
//! (usually from [`PriorityTable::default`] plus overrides) and handed to the
//! normalizer and the consolidator. Per-user customization goes through the
//! [`PriorityProvider`] trait.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Category of an activity, used as the key of a [`PriorityTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    WorkRelated,
    Social,
    Exercise,
    Boxing,
    Spinning,
    Yoga,
}

impl ActivityType {
    pub const ALL: [ActivityType; 6] = [
        ActivityType::WorkRelated,
        ActivityType::Social,
        ActivityType::Exercise,
        ActivityType::Boxing,
        ActivityType::Spinning,
        ActivityType::Yoga,
    ];

    /// The top-level category a sub-category falls back to.
    pub fn parent(self) -> Option<ActivityType> {
        match self {
            ActivityType::Boxing | ActivityType::Spinning | ActivityType::Yoga => {
                Some(ActivityType::Exercise)
            }
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::WorkRelated => "work_related",
            ActivityType::Social => "social",
            ActivityType::Exercise => "exercise",
            ActivityType::Boxing => "boxing",
            ActivityType::Spinning => "spinning",
            ActivityType::Yoga => "yoga",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        ActivityType::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| EngineError::UnknownActivity(s.to_string()))
    }
}

/// Maps activity categories to integer importance weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    weights: BTreeMap<ActivityType, u32>,
}

impl Default for PriorityTable {
    /// work 500, social 400, exercise 300.
    ///
    /// The exercise sub-categories carry their own weights, but exercise records
    /// are normalized with the generic exercise weight.
    fn default() -> Self {
        Self::empty()
            .with(ActivityType::WorkRelated, 500)
            .with(ActivityType::Social, 400)
            .with(ActivityType::Exercise, 300)
            .with(ActivityType::Boxing, 320)
            .with(ActivityType::Spinning, 310)
            .with(ActivityType::Yoga, 305)
    }
}

impl PriorityTable {
    /// A table with no weights at all.
    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, activity: ActivityType, weight: u32) -> Self {
        self.set(activity, weight);
        self
    }

    pub fn set(&mut self, activity: ActivityType, weight: u32) {
        self.weights.insert(activity, weight);
    }

    /// Look up the weight of an activity.
    ///
    /// Sub-categories without an explicit entry fall back to their parent.
    ///
    /// # Errors
    /// Returns `EngineError::MissingPriority` when neither the activity nor its
    /// parent has a weight.
    pub fn weight(&self, activity: ActivityType) -> Result<u32> {
        self.weights
            .get(&activity)
            .or_else(|| activity.parent().and_then(|p| self.weights.get(&p)))
            .copied()
            .ok_or(EngineError::MissingPriority(activity))
    }

    /// Apply every entry of `overrides` on top of this table.
    pub fn merged_with(&self, overrides: &PriorityTable) -> PriorityTable {
        let mut merged = self.clone();
        merged.weights.extend(overrides.iter());
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActivityType, u32)> + '_ {
        self.weights.iter().map(|(a, w)| (*a, *w))
    }
}

/// Supplies the priority table of a given user.
pub trait PriorityProvider {
    fn priorities(&self, user_id: u64) -> PriorityTable;
}

/// A single table shared by every user.
impl PriorityProvider for PriorityTable {
    fn priorities(&self, _user_id: u64) -> PriorityTable {
        self.clone()
    }
}

/// A default table with optional per-user overrides layered on top.
#[derive(Debug, Clone, Default)]
pub struct UserPriorities {
    pub default: PriorityTable,
    pub overrides: HashMap<u64, PriorityTable>,
}

impl UserPriorities {
    pub fn new(default: PriorityTable) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, user_id: u64, table: PriorityTable) -> Self {
        self.overrides.insert(user_id, table);
        self
    }
}

impl PriorityProvider for UserPriorities {
    fn priorities(&self, user_id: u64) -> PriorityTable {
        match self.overrides.get(&user_id) {
            Some(o) => self.default.merged_with(o),
            None => self.default.clone(),
        }
    }
}
