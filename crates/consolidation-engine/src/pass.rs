//! The common event representation shared by every calendar source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized, schedulable event with a time interval and an importance weight.
///
/// Passes are value-like: two passes with the same fields are interchangeable,
/// and the optional `id` is only carried through for callers that persist them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pass {
    /// Storage identifier, absent for passes that were never persisted.
    pub id: Option<u64>,
    pub user_id: u64,
    /// Short label, e.g. "Lunch" or "Yoga".
    pub name: String,
    pub details: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// How many minutes ahead the owner wants to be reminded, if at all.
    pub reminder_minutes: Option<u32>,
    /// Higher wins when two passes clash.
    pub importance: u32,
}

impl Pass {
    /// Create a pass with no id, details or reminder.
    pub fn new(
        user_id: u64,
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        importance: u32,
    ) -> Self {
        Self {
            id: None,
            user_id,
            name: name.into(),
            details: None,
            start,
            end,
            reminder_minutes: None,
            importance,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// The output-facing projection of a [`Pass`].
///
/// Only the fields the schedule view renders are carried; importance and the
/// descriptive fields stay behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassView {
    pub id: Option<u64>,
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<&Pass> for PassView {
    fn from(p: &Pass) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            start: p.start,
            end: p.end,
        }
    }
}

impl From<Pass> for PassView {
    fn from(p: Pass) -> Self {
        Self {
            id: p.id,
            name: p.name,
            start: p.start,
            end: p.end,
        }
    }
}
