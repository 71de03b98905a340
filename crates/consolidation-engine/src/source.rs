//! Strongly-typed records supplied by each calendar source.
//!
//! Records are validated on ingestion (see [`SourceRecord::validate`]) before
//! they reach the normalizer. Durations and paddings are unsigned, so negative
//! values are rejected at deserialization time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::priority::ActivityType;

/// An entry from the work calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub name: String,
    pub starts: DateTime<Utc>,
    pub ends: DateTime<Utc>,
}

/// An entry from the exercise calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseItem {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Minutes needed before the activity (changing, travel).
    pub prep_minutes: u32,
    /// Minutes needed after the activity (shower, travel).
    pub wrap_up_minutes: u32,
}

/// An entry from the private/social calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialItem {
    pub name: String,
    pub begins: DateTime<Utc>,
    pub duration_minutes: u32,
}

/// One record from any source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRecord {
    Work(WorkItem),
    Exercise(ExerciseItem),
    Social(SocialItem),
}

impl SourceRecord {
    /// The category whose weight applies to this record.
    pub fn activity(&self) -> ActivityType {
        match self {
            SourceRecord::Work(_) => ActivityType::WorkRelated,
            SourceRecord::Exercise(_) => ActivityType::Exercise,
            SourceRecord::Social(_) => ActivityType::Social,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SourceRecord::Work(w) => &w.name,
            SourceRecord::Exercise(e) => &e.name,
            SourceRecord::Social(s) => &s.name,
        }
    }

    /// Raw busy window as stored by the source, before any padding.
    pub fn raw_interval(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        match self {
            SourceRecord::Work(w) => (w.starts, w.ends),
            SourceRecord::Exercise(e) => (e.start, e.end),
            SourceRecord::Social(s) => (
                s.begins,
                s.begins + Duration::minutes(i64::from(s.duration_minutes)),
            ),
        }
    }

    /// Reject records whose interval runs backwards.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` when the end precedes the start.
    pub fn validate(&self) -> Result<()> {
        let (start, end) = self.raw_interval();
        if start > end {
            return Err(EngineError::InvalidInterval {
                name: self.name().to_string(),
                start,
                end,
            });
        }
        Ok(())
    }
}

impl From<WorkItem> for SourceRecord {
    fn from(w: WorkItem) -> Self {
        SourceRecord::Work(w)
    }
}

impl From<ExerciseItem> for SourceRecord {
    fn from(e: ExerciseItem) -> Self {
        SourceRecord::Exercise(e)
    }
}

impl From<SocialItem> for SourceRecord {
    fn from(s: SocialItem) -> Self {
        SourceRecord::Social(s)
    }
}

/// Validate a batch of records of one kind, stopping at the first bad one.
pub fn validate_all<T>(records: &[T]) -> Result<()>
where
    T: Clone + Into<SourceRecord>,
{
    records
        .iter()
        .try_for_each(|r| Into::<SourceRecord>::into(r.clone()).validate())
}
