//! End-to-end schedule assembly: fetch, validate, normalize, merge, resolve.
//!
//! Records come from an external [`ScheduleSource`] and weights from a
//! [`PriorityProvider`]. The consolidator holds no mutable state, so one
//! instance can serve concurrent callers when both collaborators are `Sync`.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Result;
use crate::merge::{merge_streams, PassStream};
use crate::normalize::{normalize_exercise, normalize_social, normalize_work};
use crate::pass::{Pass, PassView};
use crate::priority::{ActivityType, PriorityProvider, PriorityTable};
use crate::resolve::{resolve_with_report, Resolution, ResolutionStrategy};
use crate::source::{validate_all, ExerciseItem, SocialItem, WorkItem};

/// Supplies the raw records of each calendar source for a user.
///
/// Implementations decide where records live (files, a database, an API).
/// A failed fetch aborts the whole consolidation.
pub trait ScheduleSource {
    fn work_items(&self, user_id: u64) -> Result<Vec<WorkItem>>;
    fn exercise_items(&self, user_id: u64) -> Result<Vec<ExerciseItem>>;
    fn social_items(&self, user_id: u64) -> Result<Vec<SocialItem>>;
}

/// A source backed by vectors held in memory. Every user sees the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub work: Vec<WorkItem>,
    pub exercise: Vec<ExerciseItem>,
    pub social: Vec<SocialItem>,
}

impl ScheduleSource for InMemorySource {
    fn work_items(&self, _user_id: u64) -> Result<Vec<WorkItem>> {
        Ok(self.work.clone())
    }

    fn exercise_items(&self, _user_id: u64) -> Result<Vec<ExerciseItem>> {
        Ok(self.exercise.clone())
    }

    fn social_items(&self, _user_id: u64) -> Result<Vec<SocialItem>> {
        Ok(self.social.clone())
    }
}

/// Builds consolidated schedules from one source and one priority provider.
#[derive(Debug, Clone)]
pub struct Consolidator<S, P = PriorityTable> {
    source: S,
    priorities: P,
    strategy: ResolutionStrategy,
}

impl<S: ScheduleSource> Consolidator<S, PriorityTable> {
    /// Consolidator with the default priority table.
    pub fn with_default_priorities(source: S) -> Self {
        Self::new(source, PriorityTable::default())
    }
}

impl<S: ScheduleSource, P: PriorityProvider> Consolidator<S, P> {
    pub fn new(source: S, priorities: P) -> Self {
        Self {
            source,
            priorities,
            strategy: ResolutionStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: ResolutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> ResolutionStrategy {
        self.strategy
    }

    /// Passes from the work calendar alone.
    ///
    /// The window is accepted for interface stability but every stored record
    /// is returned.
    pub fn get_work_schedule(
        &self,
        user_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Pass>> {
        debug!(user_id, %from, %to, "fetching work schedule");
        self.work_passes(user_id, &self.priorities.priorities(user_id))
    }

    /// Passes from the exercise calendar alone, padded for prep and wrap-up.
    pub fn get_exercise_schedule(
        &self,
        user_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Pass>> {
        debug!(user_id, %from, %to, "fetching exercise schedule");
        self.exercise_passes(user_id, &self.priorities.priorities(user_id))
    }

    /// Passes from the private/social calendar alone.
    pub fn get_private_life_schedule(
        &self,
        user_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Pass>> {
        debug!(user_id, %from, %to, "fetching private life schedule");
        self.social_passes(user_id, &self.priorities.priorities(user_id))
    }

    /// All sources normalized and concatenated, before any conflict resolution.
    pub fn get_merged_schedule(
        &self,
        user_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Pass>> {
        debug!(user_id, %from, %to, "merging schedules; window is not applied");
        let table = self.priorities.priorities(user_id);

        let streams = vec![
            PassStream::new(ActivityType::WorkRelated, self.work_passes(user_id, &table)?),
            PassStream::new(ActivityType::Exercise, self.exercise_passes(user_id, &table)?),
            PassStream::new(ActivityType::Social, self.social_passes(user_id, &table)?),
        ];
        for s in &streams {
            debug!(origin = %s.origin, passes = s.passes.len(), "normalized stream");
        }

        Ok(merge_streams(streams))
    }

    /// Merge and resolve, returning both survivors and culled passes.
    pub fn consolidate_with_report(
        &self,
        user_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Resolution> {
        let merged = self.get_merged_schedule(user_id, from, to)?;
        Ok(resolve_with_report(merged, self.strategy))
    }

    /// The conflict-free, time-ordered schedule projected for display.
    pub fn get_consolidated_schedule(
        &self,
        user_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PassView>> {
        let resolution = self.consolidate_with_report(user_id, from, to)?;
        Ok(resolution.kept.into_iter().map(PassView::from).collect())
    }

    fn work_passes(&self, user_id: u64, table: &PriorityTable) -> Result<Vec<Pass>> {
        let importance = table.weight(ActivityType::WorkRelated)?;
        let records = self.source.work_items(user_id)?;
        validate_all(&records)?;
        Ok(normalize_work(&records, user_id, importance))
    }

    fn exercise_passes(&self, user_id: u64, table: &PriorityTable) -> Result<Vec<Pass>> {
        // Sub-category weights are not consulted: every exercise record gets
        // the generic exercise weight.
        let importance = table.weight(ActivityType::Exercise)?;
        let records = self.source.exercise_items(user_id)?;
        validate_all(&records)?;
        Ok(normalize_exercise(&records, user_id, importance))
    }

    fn social_passes(&self, user_id: u64, table: &PriorityTable) -> Result<Vec<Pass>> {
        let importance = table.weight(ActivityType::Social)?;
        let records = self.source.social_items(user_id)?;
        validate_all(&records)?;
        Ok(normalize_social(&records, user_id, importance))
    }
}
