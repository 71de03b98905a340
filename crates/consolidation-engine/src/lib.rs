//! # consolidation-engine
//!
//! Merge events from independent calendar sources into one conflict-free,
//! time-ordered schedule.
//!
//! Work, exercise and social records are normalized into [`Pass`] values
//! weighted by a [`PriorityTable`], concatenated, sorted, and swept for clashes.
//! The lower-importance pass of each clashing neighbour pair is dropped.
//!
//! ## Modules
//!
//! - [`source`] — Typed source records and ingestion validation
//! - [`priority`] — Activity categories, priority tables, per-user providers
//! - [`normalize`] — Source record → [`Pass`]
//! - [`merge`] — Concatenate per-source pass lists
//! - [`clash`] — The clash predicate and all-pairs clash detection
//! - [`resolve`] — Sort, sweep and filter
//! - [`consolidator`] — End-to-end assembly over a [`ScheduleSource`]
//! - [`sample`] — Reference data set
//! - [`error`] — Error types

pub mod clash;
pub mod consolidator;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod pass;
pub mod priority;
pub mod resolve;
pub mod sample;
pub mod source;

pub use clash::{clashes, find_clashes, Clash};
pub use consolidator::{Consolidator, InMemorySource, ScheduleSource};
pub use error::EngineError;
pub use merge::{merge_passes, merge_streams, PassStream};
pub use normalize::{normalize_exercise, normalize_record, normalize_social, normalize_work};
pub use pass::{Pass, PassView};
pub use priority::{ActivityType, PriorityProvider, PriorityTable, UserPriorities};
pub use resolve::{
    resolve_conflicts, resolve_with, resolve_with_report, sort_passes, sweep, sweep_active_set,
    CulledPass, Decision, Resolution, ResolutionStrategy,
};
pub use source::{ExerciseItem, SocialItem, SourceRecord, WorkItem};
