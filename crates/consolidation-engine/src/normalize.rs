//! Convert source records into [`Pass`] values.
//!
//! One pass per record, in input order. Exercise records are widened by their
//! preparation and wrap-up minutes; social records derive their end from a
//! duration.

use chrono::Duration;

use crate::pass::Pass;
use crate::source::{ExerciseItem, SocialItem, SourceRecord, WorkItem};

fn minutes(m: u32) -> Duration {
    Duration::minutes(i64::from(m))
}

fn work_pass(w: &WorkItem, user_id: u64, importance: u32) -> Pass {
    Pass::new(user_id, w.name.clone(), w.starts, w.ends, importance)
}

fn exercise_pass(e: &ExerciseItem, user_id: u64, importance: u32) -> Pass {
    Pass::new(
        user_id,
        e.name.clone(),
        e.start - minutes(e.prep_minutes),
        e.end + minutes(e.wrap_up_minutes),
        importance,
    )
}

fn social_pass(s: &SocialItem, user_id: u64, importance: u32) -> Pass {
    Pass::new(
        user_id,
        s.name.clone(),
        s.begins,
        s.begins + minutes(s.duration_minutes),
        importance,
    )
}

/// Work entries keep their times verbatim.
pub fn normalize_work(records: &[WorkItem], user_id: u64, importance: u32) -> Vec<Pass> {
    records
        .iter()
        .map(|w| work_pass(w, user_id, importance))
        .collect()
}

/// Exercise entries reserve `prep_minutes` before and `wrap_up_minutes` after.
pub fn normalize_exercise(records: &[ExerciseItem], user_id: u64, importance: u32) -> Vec<Pass> {
    records
        .iter()
        .map(|e| exercise_pass(e, user_id, importance))
        .collect()
}

/// Social entries run from `begins` for `duration_minutes`.
pub fn normalize_social(records: &[SocialItem], user_id: u64, importance: u32) -> Vec<Pass> {
    records
        .iter()
        .map(|s| social_pass(s, user_id, importance))
        .collect()
}

/// Normalize a single record of any kind.
pub fn normalize_record(record: &SourceRecord, user_id: u64, importance: u32) -> Pass {
    match record {
        SourceRecord::Work(w) => work_pass(w, user_id, importance),
        SourceRecord::Exercise(e) => exercise_pass(e, user_id, importance),
        SourceRecord::Social(s) => social_pass(s, user_id, importance),
    }
}
