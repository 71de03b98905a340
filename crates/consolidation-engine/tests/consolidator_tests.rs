//! End-to-end tests for the consolidator over the reference data set.

use chrono::{DateTime, TimeZone, Utc};
use consolidation_engine::error::Result;
use consolidation_engine::sample::sample_source;
use consolidation_engine::{
    ActivityType, Consolidator, EngineError, ExerciseItem, InMemorySource, PassView,
    PriorityTable, ResolutionStrategy, ScheduleSource, SocialItem, UserPriorities, WorkItem,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn week() -> (DateTime<Utc>, DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2017, 6, 26, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2017, 7, 3, 0, 0, 0).unwrap(),
    )
}

fn at(month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, month, day, hour, min, 0).unwrap()
}

fn labels(views: &[PassView]) -> Vec<String> {
    views
        .iter()
        .map(|v| format!("{} {}", v.start.format("%m-%d %H:%M"), v.name))
        .collect()
}

/// A source whose exercise calendar cannot be read.
struct BrokenExercise;

impl ScheduleSource for BrokenExercise {
    fn work_items(&self, _user_id: u64) -> Result<Vec<WorkItem>> {
        Ok(vec![])
    }

    fn exercise_items(&self, _user_id: u64) -> Result<Vec<ExerciseItem>> {
        Err(EngineError::Fetch {
            origin: "exercise",
            message: "calendar offline".to_string(),
        })
    }

    fn social_items(&self, _user_id: u64) -> Result<Vec<SocialItem>> {
        Ok(vec![])
    }
}

// ── Reference scenario ──────────────────────────────────────────────────────

#[test]
fn reference_week_is_consolidated() {
    let consolidator = Consolidator::with_default_priorities(sample_source());
    let (from, to) = week();

    let schedule = consolidator.get_consolidated_schedule(1, from, to).unwrap();

    assert_eq!(
        labels(&schedule),
        vec![
            "06-26 12:00 Lunch",
            "06-27 12:00 Lunch",
            "06-27 18:00 Dejt",
            "06-28 12:00 Lunch",
            "06-28 17:30 Boxing",
            "06-29 12:00 Lunch",
            "06-29 17:40 Spinning",
            "06-30 12:00 Lunch",
            "06-30 17:00 Afterwork",
            "07-02 11:00 Kyrkan",
        ]
    );
}

#[test]
fn reference_week_culls_the_expected_passes() {
    let consolidator = Consolidator::with_default_priorities(sample_source());
    let (from, to) = week();

    let report = consolidator.consolidate_with_report(1, from, to).unwrap();

    let culled: Vec<(&str, &str)> = report
        .culled
        .iter()
        .map(|c| (c.pass.name.as_str(), c.lost_to.name.as_str()))
        .collect();
    assert_eq!(
        culled,
        vec![("Yoga", "Dejt"), ("Spinning", "Boxing"), ("Jogging", "Kyrkan")]
    );
}

#[test]
fn padded_boxing_keeps_its_widened_window() {
    let consolidator = Consolidator::with_default_priorities(sample_source());
    let (from, to) = week();

    let schedule = consolidator.get_consolidated_schedule(1, from, to).unwrap();
    let boxing = schedule.iter().find(|v| v.name == "Boxing").unwrap();

    assert_eq!(boxing.start, at(6, 28, 17, 30));
    assert_eq!(boxing.end, at(6, 28, 19, 30));
    assert_eq!(boxing.id, None);
}

#[test]
fn window_is_accepted_but_not_applied() {
    let consolidator = Consolidator::with_default_priorities(sample_source());
    let narrow_from = at(6, 26, 0, 0);
    let narrow_to = at(6, 26, 1, 0);

    let schedule = consolidator
        .get_consolidated_schedule(1, narrow_from, narrow_to)
        .unwrap();

    assert_eq!(schedule.len(), 10);
}

// ── Single-source entry points ──────────────────────────────────────────────

#[test]
fn per_source_schedules_are_unresolved() {
    let consolidator = Consolidator::with_default_priorities(sample_source());
    let (from, to) = week();

    let work = consolidator.get_work_schedule(4, from, to).unwrap();
    let exercise = consolidator.get_exercise_schedule(4, from, to).unwrap();
    let social = consolidator.get_private_life_schedule(4, from, to).unwrap();

    assert_eq!(work.len(), 6);
    assert_eq!(exercise.len(), 5, "Spinning and Boxing both present");
    assert_eq!(social.len(), 2);

    assert!(work.iter().all(|p| p.importance == 500 && p.user_id == 4));
    assert!(exercise.iter().all(|p| p.importance == 300));
    assert!(social.iter().all(|p| p.importance == 400));

    assert_eq!(exercise[0].name, "Yoga");
    assert_eq!(exercise[0].start, at(6, 27, 17, 35));
    assert_eq!(exercise[0].end, at(6, 27, 19, 25));
}

// ── Priorities ──────────────────────────────────────────────────────────────

#[test]
fn user_override_flips_the_evening_clash() {
    let priorities = UserPriorities::new(PriorityTable::default()).with_override(
        9,
        PriorityTable::empty().with(ActivityType::Exercise, 450),
    );
    let consolidator = Consolidator::new(sample_source(), priorities);
    let (from, to) = week();

    let athlete = consolidator.get_consolidated_schedule(9, from, to).unwrap();
    let everyone_else = consolidator.get_consolidated_schedule(1, from, to).unwrap();

    assert!(athlete.iter().any(|v| v.name == "Yoga"));
    assert!(!athlete.iter().any(|v| v.name == "Dejt"));
    assert!(everyone_else.iter().any(|v| v.name == "Dejt"));
}

#[test]
fn missing_priority_aborts_consolidation() {
    let table = PriorityTable::empty()
        .with(ActivityType::WorkRelated, 500)
        .with(ActivityType::Exercise, 300);
    let consolidator = Consolidator::new(sample_source(), table);
    let (from, to) = week();

    let err = consolidator
        .get_consolidated_schedule(1, from, to)
        .unwrap_err();

    assert!(matches!(err, EngineError::MissingPriority(ActivityType::Social)));
}

// ── Failures at the boundary ────────────────────────────────────────────────

#[test]
fn fetch_failure_propagates() {
    let consolidator = Consolidator::with_default_priorities(BrokenExercise);
    let (from, to) = week();

    let err = consolidator
        .get_consolidated_schedule(1, from, to)
        .unwrap_err();

    assert!(err.to_string().contains("calendar offline"));
}

#[test]
fn backwards_record_is_rejected_before_normalization() {
    let source = InMemorySource {
        work: vec![WorkItem {
            name: "Standup".to_string(),
            starts: at(6, 26, 10, 0),
            ends: at(6, 26, 9, 45),
        }],
        ..InMemorySource::default()
    };
    let consolidator = Consolidator::with_default_priorities(source);
    let (from, to) = week();

    let err = consolidator.get_work_schedule(1, from, to).unwrap_err();

    assert!(matches!(err, EngineError::InvalidInterval { ref name, .. } if name == "Standup"));
}

// ── Strategies ──────────────────────────────────────────────────────────────

#[test]
fn active_set_matches_adjacent_sweep_on_reference_week() {
    let (from, to) = week();
    let adjacent = Consolidator::with_default_priorities(sample_source())
        .get_consolidated_schedule(1, from, to)
        .unwrap();
    let active = Consolidator::with_default_priorities(sample_source())
        .with_strategy(ResolutionStrategy::ActiveSet)
        .get_consolidated_schedule(1, from, to)
        .unwrap();

    assert_eq!(adjacent, active);
}

#[test]
fn consolidated_view_serializes_only_projected_fields() {
    let consolidator = Consolidator::with_default_priorities(sample_source());
    let (from, to) = week();

    let schedule = consolidator.get_consolidated_schedule(1, from, to).unwrap();
    let json = serde_json::to_value(&schedule[0]).unwrap();

    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "name", "start", "end"]);
    assert_eq!(json["start"], "2017-06-26T12:00:00Z");
}
