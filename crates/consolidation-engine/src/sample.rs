//! Reference data set: one working week plus clashing evening activities.
//!
//! Expected outcome with the default priorities:
//! - Yoga on 06-27 clashes with "Dejt" and is culled (social beats exercise).
//! - Spinning and Boxing on 06-28 clash at equal importance; Boxing starts
//!   earlier once padded and survives.
//! - Jogging on 07-02 starts together with "Kyrkan" and is culled.

use chrono::{DateTime, NaiveDate, Utc};

use crate::consolidator::InMemorySource;
use crate::source::{ExerciseItem, SocialItem, WorkItem};

fn at(month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2017, month, day)
        .and_then(|d| d.and_hms_opt(hour, min, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn work(name: &str, day: u32, from: u32, to: u32) -> WorkItem {
    WorkItem {
        name: name.to_string(),
        starts: at(6, day, from, 0),
        ends: at(6, day, to, 0),
    }
}

fn exercise(
    name: &str,
    month: u32,
    day: u32,
    hours: (u32, u32, u32, u32),
    pad: (u32, u32),
) -> ExerciseItem {
    ExerciseItem {
        name: name.to_string(),
        start: at(month, day, hours.0, hours.1),
        end: at(month, day, hours.2, hours.3),
        prep_minutes: pad.0,
        wrap_up_minutes: pad.1,
    }
}

pub fn work_items() -> Vec<WorkItem> {
    let mut items: Vec<WorkItem> = (26..=30).map(|day| work("Lunch", day, 12, 13)).collect();
    items.push(work("Afterwork", 30, 17, 19));
    items
}

pub fn exercise_items() -> Vec<ExerciseItem> {
    vec![
        exercise("Yoga", 6, 27, (18, 0, 19, 0), (25, 25)),
        exercise("Spinning", 6, 28, (18, 0, 19, 0), (20, 20)),
        exercise("Boxing", 6, 28, (18, 0, 19, 0), (30, 30)),
        exercise("Spinning", 6, 29, (18, 0, 19, 0), (20, 20)),
        exercise("Jogging", 7, 2, (11, 0, 11, 45), (0, 0)),
    ]
}

pub fn social_items() -> Vec<SocialItem> {
    vec![
        SocialItem {
            name: "Dejt".to_string(),
            begins: at(6, 27, 18, 0),
            duration_minutes: 120,
        },
        SocialItem {
            name: "Kyrkan".to_string(),
            begins: at(7, 2, 11, 0),
            duration_minutes: 90,
        },
    ]
}

/// All three calendars of the reference data set.
pub fn sample_source() -> InMemorySource {
    InMemorySource {
        work: work_items(),
        exercise: exercise_items(),
        social: social_items(),
    }
}
