//! Calendar records stored as JSON files in a data directory.
//!
//! Each source lives in its own file. Timestamps may carry an offset
//! (RFC 3339) or be plain local times, which are read in the configured
//! timezone. Records are converted into the engine's typed records here, so
//! a malformed file fails the fetch before anything is normalized.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use consolidation_engine::error::{EngineError, Result as EngineResult};
use consolidation_engine::sample;
use consolidation_engine::{ExerciseItem, ScheduleSource, SocialItem, WorkItem};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const WORK_FILE: &str = "workcalendar.json";
pub const EXERCISE_FILE: &str = "exercisecalendar.json";
pub const SOCIAL_FILE: &str = "socialcalendar.json";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Serialize, Deserialize)]
struct RawWorkItem {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Starts")]
    starts: String,
    #[serde(alias = "Ends")]
    ends: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawExerciseItem {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "StartTime")]
    start: String,
    #[serde(alias = "EndTime")]
    end: String,
    #[serde(default, alias = "PrepTimeMinutes")]
    prep_minutes: u32,
    #[serde(default, alias = "WrapUpTimeMinutes")]
    wrap_up_minutes: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawSocialItem {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Begins")]
    begins: String,
    #[serde(alias = "Duration")]
    duration_minutes: u32,
}

/// Parse an RFC 3339 timestamp, or a naive local timestamp read in `tz`.
pub fn parse_timestamp(s: &str, tz: Tz) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .with_context(|| format!("Invalid timestamp '{}'", s))?;

    // Local times inside a DST fold take the earlier instant.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Timestamp '{}' does not exist in {}", s, tz))
}

fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Reads the three calendar files from one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    tz: Tz,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>, tz: Tz) -> Self {
        Self {
            dir: dir.into(),
            tz,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.dir.join(file);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Malformed JSON in {}", path.display()))
    }

    fn write<T: Serialize>(&self, file: &str, records: &[T]) -> Result<()> {
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    fn load_work(&self) -> Result<Vec<WorkItem>> {
        self.read::<RawWorkItem>(WORK_FILE)?
            .into_iter()
            .map(|r| {
                Ok(WorkItem {
                    starts: parse_timestamp(&r.starts, self.tz)?,
                    ends: parse_timestamp(&r.ends, self.tz)?,
                    name: r.name,
                })
            })
            .collect()
    }

    fn load_exercise(&self) -> Result<Vec<ExerciseItem>> {
        self.read::<RawExerciseItem>(EXERCISE_FILE)?
            .into_iter()
            .map(|r| {
                Ok(ExerciseItem {
                    start: parse_timestamp(&r.start, self.tz)?,
                    end: parse_timestamp(&r.end, self.tz)?,
                    prep_minutes: r.prep_minutes,
                    wrap_up_minutes: r.wrap_up_minutes,
                    name: r.name,
                })
            })
            .collect()
    }

    fn load_social(&self) -> Result<Vec<SocialItem>> {
        self.read::<RawSocialItem>(SOCIAL_FILE)?
            .into_iter()
            .map(|r| {
                Ok(SocialItem {
                    begins: parse_timestamp(&r.begins, self.tz)?,
                    duration_minutes: r.duration_minutes,
                    name: r.name,
                })
            })
            .collect()
    }

    /// Write the reference data set into the store's directory.
    pub fn write_sample(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let work: Vec<RawWorkItem> = sample::work_items()
            .into_iter()
            .map(|w| RawWorkItem {
                name: w.name,
                starts: format_timestamp(w.starts),
                ends: format_timestamp(w.ends),
            })
            .collect();
        let exercise: Vec<RawExerciseItem> = sample::exercise_items()
            .into_iter()
            .map(|e| RawExerciseItem {
                name: e.name,
                start: format_timestamp(e.start),
                end: format_timestamp(e.end),
                prep_minutes: e.prep_minutes,
                wrap_up_minutes: e.wrap_up_minutes,
            })
            .collect();
        let social: Vec<RawSocialItem> = sample::social_items()
            .into_iter()
            .map(|s| RawSocialItem {
                name: s.name,
                begins: format_timestamp(s.begins),
                duration_minutes: s.duration_minutes,
            })
            .collect();

        self.write(WORK_FILE, &work)?;
        self.write(EXERCISE_FILE, &exercise)?;
        self.write(SOCIAL_FILE, &social)?;
        Ok(())
    }
}

fn fetch_error(origin: &'static str, err: anyhow::Error) -> EngineError {
    EngineError::Fetch {
        origin,
        message: format!("{:#}", err),
    }
}

impl ScheduleSource for JsonFileStore {
    fn work_items(&self, _user_id: u64) -> EngineResult<Vec<WorkItem>> {
        self.load_work().map_err(|e| fetch_error("work", e))
    }

    fn exercise_items(&self, _user_id: u64) -> EngineResult<Vec<ExerciseItem>> {
        self.load_exercise().map_err(|e| fetch_error("exercise", e))
    }

    fn social_items(&self, _user_id: u64) -> EngineResult<Vec<SocialItem>> {
        self.load_social().map_err(|e| fetch_error("social", e))
    }
}
