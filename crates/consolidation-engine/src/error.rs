//! Error types for consolidation-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::priority::ActivityType;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A source record ends before it starts.
    #[error("Invalid interval for '{name}': {start} is after {end}")]
    InvalidInterval {
        name: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("No priority configured for activity '{0}'")]
    MissingPriority(ActivityType),

    #[error("Unknown activity type: {0}")]
    UnknownActivity(String),

    #[error("Unknown resolution strategy: {0}")]
    UnknownStrategy(String),

    /// The external collaborator could not supply records for a source.
    #[error("Failed to fetch {origin} records: {message}")]
    Fetch {
        origin: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
