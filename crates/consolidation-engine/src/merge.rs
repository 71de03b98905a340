//! Combine normalized passes from several sources into one collection.
//!
//! Relative order inside each source is kept; no ordering is imposed across
//! sources. The resolver's sort establishes the timeline.

use crate::pass::Pass;
use crate::priority::ActivityType;

/// The normalized passes of a single calendar source.
#[derive(Debug, Clone)]
pub struct PassStream {
    /// Category the stream was normalized under (e.g. work, exercise).
    pub origin: ActivityType,
    pub passes: Vec<Pass>,
}

impl PassStream {
    pub fn new(origin: ActivityType, passes: Vec<Pass>) -> Self {
        Self { origin, passes }
    }
}

/// Concatenate pass lists in the order given.
pub fn merge_passes<I>(sources: I) -> Vec<Pass>
where
    I: IntoIterator<Item = Vec<Pass>>,
{
    sources.into_iter().flatten().collect()
}

/// Concatenate named streams in the order given.
pub fn merge_streams(streams: Vec<PassStream>) -> Vec<Pass> {
    merge_passes(streams.into_iter().map(|s| s.passes))
}
