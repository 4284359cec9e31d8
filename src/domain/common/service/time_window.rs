use chrono::{DateTime, NaiveDateTime, Utc};

use crate::core::util::time_util::TimeUtils;

/// Query window `[start, end]`. `end` is inclusive when slicing series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// An absent end defaults to the wall-clock time at the moment of resolution.
    pub fn resolve(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Self {
        Self::resolve_at(start, end, Utc::now())
    }

    pub fn resolve_at(start: NaiveDateTime, end: Option<NaiveDateTime>, now: DateTime<Utc>) -> Self {
        let start = TimeUtils::naive_to_utc(start);
        let end = end.map(TimeUtils::naive_to_utc).unwrap_or(now);
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}
