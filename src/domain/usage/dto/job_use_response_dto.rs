use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::service::time_window::QueryWindow;
use crate::domain::usage::model::{JobUseOutcome, UsageUnit};

use super::series_dto::SeriesDto;

/// Queued/running levels and distance from target for one job batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobUseResponseDto {
    pub use_unit: UsageUnit,
    pub d_from: DateTime<Utc>,
    pub d_to: DateTime<Utc>,
    /// Target actually used, restricted to the window.
    pub target: SeriesDto,
    /// Full span, not windowed.
    pub queued: SeriesDto,
    /// Restricted to `[d_from, d_to]`.
    pub running: SeriesDto,
    /// Restricted to `[d_from, d_to]`.
    pub distance: SeriesDto,
    pub warnings: Vec<String>,
}

impl JobUseResponseDto {
    pub fn from_outcome(outcome: &JobUseOutcome, unit: UsageUnit, window: &QueryWindow) -> Self {
        Self {
            use_unit: unit,
            d_from: window.start,
            d_to: window.end,
            target: SeriesDto::from(&outcome.target),
            queued: SeriesDto::from(&outcome.queued),
            running: SeriesDto::from(&outcome.running),
            distance: SeriesDto::from(&outcome.distance),
            warnings: outcome.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}
