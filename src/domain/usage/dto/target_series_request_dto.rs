use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::util::time_util::TimeUtils;
use crate::domain::usage::model::TargetStep;

/// Allocation steps for building a target series.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TargetSeriesRequestDto {
    #[validate(length(min = 1))]
    pub steps: Vec<TargetStepDto>,

    /// Optional name to persist the built series under.
    #[serde(default)]
    pub serialize_as: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetStepDto {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub level: f64,
}

impl From<&TargetStepDto> for TargetStep {
    fn from(dto: &TargetStepDto) -> Self {
        Self {
            start: TimeUtils::naive_to_utc(dto.start),
            end: TimeUtils::naive_to_utc(dto.end),
            level: dto.level,
        }
    }
}
