use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::model::HourlySeries;

/// A single point on the `datetime` axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPointDto {
    pub datetime: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SeriesDto {
    pub points: Vec<SeriesPointDto>,
}

impl From<&HourlySeries> for SeriesDto {
    fn from(series: &HourlySeries) -> Self {
        Self {
            points: series
                .iter()
                .map(|(datetime, value)| SeriesPointDto {
                    datetime: *datetime,
                    value: *value,
                })
                .collect(),
        }
    }
}

impl From<&[SeriesPointDto]> for HourlySeries {
    fn from(points: &[SeriesPointDto]) -> Self {
        HourlySeries::from_points(points.iter().map(|p| (p.datetime, p.value)))
    }
}
