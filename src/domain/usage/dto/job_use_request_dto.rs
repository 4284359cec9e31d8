use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::util::time_util::TimeUtils;
use crate::domain::common::model::HourlySeries;
use crate::domain::usage::model::{JobRecord, TargetSpec};

use super::series_dto::SeriesPointDto;

/// One job as delivered by the caller. Timestamps are `YYYY-MM-DDTHH:MM:SS`, read as UTC.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobRecordDto {
    pub job_id: Option<String>,
    pub submit: NaiveDateTime,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,

    #[serde(default)]
    pub reqcpus: u32,

    /// Requested memory in MB.
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub mem: f64,

    pub reqgres: Option<String>,
    pub reqtres: Option<String>,
}

impl From<&JobRecordDto> for JobRecord {
    fn from(dto: &JobRecordDto) -> Self {
        Self {
            job_id: dto.job_id.clone(),
            submit: TimeUtils::naive_to_utc(dto.submit),
            start: dto.start.map(TimeUtils::naive_to_utc),
            end: dto.end.map(TimeUtils::naive_to_utc),
            reqcpus: dto.reqcpus,
            mem: dto.mem,
            reqgres: dto.reqgres.clone(),
            reqtres: dto.reqtres.clone(),
        }
    }
}

/// Either a constant allocation level or a pre-built hourly series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TargetDto {
    Level(i64),
    Series(Vec<SeriesPointDto>),
}

impl From<&TargetDto> for TargetSpec {
    fn from(dto: &TargetDto) -> Self {
        match dto {
            TargetDto::Level(level) => TargetSpec::Level(*level),
            TargetDto::Series(points) => TargetSpec::Series(HourlySeries::from(points.as_slice())),
        }
    }
}

/// Job-use request payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_target_source"))]
pub struct JobUseRequestDto {
    #[validate(nested)]
    pub jobs: Vec<JobRecordDto>,

    /// Start of the query window.
    pub d_from: NaiveDateTime,

    /// End of the query window (inclusive). Defaults to now.
    pub d_to: Option<NaiveDateTime>,

    /// Allocation to compare against. Exactly one of `target` / `target_series_name`.
    pub target: Option<TargetDto>,

    /// Name of a previously persisted series to use as the target.
    #[validate(length(min = 1))]
    pub target_series_name: Option<String>,

    /// One of `cpu`, `cpu-eqv`, `gpu`, `gpu-eqv`.
    #[serde(default = "default_use_unit")]
    pub use_unit: String,

    /// Non-empty ⇒ persist the queued level under this name.
    #[serde(default)]
    pub serialize_queued: String,

    /// Non-empty ⇒ persist the running level under this name.
    #[serde(default)]
    pub serialize_running: String,

    /// Non-empty ⇒ persist the distance series under this name.
    #[serde(default)]
    pub serialize_distance: String,
}

fn default_use_unit() -> String {
    "cpu".to_string()
}

fn validate_target_source(req: &JobUseRequestDto) -> Result<(), ValidationError> {
    match (&req.target, &req.target_series_name) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        (Some(_), Some(_)) => Err(ValidationError::new("target_conflict")
            .with_message("set either target or target_series_name, not both".into())),
        (None, None) => Err(ValidationError::new("target_missing")
            .with_message("target or target_series_name is required".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> serde_json::Value {
        json!({
            "jobs": [
                { "submit": "2024-01-01T00:10:00", "start": "2024-01-01T00:40:00", "end": null, "reqcpus": 2, "mem": 4096.0 }
            ],
            "d_from": "2024-01-01T00:00:00",
            "target": 5
        })
    }

    #[test]
    fn minimal_request_parses_with_defaults() {
        let req: JobUseRequestDto = serde_json::from_value(base()).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.use_unit, "cpu");
        assert!(req.d_to.is_none());
        assert_eq!(req.target, Some(TargetDto::Level(5)));
        assert!(req.serialize_queued.is_empty());

        let job = JobRecord::from(&req.jobs[0]);
        assert!(job.end.is_none());
        assert_eq!(job.submit.to_rfc3339(), "2024-01-01T00:10:00+00:00");
    }

    #[test]
    fn target_can_be_a_series() {
        let mut v = base();
        v["target"] = json!([
            { "datetime": "2024-01-01T00:00:00Z", "value": 3.0 },
            { "datetime": "2024-01-01T01:00:00Z", "value": 4.0 }
        ]);
        let req: JobUseRequestDto = serde_json::from_value(v).unwrap();
        match TargetSpec::from(req.target.as_ref().unwrap()) {
            TargetSpec::Series(s) => assert_eq!(s.values().collect::<Vec<_>>(), vec![3.0, 4.0]),
            other => panic!("expected series target, got {:?}", other),
        }
    }

    #[test]
    fn target_sources_are_exclusive() {
        let mut both = base();
        both["target_series_name"] = json!("alloc/acct-a");
        let req: JobUseRequestDto = serde_json::from_value(both).unwrap();
        assert!(req.validate().is_err());

        let mut neither = base();
        neither.as_object_mut().unwrap().remove("target");
        let req: JobUseRequestDto = serde_json::from_value(neither).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn negative_memory_is_rejected() {
        let mut v = base();
        v["jobs"][0]["mem"] = json!(-1.0);
        let req: JobUseRequestDto = serde_json::from_value(v).unwrap();
        assert!(req.validate().is_err());
    }
}
