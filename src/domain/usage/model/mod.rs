//! Job-use domain types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::model::HourlySeries;

/// One scheduler job as seen by the usage pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    /// Optional scheduler id, only used in diagnostics.
    pub job_id: Option<String>,
    pub submit: DateTime<Utc>,
    /// Absent until the job starts.
    pub start: Option<DateTime<Utc>>,
    /// Absent until the job ends.
    pub end: Option<DateTime<Utc>>,
    pub reqcpus: u32,
    /// Requested memory in MB.
    pub mem: f64,
    /// Generic resource request, e.g. `gpu:4`.
    pub reqgres: Option<String>,
    /// Trackable resource request, e.g. `cpu=8,mem=32G,gres/gpu=4`.
    pub reqtres: Option<String>,
}

impl JobRecord {
    pub fn label(&self) -> String {
        match &self.job_id {
            Some(id) => id.clone(),
            None => format!("submitted@{}", self.submit.to_rfc3339()),
        }
    }
}

/// Resource mode used to turn a job into a scalar usage value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UsageUnit {
    /// Requested CPU count.
    #[default]
    Cpu,
    /// max(cpus, mem / 4096 MB).
    CpuEqv,
    /// GPU count parsed from the resource request.
    Gpu,
    /// Recognized but not implemented.
    GpuEqv,
}

impl UsageUnit {
    pub const ALL: [UsageUnit; 4] = [Self::Cpu, Self::CpuEqv, Self::Gpu, Self::GpuEqv];

    /// Whether the pipeline can compute usage in this unit.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::GpuEqv)
    }

    pub fn from_code<S: AsRef<str>>(code: S) -> Option<Self> {
        match code.as_ref().trim().to_lowercase().as_str() {
            "cpu" => Some(Self::Cpu),
            "cpu-eqv" => Some(Self::CpuEqv),
            "gpu" => Some(Self::Gpu),
            "gpu-eqv" => Some(Self::GpuEqv),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::CpuEqv => "cpu-eqv",
            Self::Gpu => "gpu",
            Self::GpuEqv => "gpu-eqv",
        }
    }
}

impl fmt::Display for UsageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A job paired with its usage value. `None` means undefined and counts as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedJob {
    pub submit: DateTime<Utc>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub usage: Option<f64>,
}

impl NormalizedJob {
    #[inline]
    pub fn usage_or_zero(&self) -> f64 {
        self.usage.unwrap_or(0.0)
    }
}

/// Advisory diagnostics. They never stop a run.
#[derive(Debug, Clone, PartialEq)]
pub enum UsageWarning {
    /// GPU mode: some jobs may not carry usable GPU request fields.
    GpuFieldsUnreliable,
    /// GPU mode: no extraction strategy produced a count for this job.
    GpuCountMissing { job: String },
    /// A requested series write failed; the computed series are unaffected.
    PersistFailed { series: String, name: String, reason: String },
}

impl fmt::Display for UsageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpuFieldsUnreliable => {
                f.write_str("some jobs may not have proper gpu reqtres/reqgres fields")
            }
            Self::GpuCountMissing { job } => {
                write!(f, "job {} has no parsable gpu request; usage counted as 0", job)
            }
            Self::PersistFailed { series, name, reason } => {
                write!(f, "failed to persist {} series as '{}': {}", series, name, reason)
            }
        }
    }
}

/// Where the target allocation comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSpec {
    /// Constant allocation held over `[d_from, d_to)`.
    Level(i64),
    /// Pre-built hourly series in the same unit.
    Series(HourlySeries),
}

/// One `(start, end, level)` allocation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetStep {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub level: f64,
}

/// Result of one job-use run.
#[derive(Debug, Clone, PartialEq)]
pub struct JobUseOutcome {
    /// Un-cumulated target restricted to the window.
    pub target: HourlySeries,
    /// Full-span queued level.
    pub queued: HourlySeries,
    /// Full-span running level. Persisted as-is.
    pub running_full: HourlySeries,
    /// Running level restricted to the window.
    pub running: HourlySeries,
    /// Windowed running cumulative minus target cumulative.
    pub distance: HourlySeries,
    pub warnings: Vec<UsageWarning>,
}
