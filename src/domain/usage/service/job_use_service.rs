use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use validator::Validate;

use crate::core::config::{app_config, AppConfig, DEFAULT_MAX_SPAN_HOURS};
use crate::core::persistence::series::series_api_repository_trait::SeriesApiRepository;
use crate::core::persistence::series::series_repository::SeriesRepository;
use crate::core::util::time_util::TimeUtils;
use crate::domain::common::model::HourlySeries;
use crate::domain::common::service::time_window::QueryWindow;
use crate::domain::usage::dto::job_use_request_dto::JobUseRequestDto;
use crate::domain::usage::dto::job_use_response_dto::JobUseResponseDto;
use crate::domain::usage::dto::series_dto::SeriesDto;
use crate::domain::usage::dto::target_series_request_dto::TargetSeriesRequestDto;
use crate::domain::usage::model::{JobRecord, JobUseOutcome, TargetSpec, TargetStep, UsageUnit, UsageWarning};
use crate::errors::UsageError;

use super::gpu_extractor::GpuExtractor;
use super::job_use::{run_job_use, JobUseParams};
use super::target_series::{SteppedTargetBuilder, TargetSeriesBuilder};

/// Per-request knobs taken from the process config.
#[derive(Debug, Clone)]
pub struct JobUseSettings {
    pub gpu: GpuExtractor,
    pub max_span_hours: i64,
}

impl JobUseSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            gpu: GpuExtractor::from_flags(cfg.gpu_reqgres_enabled),
            max_span_hours: cfg.max_span_hours,
        }
    }
}

impl Default for JobUseSettings {
    fn default() -> Self {
        Self {
            gpu: GpuExtractor::default(),
            max_span_hours: DEFAULT_MAX_SPAN_HOURS,
        }
    }
}

pub async fn compute_job_use(req: JobUseRequestDto) -> Result<JobUseResponseDto> {
    let repo = SeriesRepository::new();
    let settings = JobUseSettings::from_config(app_config());
    compute_job_use_with_repo(&repo, &settings, req, Utc::now()).await
}

pub async fn build_target_series(req: TargetSeriesRequestDto) -> Result<SeriesDto> {
    let repo = SeriesRepository::new();
    build_target_series_with_repo(&repo, req, app_config().max_span_hours).await
}

pub async fn get_series(name: String) -> Result<SeriesDto> {
    let repo = SeriesRepository::new();
    get_series_with_repo(&repo, &name).await
}

/// Rejects spans whose hourly series would exceed `max` points.
fn ensure_span(what: &str, first: DateTime<Utc>, last: DateTime<Utc>, max: i64) -> Result<(), UsageError> {
    let hours = TimeUtils::span_hours(first, last);
    if hours > max {
        warn!("Rejecting {}: {} hours over the {} hour limit", what, hours, max);
        return Err(UsageError::SpanTooLarge {
            what: what.to_string(),
            hours,
            max,
        });
    }
    Ok(())
}

fn job_span(jobs: &[JobRecord]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let times = jobs
        .iter()
        .flat_map(|j| std::iter::once(j.submit).chain(j.start).chain(j.end));
    times.fold(None, |span, t| match span {
        None => Some((t, t)),
        Some((first, last)) => Some((first.min(t), last.max(t))),
    })
}

async fn compute_job_use_with_repo<R: SeriesApiRepository>(
    repo: &R,
    settings: &JobUseSettings,
    req: JobUseRequestDto,
    now: DateTime<Utc>,
) -> Result<JobUseResponseDto> {
    req.validate()?;

    let unit = match UsageUnit::from_code(&req.use_unit) {
        Some(unit) => unit,
        None => {
            warn!("Unknown usage unit '{}'", req.use_unit);
            return Err(UsageError::UnsupportedUnit(req.use_unit.clone()).into());
        }
    };

    let window = QueryWindow::resolve_at(req.d_from, req.d_to, now);
    if window.is_empty() {
        warn!("Query window is inverted ({} > {}); series will be empty", window.start, window.end);
    }
    ensure_span("query window", window.start, window.end, settings.max_span_hours)?;

    let jobs: Vec<JobRecord> = req.jobs.iter().map(JobRecord::from).collect();
    if let Some((first, last)) = job_span(&jobs) {
        ensure_span("job records", first, last, settings.max_span_hours)?;
    }

    let target = match (&req.target, &req.target_series_name) {
        (Some(target), _) => TargetSpec::from(target),
        (None, Some(name)) => TargetSpec::Series(repo.load(name)?),
        (None, None) => return Err(anyhow!("target or target_series_name is required")),
    };

    let params = JobUseParams {
        window,
        target,
        unit,
        gpu: settings.gpu.clone(),
    };

    let mut outcome = run_job_use(&jobs, &params, &SteppedTargetBuilder)?;
    persist_outcome(repo, &req, &mut outcome);

    info!(
        "Computed job-use for {} jobs ({}) over [{}, {}] with {} warnings",
        jobs.len(),
        unit,
        window.start,
        window.end,
        outcome.warnings.len()
    );

    Ok(JobUseResponseDto::from_outcome(&outcome, unit, &window))
}

/// Writes every series whose name is non-empty. Failures become warnings; the
/// outcome's series are never touched.
fn persist_outcome<R: SeriesApiRepository>(repo: &R, req: &JobUseRequestDto, outcome: &mut JobUseOutcome) {
    let requested: [(&str, &str, &HourlySeries); 3] = [
        ("running", req.serialize_running.as_str(), &outcome.running_full),
        ("queued", req.serialize_queued.as_str(), &outcome.queued),
        ("distance", req.serialize_distance.as_str(), &outcome.distance),
    ];

    let mut failures = Vec::new();
    for (kind, name, series) in requested {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        match repo.save(name, series) {
            Ok(()) => info!("Persisted {} series ({} points) as '{}'", kind, series.len(), name),
            Err(e) => {
                error!("Failed to persist {} series as '{}': {:#}", kind, name, e);
                failures.push(UsageWarning::PersistFailed {
                    series: kind.to_string(),
                    name: name.to_string(),
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    outcome.warnings.extend(failures);
}

async fn build_target_series_with_repo<R: SeriesApiRepository>(
    repo: &R,
    req: TargetSeriesRequestDto,
    max_span_hours: i64,
) -> Result<SeriesDto> {
    req.validate()?;

    let steps: Vec<TargetStep> = req.steps.iter().map(TargetStep::from).collect();
    for step in &steps {
        ensure_span("target step", step.start, step.end, max_span_hours)?;
    }
    let series = SteppedTargetBuilder.build(&steps);

    let name = req.serialize_as.trim();
    if !name.is_empty() {
        repo.save(name, &series)?;
        info!("Persisted target series ({} points) as '{}'", series.len(), name);
    }

    Ok(SeriesDto::from(&series))
}

async fn get_series_with_repo<R: SeriesApiRepository>(repo: &R, name: &str) -> Result<SeriesDto> {
    let series = repo.load(name)?;
    Ok(SeriesDto::from(&series))
}
