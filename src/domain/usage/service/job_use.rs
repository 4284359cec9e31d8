use tracing::debug;

use crate::domain::common::service::time_window::QueryWindow;
use crate::domain::usage::model::{JobRecord, JobUseOutcome, TargetSpec, UsageUnit};
use crate::errors::UsageError;

use super::gpu_extractor::GpuExtractor;
use super::hourly_aggregator::aggregate_hourly;
use super::level_builder::build_levels;
use super::lifecycle_projector::project_lifecycle;
use super::target_aligner::{align, distance_from_target, resolve_target};
use super::target_series::TargetSeriesBuilder;
use super::usage_normalizer::normalize_jobs;

#[derive(Debug, Clone)]
pub struct JobUseParams {
    pub window: QueryWindow,
    pub target: TargetSpec,
    pub unit: UsageUnit,
    pub gpu: GpuExtractor,
}

/// Turns a batch of job records into queued/running levels and the distance from target.
///
/// Pure over its inputs. The only hard failure is an unsupported unit, in which
/// case nothing is computed.
pub fn run_job_use(
    jobs: &[JobRecord],
    params: &JobUseParams,
    target_builder: &dyn TargetSeriesBuilder,
) -> Result<JobUseOutcome, UsageError> {
    let normalized = normalize_jobs(jobs, params.unit, &params.gpu)?;

    let events = project_lifecycle(&normalized.jobs);
    let deltas = aggregate_hourly(&events);
    let levels = build_levels(&deltas);

    let target = resolve_target(&params.target, &params.window, target_builder);
    let aligned = align(&target, &levels.running, &params.window);
    let distance = distance_from_target(&aligned);
    let running = levels.running.slice(params.window.start, params.window.end);

    debug!(
        "job-use: {} jobs, unit={}, queued={} running={} distance={}",
        jobs.len(),
        params.unit,
        levels.queued.len(),
        running.len(),
        distance.len()
    );

    Ok(JobUseOutcome {
        target: aligned.target,
        queued: levels.queued,
        running_full: levels.running,
        running,
        distance,
        warnings: normalized.warnings,
    })
}
