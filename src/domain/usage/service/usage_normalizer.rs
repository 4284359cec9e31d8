use tracing::{debug, warn};

use crate::domain::usage::model::{JobRecord, NormalizedJob, UsageUnit, UsageWarning};
use crate::errors::UsageError;

use super::gpu_extractor::GpuExtractor;

/// Memory that counts as one CPU core in `cpu-eqv` mode.
pub const MEM_MB_PER_CORE: f64 = 4096.0;

/// One variant per supported unit. `gpu-eqv` has no variant and is rejected in [`UsageNormalizer::for_unit`].
#[derive(Debug, Clone)]
pub enum UsageNormalizer {
    Cpu,
    CpuEqv,
    Gpu(GpuExtractor),
}

impl UsageNormalizer {
    pub fn for_unit(unit: UsageUnit, gpu: &GpuExtractor) -> Result<Self, UsageError> {
        match unit {
            UsageUnit::Cpu => Ok(Self::Cpu),
            UsageUnit::CpuEqv => Ok(Self::CpuEqv),
            UsageUnit::Gpu => Ok(Self::Gpu(gpu.clone())),
            UsageUnit::GpuEqv => Err(UsageError::UnsupportedUnit(format!(
                "{} is not implemented yet",
                unit
            ))),
        }
    }

    /// `None` means the job's usage could not be determined.
    pub fn usage(&self, job: &JobRecord) -> Option<f64> {
        match self {
            Self::Cpu => Some(job.reqcpus as f64),
            Self::CpuEqv => Some((job.reqcpus as f64).max(job.mem / MEM_MB_PER_CORE)),
            Self::Gpu(extractor) => extractor.extract(job),
        }
    }
}

/// Normalized working copy of a job batch plus any diagnostics raised on the way.
#[derive(Debug, Clone, Default)]
pub struct NormalizedJobs {
    pub jobs: Vec<NormalizedJob>,
    pub warnings: Vec<UsageWarning>,
}

/// Attaches a usage value to every job. The input slice is left untouched.
pub fn normalize_jobs(
    jobs: &[JobRecord],
    unit: UsageUnit,
    gpu: &GpuExtractor,
) -> Result<NormalizedJobs, UsageError> {
    let normalizer = match UsageNormalizer::for_unit(unit, gpu) {
        Ok(n) => n,
        Err(e) => {
            warn!("Refusing to compute usage: {}", e);
            return Err(e);
        }
    };

    let mut out = NormalizedJobs {
        jobs: Vec::with_capacity(jobs.len()),
        warnings: Vec::new(),
    };

    if matches!(normalizer, UsageNormalizer::Gpu(_)) {
        warn!("{}", UsageWarning::GpuFieldsUnreliable);
        out.warnings.push(UsageWarning::GpuFieldsUnreliable);
    }

    for job in jobs {
        let usage = normalizer.usage(job);
        if usage.is_none() {
            let warning = UsageWarning::GpuCountMissing { job: job.label() };
            warn!("{}", warning);
            out.warnings.push(warning);
        }

        out.jobs.push(NormalizedJob {
            submit: job.submit,
            start: job.start,
            end: job.end,
            usage,
        });
    }

    debug!("Normalized {} jobs as {}", out.jobs.len(), unit);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn job(reqcpus: u32, mem: f64) -> JobRecord {
        JobRecord {
            job_id: None,
            submit: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            start: None,
            end: None,
            reqcpus,
            mem,
            reqgres: None,
            reqtres: None,
        }
    }

    #[test]
    fn cpu_mode_uses_requested_cpus() {
        let n = UsageNormalizer::for_unit(UsageUnit::Cpu, &GpuExtractor::default()).unwrap();
        assert_eq!(n.usage(&job(6, 1_000_000.0)), Some(6.0));
    }

    #[test]
    fn cpu_eqv_takes_the_larger_of_cpus_and_memory() {
        let n = UsageNormalizer::for_unit(UsageUnit::CpuEqv, &GpuExtractor::default()).unwrap();
        assert_eq!(n.usage(&job(4, 16384.0)), Some(4.0));
        assert_eq!(n.usage(&job(4, 32768.0)), Some(8.0));
        assert_eq!(n.usage(&job(4, 2048.0)), Some(4.0));
        assert_eq!(n.usage(&job(0, 6144.0)), Some(1.5));
    }

    #[test]
    fn gpu_eqv_is_rejected() {
        let err = normalize_jobs(&[job(1, 0.0)], UsageUnit::GpuEqv, &GpuExtractor::default()).unwrap_err();
        assert!(matches!(err, UsageError::UnsupportedUnit(_)));
    }

    #[test]
    fn gpu_mode_warns_on_unparsable_jobs_and_continues() {
        let mut with_gpu = job(8, 0.0);
        with_gpu.reqtres = Some("cpu=8,gres/gpu=2".into());
        let mut without_gpu = job(8, 0.0);
        without_gpu.job_id = Some("1001".into());
        without_gpu.reqtres = Some("cpu=8".into());

        let out = normalize_jobs(&[with_gpu, without_gpu], UsageUnit::Gpu, &GpuExtractor::default()).unwrap();

        assert_eq!(out.jobs[0].usage, Some(2.0));
        assert_eq!(out.jobs[1].usage, None);
        assert_eq!(out.jobs[1].usage_or_zero(), 0.0);
        assert_eq!(
            out.warnings,
            vec![
                UsageWarning::GpuFieldsUnreliable,
                UsageWarning::GpuCountMissing { job: "1001".into() },
            ]
        );
    }

    #[test]
    fn input_is_not_mutated() {
        let jobs = vec![job(2, 8192.0), job(1, 100.0)];
        let before = jobs.clone();
        let _ = normalize_jobs(&jobs, UsageUnit::CpuEqv, &GpuExtractor::default()).unwrap();
        assert_eq!(jobs, before);
    }
}
