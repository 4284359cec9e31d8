use std::sync::LazyLock;

use regex::Regex;

use crate::domain::usage::model::JobRecord;

static REQGRES_GPU: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"gpu:(\d+)").expect("valid reqgres pattern"));
static REQTRES_GPU: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"gpu=(\d+)").expect("valid reqtres pattern"));

/// Job field a strategy reads its GPU request from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuRequestField {
    Reqgres,
    Reqtres,
}

impl GpuRequestField {
    fn read<'a>(&self, job: &'a JobRecord) -> Option<&'a str> {
        match self {
            Self::Reqgres => job.reqgres.as_deref(),
            Self::Reqtres => job.reqtres.as_deref(),
        }
    }
}

/// Reads one field and pulls the first GPU count out of it.
#[derive(Debug, Clone)]
pub struct GpuExtractionStrategy {
    field: GpuRequestField,
    pattern: &'static Regex,
}

impl GpuExtractionStrategy {
    /// `reqgres` / `gpu:<n>`.
    pub fn reqgres() -> Self {
        Self {
            field: GpuRequestField::Reqgres,
            pattern: &REQGRES_GPU,
        }
    }

    /// `reqtres` / `gpu=<n>`.
    pub fn reqtres() -> Self {
        Self {
            field: GpuRequestField::Reqtres,
            pattern: &REQTRES_GPU,
        }
    }

    pub fn field(&self) -> GpuRequestField {
        self.field
    }

    pub fn extract(&self, job: &JobRecord) -> Option<f64> {
        let raw = self.field.read(job)?;
        let caps = self.pattern.captures(raw)?;
        caps.get(1)?.as_str().parse::<u64>().ok().map(|n| n as f64)
    }
}

/// Ordered GPU extraction strategies; the first one that yields a count wins.
#[derive(Debug, Clone)]
pub struct GpuExtractor {
    strategies: Vec<GpuExtractionStrategy>,
}

impl GpuExtractor {
    pub fn new(strategies: Vec<GpuExtractionStrategy>) -> Self {
        Self { strategies }
    }

    /// `reqgres` parsing is only tried when enabled; `reqtres` is always the fallback.
    pub fn from_flags(reqgres_enabled: bool) -> Self {
        let mut strategies = Vec::with_capacity(2);
        if reqgres_enabled {
            strategies.push(GpuExtractionStrategy::reqgres());
        }
        strategies.push(GpuExtractionStrategy::reqtres());
        Self::new(strategies)
    }

    pub fn strategies(&self) -> &[GpuExtractionStrategy] {
        &self.strategies
    }

    pub fn extract(&self, job: &JobRecord) -> Option<f64> {
        self.strategies.iter().find_map(|s| s.extract(job))
    }
}

impl Default for GpuExtractor {
    fn default() -> Self {
        Self::from_flags(false)
    }
}
