use anyhow::Result;

use crate::domain::common::model::HourlySeries;

/// Storage backend for named hourly series snapshots.
pub trait SeriesFsAdapterTrait {
    fn write(&self, name: &str, series: &HourlySeries) -> Result<()>;

    /// Fails with `UsageError::SeriesNotFound` when nothing is stored under `name`.
    fn read(&self, name: &str) -> Result<HourlySeries>;
}
