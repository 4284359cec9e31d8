use crate::domain::common::model::HourlySeries;

use super::series_fs_adapter_trait::SeriesFsAdapterTrait;

/// API-facing repository abstraction for persisted series.
pub trait SeriesApiRepository {
    fn fs_adapter(&self) -> &dyn SeriesFsAdapterTrait;

    fn save(&self, name: &str, series: &HourlySeries) -> anyhow::Result<()> {
        self.fs_adapter().write(name, series)
    }

    fn load(&self, name: &str) -> anyhow::Result<HourlySeries> {
        self.fs_adapter().read(name)
    }
}
