use super::series_api_repository_trait::SeriesApiRepository;
use super::series_fs_adapter::SeriesFsAdapter;
use super::series_fs_adapter_trait::SeriesFsAdapterTrait;

pub struct SeriesRepository {
    adapter: SeriesFsAdapter,
}

impl SeriesRepository {
    pub fn new() -> Self {
        Self {
            adapter: SeriesFsAdapter::new(),
        }
    }

    pub fn with_base_dir(base_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            adapter: SeriesFsAdapter::with_base_dir(base_dir),
        }
    }
}

impl Default for SeriesRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesApiRepository for SeriesRepository {
    fn fs_adapter(&self) -> &dyn SeriesFsAdapterTrait {
        &self.adapter
    }
}
