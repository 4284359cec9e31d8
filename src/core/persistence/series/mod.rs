pub mod series_api_repository_trait;
pub mod series_fs_adapter;
pub mod series_fs_adapter_trait;
pub mod series_repository;
