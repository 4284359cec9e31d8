//! Job-use pipeline: normalize → project → bucket → level → align → distance

pub mod gpu_extractor;
pub mod hourly_aggregator;
pub mod job_use;
pub mod job_use_service;
pub mod level_builder;
pub mod lifecycle_projector;
pub mod target_aligner;
pub mod target_series;
pub mod usage_normalizer;
