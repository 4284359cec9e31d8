//! Shared domain types

pub mod hourly_series;

pub use hourly_series::HourlySeries;
