//! Shared domain services (query window resolution)

pub mod time_window;
