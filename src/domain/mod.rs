pub mod common;
pub mod system;
pub mod usage;
