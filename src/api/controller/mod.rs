pub mod system;
pub mod usage;
