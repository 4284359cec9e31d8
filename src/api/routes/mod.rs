pub mod system_routes;
pub mod usage_routes;
