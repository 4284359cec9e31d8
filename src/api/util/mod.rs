pub mod app_json;
pub mod json;
