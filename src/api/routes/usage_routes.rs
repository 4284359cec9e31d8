//! Usage routes (e.g., /api/v1/usage/*)

use axum::{routing::{get, post}, Router};

use crate::api::controller::usage::UsageController;
use crate::app_state::AppState;

pub fn usage_routes() -> Router<AppState> {
    Router::new()
        .route("/job-use", post(UsageController::job_use))
        .route("/target-series", post(UsageController::target_series))
        .route("/series/{*name}", get(UsageController::get_series))
}
