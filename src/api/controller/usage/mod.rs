//! Usage controller: job-use and target series endpoints

use axum::extract::{Path, State};
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::api::util::app_json::AppJson;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::usage::dto::job_use_request_dto::JobUseRequestDto;
use crate::domain::usage::dto::job_use_response_dto::JobUseResponseDto;
use crate::domain::usage::dto::series_dto::SeriesDto;
use crate::domain::usage::dto::target_series_request_dto::TargetSeriesRequestDto;
use crate::errors::AppError;

pub struct UsageController;

impl UsageController {
    pub async fn job_use(
        State(state): State<AppState>,
        AppJson(payload): AppJson<JobUseRequestDto>,
    ) -> Result<Json<ApiResponse<JobUseResponseDto>>, AppError> {
        to_json(state.usage_service.compute_job_use(payload).await)
    }

    pub async fn target_series(
        State(state): State<AppState>,
        AppJson(payload): AppJson<TargetSeriesRequestDto>,
    ) -> Result<Json<ApiResponse<SeriesDto>>, AppError> {
        to_json(state.usage_service.build_target_series(payload).await)
    }

    pub async fn get_series(
        State(state): State<AppState>,
        Path(name): Path<String>,
    ) -> Result<Json<ApiResponse<SeriesDto>>, AppError> {
        to_json(state.usage_service.get_series(name).await)
    }
}
