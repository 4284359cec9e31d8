use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failures of the job-use pipeline itself.
#[derive(Debug, Error, PartialEq)]
pub enum UsageError {
    #[error("Unsupported usage unit: {0}")]
    UnsupportedUnit(String),

    #[error("Series not found: {0}")]
    SeriesNotFound(String),

    #[error("Invalid series name '{0}': must be a non-empty relative path inside the data directory")]
    InvalidSeriesName(String),

    #[error("{what} spans {hours} hours, more than the allowed {max}")]
    SpanTooLarge { what: String, hours: i64, max: i64 },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Body parsing error: {0}")]
    BodyParsingError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Helper for mapping any unknown error into internal error
pub fn internal_error<E: ToString>(err: E) -> AppError {
    AppError::InternalServerError(err.to_string())
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(usage) = err.downcast_ref::<UsageError>() {
            return match usage {
                UsageError::UnsupportedUnit(_) => AppError::Unprocessable(usage.to_string()),
                UsageError::SeriesNotFound(_) => AppError::NotFound(usage.to_string()),
                UsageError::InvalidSeriesName(_) | UsageError::SpanTooLarge { .. } => {
                    AppError::BadRequest(usage.to_string())
                }
            };
        }
        if let Some(validation) = err.downcast_ref::<validator::ValidationErrors>() {
            return AppError::BodyParsingError(validation.to_string());
        }
        internal_error(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BodyParsingError(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Choose status codes per variant
        let (status, code) = match self {
            AppError::InternalServerError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
            AppError::BodyParsingError(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "UNSUPPORTED_UNIT"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        };

        let body = Json(json!({
            "is_successful": false,
            "data": null,
            "error_code": code,
            "error_msg": self.to_string(),
        }));

        (status, body).into_response()
    }
}
