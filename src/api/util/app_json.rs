use axum::extract::FromRequest;

use crate::errors::AppError;

/// `Json` extractor whose rejections (bad syntax, wrong types, unparsable
/// timestamps, missing content type) come back as `AppError::BodyParsingError`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
    use axum::response::IntoResponse;

    use crate::domain::usage::dto::job_use_request_dto::JobUseRequestDto;

    fn post(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/usage/job-use")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_submit_timestamp_is_a_bad_request() {
        let req = post(r#"{"jobs":[{"submit":"yesterday","reqcpus":1}],"d_from":"2024-05-01T00:00:00","target":5}"#);

        let err = AppJson::<JobUseRequestDto>::from_request(req, &()).await.unwrap_err();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["is_successful"], false);
        assert_eq!(v["error_code"], "BAD_REQUEST");
        assert!(v["data"].is_null());
    }

    #[tokio::test]
    async fn broken_json_is_a_bad_request() {
        let err = AppJson::<JobUseRequestDto>::from_request(post("{\"jobs\": ["), &())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_body_is_extracted() {
        let req = post(r#"{"jobs":[{"submit":"2024-05-01T00:10:00","reqcpus":1}],"d_from":"2024-05-01T00:00:00","target":5}"#);

        let AppJson(dto) = AppJson::<JobUseRequestDto>::from_request(req, &()).await.unwrap();
        assert_eq!(dto.jobs.len(), 1);
        assert_eq!(dto.use_unit, "cpu");
    }
}
