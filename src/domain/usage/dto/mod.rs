//! Job-use request/response DTOs

pub mod job_use_request_dto;
pub mod job_use_response_dto;
pub mod series_dto;
pub mod target_series_request_dto;
