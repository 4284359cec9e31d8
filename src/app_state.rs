use std::sync::Arc;

macro_rules! delegate_async_service {
    ($(fn $name:ident($($arg:ident : $typ:ty),*) -> $ret:ty => $path:path;)+) => {
        $(
            pub async fn $name(&self, $($arg: $typ),*) -> anyhow::Result<$ret> {
                $path($($arg),*).await
            }
        )+
    };
}

#[derive(Clone)]
pub struct AppState {
    pub system_service: Arc<SystemService>,
    pub usage_service: Arc<UsageService>,
}

pub fn build_app_state() -> AppState {
    AppState {
        system_service: Arc::new(SystemService::default()),
        usage_service: Arc::new(UsageService::default()),
    }
}

#[derive(Clone, Default)]
pub struct SystemService;

impl SystemService {
    delegate_async_service! {
        fn status() -> serde_json::Value => crate::domain::system::service::status_service::status;
    }
}

#[derive(Clone, Default)]
pub struct UsageService;

impl UsageService {
    delegate_async_service! {
        fn compute_job_use(req: crate::domain::usage::dto::job_use_request_dto::JobUseRequestDto) -> crate::domain::usage::dto::job_use_response_dto::JobUseResponseDto => crate::domain::usage::service::job_use_service::compute_job_use;
        fn build_target_series(req: crate::domain::usage::dto::target_series_request_dto::TargetSeriesRequestDto) -> crate::domain::usage::dto::series_dto::SeriesDto => crate::domain::usage::service::job_use_service::build_target_series;
        fn get_series(name: String) -> crate::domain::usage::dto::series_dto::SeriesDto => crate::domain::usage::service::job_use_service::get_series;
    }
}
