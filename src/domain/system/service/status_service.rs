use anyhow::Result;
use serde_json::{json, Value};

use crate::core::config::app_config;
use crate::domain::usage::model::UsageUnit;

pub async fn status() -> Result<Value> {
    let cfg = app_config();
    let supported_units: Vec<&str> = UsageUnit::ALL
        .iter()
        .filter(|unit| unit.is_supported())
        .map(UsageUnit::as_code)
        .collect();

    Ok(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "data_dir": cfg.data_dir.display().to_string(),
        "gpu_reqgres_enabled": cfg.gpu_reqgres_enabled,
        "max_span_hours": cfg.max_span_hours,
        "supported_units": supported_units,
    }))
}
