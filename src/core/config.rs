use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::warn;

pub const ENV_SERVER_ADDR: &str = "CLUSTUSE_SERVER_ADDR";
pub const ENV_DATA_DIR: &str = "CLUSTUSE_DATA_DIR";
pub const ENV_LOG_DIR: &str = "CLUSTUSE_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "CLUSTUSE_LOG_LEVEL";
pub const ENV_GPU_REQGRES_ENABLED: &str = "CLUSTUSE_GPU_REQGRES_ENABLED";
pub const ENV_MAX_SPAN_HOURS: &str = "CLUSTUSE_MAX_SPAN_HOURS";

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_LEVEL: &str = "info";
/// Five leap years of hourly points.
pub const DEFAULT_MAX_SPAN_HOURS: i64 = 24 * 366 * 5;

/// Process-wide settings resolved from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    /// Enables the `reqgres` (`gpu:<n>`) GPU extraction strategy.
    /// Upstream schema for this field is unstable, so it stays off unless asked for.
    pub gpu_reqgres_enabled: bool,
    /// Upper bound on the hours covered by a query window, the job records or a target step.
    pub max_span_hours: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 5000))),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            gpu_reqgres_enabled: false,
            max_span_hours: DEFAULT_MAX_SPAN_HOURS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Invalid values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(ENV_SERVER_ADDR) {
            match raw.trim().parse::<SocketAddr>() {
                Ok(addr) => cfg.server_addr = addr,
                Err(e) => warn!("Invalid {}='{}' ({}), using {}", ENV_SERVER_ADDR, raw, e, cfg.server_addr),
            }
        }

        if let Some(raw) = non_empty(lookup(ENV_DATA_DIR)) {
            cfg.data_dir = PathBuf::from(raw);
        }

        if let Some(raw) = non_empty(lookup(ENV_LOG_DIR)) {
            cfg.log_dir = PathBuf::from(raw);
        }

        if let Some(raw) = non_empty(lookup(ENV_LOG_LEVEL)) {
            cfg.log_level = raw;
        }

        if let Some(raw) = lookup(ENV_GPU_REQGRES_ENABLED) {
            match parse_bool(&raw) {
                Some(v) => cfg.gpu_reqgres_enabled = v,
                None => warn!("Invalid {}='{}', expected true/false", ENV_GPU_REQGRES_ENABLED, raw),
            }
        }

        if let Some(raw) = lookup(ENV_MAX_SPAN_HOURS) {
            match raw.trim().parse::<i64>() {
                Ok(hours) if hours > 0 => cfg.max_span_hours = hours,
                _ => warn!(
                    "Invalid {}='{}', expected a positive hour count, using {}",
                    ENV_MAX_SPAN_HOURS, raw, cfg.max_span_hours
                ),
            }
        }

        cfg
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Global config, read from the environment on first access.
pub fn app_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(AppConfig::from_env)
}
