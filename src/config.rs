use config::{Config, File};
pub use config::ConfigError;
use serde::Deserialize;

/// Main configuration struct
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Bot API location
    #[serde(default)]
    pub api: ApiConfig,
    /// Dashboard behavior (refresh cadence, trade list, display constants)
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the trading bot's HTTP API
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5900".to_string()
}

#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    /// Seconds between full refresh cycles
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// Starting capital the balance change is measured against.
    /// A display constant, deliberately not sourced from the API.
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    /// Page size requested from /api/trades
    #[serde(default = "default_trade_limit")]
    pub trade_limit: u32,
    /// Optional trading-mode filter for the trade list ("paper" or "live")
    #[serde(default)]
    pub trade_filter: Option<String>,
    /// Position slot cap shown as "open/max"
    #[serde(default = "default_max_positions")]
    pub max_positions: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
            initial_capital: default_initial_capital(),
            trade_limit: default_trade_limit(),
            trade_filter: None,
            max_positions: default_max_positions(),
        }
    }
}

fn default_refresh_secs() -> u64 {
    5
}

fn default_initial_capital() -> f64 {
    160.0
}

fn default_trade_limit() -> u32 {
    10
}

fn default_max_positions() -> u32 {
    2
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            dashboard: DashboardConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from a configuration file
    pub fn new(config_path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Add configuration file
            .add_source(File::with_name(config_path))
            // Add environment variables (overrides file)
            // e.g. ADX_API__BASE_URL=http://bot:5900
            .add_source(config::Environment::with_prefix("ADX").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
