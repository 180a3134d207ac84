//! Application configuration.

use crate::error::{AppError, AppResult};
use kpa_core::Timeframe;
use kpa_rest::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Config file used when neither `--config` nor `KPA_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "KPA_CONFIG";

/// Telemetry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for the rotating log file; empty disables file output.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl TelemetryConfig {
    pub fn log_dir(&self) -> Option<&Path> {
        let dir = self.log_dir.trim();
        (!dir.is_empty()).then(|| Path::new(dir))
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pair traded when `--pair` is not given.
    #[serde(default = "default_pair")]
    pub default_pair: String,
    /// Candle timeframe ("1m", "5m", "15m", "1h", "4h").
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    /// Seconds between cycles in continuous mode.
    #[serde(default = "default_loop_interval_secs")]
    pub loop_interval_secs: u64,
    /// Most recent candles kept per fetch.
    #[serde(default = "default_candle_limit")]
    pub candle_limit: usize,
    /// Paper fee in basis points.
    #[serde(default = "default_fee_bps")]
    pub fee_bps: f64,
    /// Max loss per trade as a fraction of equity.
    #[serde(default = "default_per_trade_loss_cap")]
    pub per_trade_loss_cap: f64,
    /// Max loss per day as a fraction of equity.
    #[serde(default = "default_daily_loss_cap")]
    pub daily_loss_cap: f64,
    /// Kraken REST base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_pair() -> String {
    "BTC/EUR".to_string()
}

fn default_timeframe() -> String {
    "5m".to_string()
}

fn default_loop_interval_secs() -> u64 {
    15
}

fn default_candle_limit() -> usize {
    200
}

fn default_fee_bps() -> f64 {
    5.0
}

fn default_per_trade_loss_cap() -> f64 {
    0.01
}

fn default_daily_loss_cap() -> f64 {
    0.05
}

fn default_api_base_url() -> String {
    "https://api.kraken.com".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_pair: default_pair(),
            timeframe: default_timeframe(),
            loop_interval_secs: default_loop_interval_secs(),
            candle_limit: default_candle_limit(),
            fee_bps: default_fee_bps(),
            per_trade_loss_cap: default_per_trade_loss_cap(),
            daily_loss_cap: default_daily_loss_cap(),
            api_base_url: default_api_base_url(),
            retry: RetryPolicy::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load using the path precedence `cli_path` > `KPA_CONFIG` > default.
    ///
    /// A missing file at the default path yields the built-in defaults; a
    /// missing file that was named explicitly is an error.
    pub fn load(cli_path: Option<&str>) -> AppResult<Self> {
        let env_path = std::env::var(CONFIG_ENV_VAR).ok();
        let (path, explicit) = config_source(cli_path, env_path.as_deref());

        if !explicit && !Path::new(&path).exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML content. Absent fields take their defaults.
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        self.parsed_timeframe()?;

        if self.default_pair.trim().is_empty() {
            return Err(AppError::Config("default_pair must not be empty".to_string()));
        }
        for (name, cap) in [
            ("per_trade_loss_cap", self.per_trade_loss_cap),
            ("daily_loss_cap", self.daily_loss_cap),
        ] {
            if !(cap > 0.0 && cap <= 1.0) {
                return Err(AppError::Config(format!(
                    "{name} must be in (0, 1], got {cap}"
                )));
            }
        }
        if !(self.fee_bps.is_finite() && self.fee_bps >= 0.0) {
            return Err(AppError::Config(format!(
                "fee_bps must be non-negative, got {}",
                self.fee_bps
            )));
        }
        if self.retry.max_attempts < 1 {
            return Err(AppError::Config("retry.max_attempts must be >= 1".to_string()));
        }
        if self.loop_interval_secs == 0 {
            return Err(AppError::Config("loop_interval_secs must be >= 1".to_string()));
        }
        Ok(())
    }

    pub fn parsed_timeframe(&self) -> AppResult<Timeframe> {
        Ok(self.timeframe.parse::<Timeframe>()?)
    }

    pub fn loop_interval(&self) -> Duration {
        Duration::from_secs(self.loop_interval_secs)
    }
}

/// Pick the config path and whether it was named explicitly.
fn config_source(cli_path: Option<&str>, env_path: Option<&str>) -> (String, bool) {
    match cli_path.or(env_path) {
        Some(path) => (path.to_string(), true),
        None => (DEFAULT_CONFIG_PATH.to_string(), false),
    }
}
