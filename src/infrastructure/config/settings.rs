//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for secrets such as exchange API keys and Telegram credentials.
//!
//! # Example
//!
//! ```no_run
//! use moverwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     let _log_guard = config.init_logging()?;
//!     Ok(())
//! }
//! ```

use std::path::Path;

use chrono::NaiveTime;
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use url::Url;

use super::logging::{split_log_path, LoggingConfig};
use super::report::ReportConfig;
use super::schedule::ScheduleConfig;
use super::telegram::TelegramAppConfig;
use crate::adapter::outbound::exchange::{ExchangesConfig, HttpSettings};
use crate::application::ReporterConfig;
use crate::domain::ExchangeId;
use crate::error::{ConfigError, Result};

/// Upper bound CoinGecko accepts for `per_page`.
const COINGECKO_MAX_PER_PAGE: usize = 250;

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Daily trigger settings.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Ranking, display, and snapshot settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// HTTP client settings shared by all exchanges.
    #[serde(default)]
    pub http: HttpSettings,

    /// Per-exchange settings.
    #[serde(default)]
    pub exchanges: ExchangesConfig,

    /// Telegram notification configuration.
    #[serde(default)]
    pub telegram: TelegramAppConfig,
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads exchange API keys from `CG_API_KEY`, `BINANCE_API_KEY`, and
    /// `BYBIT_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., zero limits, unparseable trigger time)
    /// - Telegram is enabled but its credentials are missing
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Secrets come from the environment only.
        config.exchanges.coingecko.api_key = env_secret("CG_API_KEY");
        config.exchanges.binance.api_key = env_secret("BINANCE_API_KEY");
        config.exchanges.bybit.api_key = env_secret("BYBIT_API_KEY");

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path`, or built-in defaults when `path` is the implicit default
    /// location and no file exists there.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`]; an explicitly given missing file is an error.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P, explicit: bool) -> Result<Self> {
        let path = path.as_ref();
        if !explicit && !path.exists() {
            return Self::parse_toml("");
        }
        Self::load(path)
    }

    /// Initialize logging based on configuration.
    ///
    /// Hold the returned guard for as long as the log file should be written.
    #[allow(clippy::result_large_err)]
    pub fn init_logging(&self) -> Result<Option<WorkerGuard>> {
        self.logging.init()
    }

    /// Parsed daily trigger time.
    #[allow(clippy::result_large_err)]
    pub fn run_at(&self) -> Result<NaiveTime> {
        Ok(self.schedule.run_at()?)
    }

    /// Settings for the report renderer.
    #[allow(clippy::result_large_err)]
    pub fn reporter_config(&self) -> Result<ReporterConfig> {
        Ok(ReporterConfig {
            display_limit: self.report.display_limit,
            next_run: self.run_at()?,
        })
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.report.gainer_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "report.gainer_limit",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.report.display_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "report.display_limit",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.report.display_limit > self.report.gainer_limit {
            return Err(ConfigError::InvalidValue {
                field: "report.display_limit",
                reason: "must not exceed report.gainer_limit".to_string(),
            }
            .into());
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        self.schedule.run_at()?;
        if let Some(path) = &self.logging.file {
            if split_log_path(path).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: "logging.file",
                    reason: "must name a file".to_string(),
                }
                .into());
            }
        }

        let enabled = self.exchanges.enabled();
        if enabled.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "exchanges",
                reason: "at least one exchange must be enabled".to_string(),
            }
            .into());
        }
        for exchange in enabled {
            validate_base_url(exchange, self.exchanges.base_url(exchange))?;
        }

        let gecko = &self.exchanges.coingecko;
        if gecko.enabled {
            if gecko.top_coins == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "exchanges.coingecko.top_coins",
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
            if gecko.per_page == 0 || gecko.per_page > COINGECKO_MAX_PER_PAGE {
                return Err(ConfigError::InvalidValue {
                    field: "exchanges.coingecko.per_page",
                    reason: format!("must be between 1 and {COINGECKO_MAX_PER_PAGE}"),
                }
                .into());
            }
        }

        if self.telegram.enabled {
            validate_telegram_credentials()?;
        }

        Ok(())
    }
}

fn base_url_field(exchange: ExchangeId) -> &'static str {
    match exchange {
        ExchangeId::CoinGecko => "exchanges.coingecko.base_url",
        ExchangeId::Binance => "exchanges.binance.base_url",
        ExchangeId::Bybit => "exchanges.bybit.base_url",
    }
}

#[allow(clippy::result_large_err)]
fn validate_base_url(exchange: ExchangeId, raw: &str) -> Result<()> {
    let field = base_url_field(exchange);
    if raw.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }
        .into());
    }
    Ok(())
}

#[cfg(feature = "telegram")]
#[allow(clippy::result_large_err)]
fn validate_telegram_credentials() -> Result<()> {
    use crate::adapter::outbound::notifier::telegram::TelegramConfig;

    TelegramConfig::from_env()?;
    Ok(())
}

#[cfg(not(feature = "telegram"))]
#[allow(clippy::result_large_err)]
fn validate_telegram_credentials() -> Result<()> {
    Err(ConfigError::InvalidValue {
        field: "telegram.enabled",
        reason: "telegram support requires the telegram feature".to_string(),
    }
    .into())
}
