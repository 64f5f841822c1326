//! Application configuration

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use lodge::config::{ConfigError, PricingConfig};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// YAML file overriding fees and tax rates
    #[arg(long, env = "PRICING_CONFIG", global = true)]
    pub pricing_config: Option<PathBuf>,
}

impl AppConfig {
    /// Pricing settings from `--pricing-config`, or the standard ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn pricing(&self) -> Result<PricingConfig, ConfigError> {
        self.pricing_config
            .as_ref()
            .map_or_else(|| Ok(PricingConfig::default()), PricingConfig::from_path)
    }
}
