//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: scrape endpoint listener
//! - `logging`: console and rotating file sinks
//! - `emission`: the synthetic workload
//!
//! Telemetry export settings live next to the exporter in
//! [`crate::telemetry::TelemetryConfig`].
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `config.toml`, then `TELEGEN_*` environment variables with `__` between
//! nested keys (e.g. `TELEGEN_SERVER__PORT=9100`,
//! `TELEGEN_EMISSION__ENDPOINTS=/a,/b`).

mod emission;
mod logging;
mod server;

use std::path::Path;

use application::{ApplicationError, EmissionConfig};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

pub use emission::EmissionAppConfig;
pub use logging::LoggingConfig;
pub use server::ServerConfig;

use crate::telemetry::TelemetryConfig;

/// Prefix of the environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "TELEGEN";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Scrape endpoint listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Trace export
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Log sinks
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Synthetic workload
    #[serde(default)]
    pub emission: EmissionAppConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(
            Self::builder()?.add_source(config::File::with_name("config").required(false)),
        )
    }

    /// Load configuration from an explicit file and the environment
    pub fn load_file(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(Self::builder()?.add_source(config::File::from(path)))
    }

    fn builder() -> Result<config::ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("telemetry.endpoint", "http://localhost:4317")
    }

    fn build(
        builder: config::ConfigBuilder<DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        let config = builder
            // Override with environment variables (e.g., TELEGEN_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("emission.endpoints")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        debug!(config = ?app_config, "Configuration loaded");
        Ok(app_config)
    }

    /// Check cross-field constraints that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` (or `Domain` for endpoint
    /// problems) describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.emission_config()?;

        if self.telemetry.endpoint.trim().is_empty() {
            return Err(invalid("telemetry.endpoint must not be empty"));
        }
        if self.telemetry.service_name.trim().is_empty() {
            return Err(invalid("telemetry.service_name must not be empty"));
        }
        if self.telemetry.max_batch_size == 0 {
            return Err(invalid("telemetry.max_batch_size must be greater than zero"));
        }

        let logging = &self.logging;
        if logging.file_path.as_os_str().is_empty() {
            return Err(invalid("logging.file_path must not be empty"));
        }
        if logging.max_size_mb == 0 {
            return Err(invalid("logging.max_size_mb must be greater than zero"));
        }
        for (key, level) in [
            ("logging.console_level", &logging.console_level),
            ("logging.file_level", &logging.file_level),
        ] {
            if level.parse::<LevelFilter>().is_err() {
                return Err(ApplicationError::Configuration(format!(
                    "{key}: unknown level '{level}'"
                )));
            }
        }

        Ok(())
    }

    /// Settings for the emission loop
    pub fn emission_config(&self) -> Result<EmissionConfig, ApplicationError> {
        self.emission.to_emission_config()
    }
}

fn invalid(message: &str) -> ApplicationError {
    ApplicationError::Configuration(message.to_string())
}
