//! Configuration for the coordinator runtime.
//!
//! Hierarchical configuration with environment variable overrides: an
//! optional TOML file plus `VANTAGE_`-prefixed environment variables, merged
//! via the `config` crate. Defaults mirror the dashboard's cadences (data
//! every 30s, connection status every 5s).

use crate::error::CoreError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VantageConfig {
    /// Poll cadences for background refresh loops
    #[serde(default)]
    pub poll: PollConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Poll cadences, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Interval for slow-moving dashboard data
    #[serde(default = "default_data_interval")]
    pub data_interval_secs: u64,

    /// Interval for connection status
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: u64,
}

fn default_data_interval() -> u64 {
    30
}

fn default_status_interval() -> u64 {
    5
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            data_interval_secs: default_data_interval(),
            status_interval_secs: default_status_interval(),
        }
    }
}

impl VantageConfig {
    /// Load configuration from an optional file plus `VANTAGE_*` environment
    /// overrides (e.g. `VANTAGE_POLL__DATA_INTERVAL_SECS=60`).
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("VANTAGE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: VantageConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.poll.data_interval_secs == 0 {
            return Err(CoreError::Config(
                "Poll data interval must be greater than zero".to_string(),
            ));
        }
        if self.poll.status_interval_secs == 0 {
            return Err(CoreError::Config(
                "Poll status interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
