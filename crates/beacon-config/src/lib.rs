//! Beacon configuration.
//!
//! The configuration is built once at startup and passed by value into
//! the bootstrapper and scheduler. It comes from one of two sources:
//!
//! - [`ConfigSource::Env`]: `API_BASE` and `APP_ID` read from the process
//!   environment (after an optional `.env` file has been applied).
//! - [`ConfigSource::Baked`]: `BEACON_API_BASE` and `BEACON_APP_ID` captured
//!   from the build environment at compile time.
//!
//! Both values are required. The retry and poll intervals are fixed.

pub mod dotenv;
pub mod validation;

use std::time::Duration;

use beacon_common::ConfigError;

/// Environment variable holding the presence API base URL.
pub const API_BASE_VAR: &str = "API_BASE";
/// Environment variable holding the Discord application id.
pub const APP_ID_VAR: &str = "APP_ID";

/// Delay between Discord IPC login attempts.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(60);
/// Delay between presence polls once running.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

const BAKED_API_BASE: Option<&str> = option_env!("BEACON_API_BASE");
const BAKED_APP_ID: Option<&str> = option_env!("BEACON_APP_ID");

/// Where the API base URL and application id come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Env,
    Baked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconConfig {
    /// Presence API base URL, without a trailing slash.
    pub api_base: String,
    /// Discord application id used for the IPC handshake.
    pub app_id: String,
    pub retry_interval: Duration,
    pub poll_interval: Duration,
}

impl BeaconConfig {
    pub fn new(api_base: impl Into<String>, app_id: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            app_id: app_id.into().trim().to_string(),
            retry_interval: RETRY_INTERVAL,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Read `API_BASE` and `APP_ID` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset and empty values are both
    /// treated as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let api_base = required(API_BASE_VAR)?;
        let app_id = required(APP_ID_VAR)?;
        Ok(Self::new(api_base, app_id))
    }

    /// Use the values captured at compile time.
    pub fn baked() -> Result<Self, ConfigError> {
        Self::from_baked(BAKED_API_BASE, BAKED_APP_ID)
    }

    fn from_baked(api_base: Option<&str>, app_id: Option<&str>) -> Result<Self, ConfigError> {
        let api_base = api_base
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::NotBaked("BEACON_API_BASE"))?;
        let app_id = app_id
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::NotBaked("BEACON_APP_ID"))?;
        Ok(Self::new(api_base, app_id))
    }

    /// Override both timing intervals.
    pub fn with_intervals(mut self, retry: Duration, poll: Duration) -> Self {
        self.retry_interval = retry;
        self.poll_interval = poll;
        self
    }
}

/// Load and validate the configuration from `source`.
pub fn load(source: ConfigSource) -> Result<BeaconConfig, ConfigError> {
    let config = match source {
        ConfigSource::Env => BeaconConfig::from_env()?,
        ConfigSource::Baked => BeaconConfig::baked()?,
    };
    validation::validate(&config)?;
    tracing::debug!(api_base = %config.api_base, app_id = %config.app_id, ?source, "config loaded");
    Ok(config)
}
