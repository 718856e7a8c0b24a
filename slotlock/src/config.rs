//! Library configuration.
//!
//! Two knobs govern runtime behavior: the default hold time-to-live and
//! the background sweep interval. Configuration is loaded from an
//! optional YAML file (conventionally `config.yaml` in the data
//! directory), then overridden by environment variables, then validated.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hold-related configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldConfig {
    /// Default time-to-live for new holds, in minutes.
    pub default_ttl_minutes: i64,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            default_ttl_minutes: crate::operations::DEFAULT_HOLD_TTL_MINUTES,
        }
    }
}

/// Sweep-related configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Interval between background sweep passes, in seconds.
    pub interval_seconds: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_seconds: crate::operations::DEFAULT_SWEEP_INTERVAL.as_secs(),
        }
    }
}

/// Complete library configuration.
///
/// # Examples
///
/// ```
/// use slotlock::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new().build().unwrap();
/// assert_eq!(config.hold.default_ttl_minutes, 15);
/// assert_eq!(config.sweep.interval_seconds, 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hold settings.
    pub hold: HoldConfig,
    /// Sweep settings.
    pub sweep: SweepConfig,
}

impl Config {
    /// Returns the default hold TTL as a chrono duration.
    #[must_use]
    pub fn hold_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.hold.default_ttl_minutes)
    }

    /// Returns the sweep interval as a std duration.
    #[must_use]
    pub const fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep.interval_seconds)
    }
}

/// Builder assembling configuration from defaults, file, and environment.
///
/// Precedence, lowest to highest: built-in defaults, the YAML file, then
/// the `SLOTLOCK_HOLD_TTL_MINUTES` and `SLOTLOCK_SWEEP_INTERVAL_SECONDS`
/// environment variables.
///
/// # Examples
///
/// ```
/// use slotlock::ConfigBuilder;
///
/// let config = ConfigBuilder::new().build().unwrap();
/// assert_eq!(config.hold.default_ttl_minutes, 15);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    file_contents: Option<String>,
}

impl ConfigBuilder {
    /// Creates a builder with built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads configuration from a YAML file.
    ///
    /// A missing file is not an error - the defaults simply apply - so
    /// fresh data directories work without an explicit config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            self.file_contents = Some(std::fs::read_to_string(path)?);
        }
        Ok(self)
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, an environment override
    /// is not a number, or a validated bound is violated (TTL and sweep
    /// interval must both be at least 1).
    pub fn build(self) -> Result<Config> {
        let mut config = match self.file_contents {
            Some(contents) => serde_yaml::from_str(&contents)?,
            None => Config::default(),
        };

        if let Some(ttl) = read_env_override("SLOTLOCK_HOLD_TTL_MINUTES")? {
            config.hold.default_ttl_minutes = ttl;
        }
        if let Some(interval) = read_env_override("SLOTLOCK_SWEEP_INTERVAL_SECONDS")? {
            config.sweep.interval_seconds = u64::try_from(interval).unwrap_or(0);
        }

        if config.hold.default_ttl_minutes < 1 {
            return Err(Error::Validation {
                field: "hold.default_ttl_minutes".into(),
                message: "hold TTL must be at least one minute".into(),
            });
        }
        if config.sweep.interval_seconds < 1 {
            return Err(Error::Validation {
                field: "sweep.interval_seconds".into(),
                message: "sweep interval must be at least one second".into(),
            });
        }

        Ok(config)
    }
}

fn read_env_override(name: &str) -> Result<Option<i64>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Error::Validation {
                field: name.to_string(),
                message: format!("'{value}' is not a valid number"),
            }),
        Err(_) => Ok(None),
    }
}
