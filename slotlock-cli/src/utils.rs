//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI
//! commands: data directory resolution, configuration loading, and
//! database opening.

use crate::error::CliError;
use slotlock::database::{default_data_dir, Database, DatabaseConfig};
use slotlock::{Config, ConfigBuilder};
use std::path::PathBuf;
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // verbose/quiet are consumed by the logger in main
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,
}

/// Resolves the data directory from global options or the default.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match &global.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_data_dir().map_err(CliError::from),
    }
}

/// Builds the database configuration for the resolved data directory.
pub fn database_config(global: &GlobalOptions) -> Result<DatabaseConfig, CliError> {
    let data_dir = resolve_data_dir(global)?;
    let mut config = DatabaseConfig::new(data_dir.join("slotlock.db"));
    if let Some(seconds) = global.busy_timeout {
        config = config.with_busy_timeout(Duration::from_secs(u64::from(seconds)));
    }
    Ok(config)
}

/// Opens the database for the resolved data directory.
pub fn open_database(global: &GlobalOptions) -> Result<Database, CliError> {
    Database::open(database_config(global)?).map_err(CliError::from)
}

/// Loads library configuration from `config.yaml` in the data directory,
/// with environment overrides applied on top.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;
    ConfigBuilder::new()
        .with_file(data_dir.join("config.yaml"))
        .and_then(ConfigBuilder::build)
        .map_err(|e| CliError::Config(e.to_string()))
}
