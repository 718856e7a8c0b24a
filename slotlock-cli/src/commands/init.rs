//! Init command implementation.
//!
//! Creates the data directory and initializes the database schema.

use crate::error::CliError;
use crate::utils::{open_database, resolve_data_dir, GlobalOptions};
use clap::Args;

/// Initialize the data directory and database.
#[derive(Args)]
pub struct InitCommand {
    /// Also write a config.yaml with the default settings
    #[arg(long)]
    pub with_config: bool,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;
        std::fs::create_dir_all(&data_dir)?;

        // Opening with auto_create initializes the schema.
        let _db = open_database(global)?;

        if self.with_config {
            let config_path = data_dir.join("config.yaml");
            if !config_path.exists() {
                std::fs::write(
                    &config_path,
                    "hold:\n  default_ttl_minutes: 15\nsweep:\n  interval_seconds: 60\n",
                )?;
            }
        }

        if !global.quiet {
            println!("Initialized data directory at {}", data_dir.display());
        }
        Ok(())
    }
}
