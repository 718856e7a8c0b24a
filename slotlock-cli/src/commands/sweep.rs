//! Sweep command implementation.
//!
//! Deletes expired holds. Expired holds are already inert for conflict
//! purposes, so this only reclaims storage; it is safe to run at any
//! time, including from cron alongside live traffic.

use crate::error::CliError;
use crate::utils::{open_database, GlobalOptions};
use clap::Args;
use slotlock::operations::SweepOperations;

/// Delete expired holds.
#[derive(Args)]
pub struct SweepCommand {
    /// Report what would be removed without removing it
    #[arg(long)]
    pub dry_run: bool,
}

impl SweepCommand {
    /// Execute the sweep command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut db = open_database(global)?;

        let result =
            SweepOperations::sweep_expired(&mut db, self.dry_run).map_err(CliError::from)?;

        if !global.quiet {
            if self.dry_run {
                println!("Would sweep {} expired hold(s)", result.removed_count);
            } else {
                println!("Swept {} expired hold(s)", result.removed_count);
            }
        }
        Ok(())
    }
}
