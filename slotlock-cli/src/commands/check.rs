//! Check command implementation.
//!
//! Availability probe: exits 0 when the slot is free and 1 when it is
//! taken, so scripts can branch on the result. The answer is advisory -
//! only an actual `hold` attempt is authoritative.

use crate::error::CliError;
use crate::utils::{open_database, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use slotlock::operations::is_available;
use slotlock::{Interval, ResourceId};

/// Check whether a slot is free.
#[derive(Args)]
pub struct CheckCommand {
    /// Resource identifier (e.g. a vehicle)
    #[arg(long, value_name = "ID")]
    pub resource: ResourceId,

    /// Calendar day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: NaiveDate,

    /// Time slot (HH:MM-HH:MM)
    #[arg(long, value_name = "SLOT")]
    pub slot: Interval,
}

impl CheckCommand {
    /// Execute the check command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let db = open_database(global)?;

        let free = is_available(&db, &self.resource, self.date, self.slot)
            .map_err(CliError::from)?;

        if free {
            if !global.quiet {
                println!("free");
            }
            Ok(())
        } else {
            Err(CliError::SemanticFailure(format!(
                "slot {} on {} {} is taken",
                self.slot, self.resource, self.date
            )))
        }
    }
}
