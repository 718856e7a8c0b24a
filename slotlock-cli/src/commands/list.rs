//! List command implementation.
//!
//! Shows a resource's schedule for a day, either as text or JSON.

use crate::error::CliError;
use crate::utils::{open_database, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use slotlock::database::Database;
use slotlock::operations::day_schedule;
use slotlock::output::{format_blocks, OutputFormat};
use slotlock::ResourceId;

/// Show a resource's schedule for a day.
#[derive(Args)]
pub struct ListCommand {
    /// Resource identifier (e.g. a vehicle)
    #[arg(long, value_name = "ID")]
    pub resource: ResourceId,

    /// Calendar day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: NaiveDate,

    /// Output format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,

    /// Include inert blocks (expired, unswept holds)
    #[arg(long)]
    pub all: bool,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let db = open_database(global)?;

        let blocks = if self.all {
            Database::list_blocks_for_day(db.connection(), &self.resource, self.date)
                .map_err(CliError::from)?
        } else {
            day_schedule(&db, &self.resource, self.date).map_err(CliError::from)?
        };

        let rendered = format_blocks(&blocks, self.format).map_err(CliError::from)?;
        println!("{rendered}");
        Ok(())
    }
}
