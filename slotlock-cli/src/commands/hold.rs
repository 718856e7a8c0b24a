//! Hold command implementation.
//!
//! Creates a provisional hold on a slot. On success the hold id is
//! printed to stdout so scripts can capture it for a later confirm or
//! release.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use slotlock::operations::{create_hold, HoldOptions, HoldOutcome};
use slotlock::{Interval, ResourceId};

/// Create a provisional hold on a slot.
#[derive(Args)]
pub struct HoldCommand {
    /// Resource identifier (e.g. a vehicle)
    #[arg(long, value_name = "ID")]
    pub resource: ResourceId,

    /// Calendar day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: NaiveDate,

    /// Time slot (HH:MM-HH:MM)
    #[arg(long, value_name = "SLOT")]
    pub slot: Interval,

    /// Caller session identifier
    #[arg(long, value_name = "SESSION")]
    pub session: String,

    /// Hold time-to-live in minutes (default: from configuration)
    #[arg(long, value_name = "MINUTES")]
    pub ttl_minutes: Option<i64>,
}

impl HoldCommand {
    /// Execute the hold command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global)?;

        let ttl = chrono::Duration::minutes(
            self.ttl_minutes
                .unwrap_or(config.hold.default_ttl_minutes),
        );
        let options = HoldOptions::new(self.resource, self.date, self.slot, self.session)
            .with_ttl(ttl);

        match create_hold(&mut db, &options).map_err(CliError::from)? {
            HoldOutcome::Created { id, expires_at } => {
                println!("{id}");
                if !global.quiet {
                    eprintln!("Hold {id} expires at {}", expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
                }
                Ok(())
            }
            HoldOutcome::Unavailable(conflict) => Err(CliError::SemanticFailure(format!(
                "slot unavailable: {conflict}"
            ))),
        }
    }
}
