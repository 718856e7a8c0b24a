//! Cancel-booking command implementation.
//!
//! Frees the blocks of a cancelled booking. Idempotent: cancelling a
//! booking with no remaining blocks reports zero and exits successfully.

use crate::error::CliError;
use crate::utils::{open_database, GlobalOptions};
use clap::Args;
use slotlock::operations::cancel_booking;

/// Free the blocks of a cancelled booking.
#[derive(Args)]
pub struct CancelBookingCommand {
    /// Booking reference whose blocks should be freed
    #[arg(long, value_name = "REF")]
    pub booking: String,
}

impl CancelBookingCommand {
    /// Execute the cancel-booking command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut db = open_database(global)?;

        let freed = cancel_booking(&mut db, &self.booking).map_err(CliError::from)?;

        if !global.quiet {
            println!("Freed {freed} block(s) for booking {}", self.booking);
        }
        Ok(())
    }
}
