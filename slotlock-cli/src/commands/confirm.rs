//! Confirm command implementation.
//!
//! Promotes a hold into a firm booking once the external booking record
//! exists.

use crate::error::CliError;
use crate::utils::{open_database, GlobalOptions};
use clap::Args;
use slotlock::operations::confirm_hold;
use slotlock::{BlockId, ConfirmOutcome};

/// Confirm a hold into a firm booking.
#[derive(Args)]
pub struct ConfirmCommand {
    /// Hold identifier (as printed by `hold`)
    #[arg(long, value_name = "ID")]
    pub hold: i64,

    /// Caller session identifier (must match the hold's creator)
    #[arg(long, value_name = "SESSION")]
    pub session: String,

    /// Booking reference to attach
    #[arg(long, value_name = "REF")]
    pub booking: String,
}

impl ConfirmCommand {
    /// Execute the confirm command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut db = open_database(global)?;

        let outcome = confirm_hold(
            &mut db,
            BlockId::from(self.hold),
            &self.session,
            &self.booking,
        )
        .map_err(CliError::from)?;

        match outcome {
            ConfirmOutcome::Confirmed(id) => {
                if !global.quiet {
                    println!("Confirmed hold {id} as booking {}", self.booking);
                }
                Ok(())
            }
            ConfirmOutcome::Rejected(reason) => Err(CliError::SemanticFailure(format!(
                "confirm rejected: {reason}"
            ))),
        }
    }
}
