//! Release command implementation.
//!
//! Releases a hold. Releasing is idempotent: a hold that is already
//! gone (released, swept, or confirmed) is reported, not an error.

use crate::error::CliError;
use crate::utils::{open_database, GlobalOptions};
use clap::Args;
use slotlock::operations::release_hold;
use slotlock::BlockId;

/// Release a hold.
#[derive(Args)]
pub struct ReleaseCommand {
    /// Hold identifier (as printed by `hold`)
    #[arg(long, value_name = "ID")]
    pub hold: i64,

    /// Caller session identifier (must match the hold's creator)
    #[arg(long, value_name = "SESSION")]
    pub session: String,
}

impl ReleaseCommand {
    /// Execute the release command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut db = open_database(global)?;

        let released = release_hold(&mut db, BlockId::from(self.hold), &self.session)
            .map_err(CliError::from)?;

        if !global.quiet {
            if released {
                println!("Released hold {}", self.hold);
            } else {
                println!("No matching hold {} (already released)", self.hold);
            }
        }
        Ok(())
    }
}
