//! Block command implementation.
//!
//! Registers an operator block (maintenance, blackout, or buffer) on a
//! resource. Supports dry-run previews through the plan layer.

use crate::error::CliError;
use crate::utils::{open_database, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use slotlock::operations::{MaintenanceOptions, MaintenancePlan, PlanExecutor};
use slotlock::{BlockKind, Interval, ResourceId};

/// Register a maintenance, blackout, or buffer block.
#[derive(Args)]
pub struct BlockCommand {
    /// Resource identifier (e.g. a vehicle)
    #[arg(long, value_name = "ID")]
    pub resource: ResourceId,

    /// Calendar day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: NaiveDate,

    /// Time slot (HH:MM-HH:MM)
    #[arg(long, value_name = "SLOT")]
    pub slot: Interval,

    /// Block kind: maintenance, blackout, or buffer
    #[arg(long, value_name = "KIND", default_value = "maintenance")]
    pub kind: BlockKind,

    /// Free-text annotation shown in schedules
    #[arg(long, value_name = "NOTES")]
    pub notes: Option<String>,

    /// Preview the registration without writing
    #[arg(long)]
    pub dry_run: bool,
}

impl BlockCommand {
    /// Execute the block command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut db = open_database(global)?;

        let options = MaintenanceOptions::new(self.resource, self.date, self.slot)
            .with_kind(self.kind)
            .with_notes(self.notes);
        let plan = MaintenancePlan::new(options)
            .build_plan(&db)
            .map_err(CliError::from)?;

        let mut executor = PlanExecutor::new(&mut db);
        if self.dry_run {
            executor = executor.dry_run();
        }
        let result = executor.execute(&plan).map_err(CliError::from)?;

        for warning in &result.warnings {
            eprintln!("Warning: {warning}");
        }

        if result.dry_run {
            for action in &result.actions_taken {
                println!("Would: {action}");
            }
            return Ok(());
        }

        if let Some(conflict) = result.conflict {
            return Err(CliError::SemanticFailure(format!(
                "cannot register block: {conflict}"
            )));
        }

        if let Some(id) = result.block_id {
            println!("{id}");
        }
        Ok(())
    }
}
