//! Plan execution engine.
//!
//! This module implements the executor that takes operation plans and
//! applies them to the database. Plan building only reads; every write in
//! a plan goes through the database layer's atomic operations, so the
//! non-overlap invariant holds even when the database changed between
//! planning and execution.

use crate::database::{Conflict, Database, InsertOutcome};
use crate::error::Result;
use crate::BlockId;

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
///
/// This struct provides information about what happened during execution,
/// including whether it was a dry run and what actions were taken.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution applied every action.
    ///
    /// `false` means a conflict halted the plan; see [`Self::conflict`].
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The identifier of the block created by the plan, if any.
    pub block_id: Option<BlockId>,

    /// The conflict that halted the plan, if any.
    ///
    /// A conflict is the expected outcome of contention, not a failure of
    /// the executor; callers should surface it as "pick another time".
    pub conflict: Option<Conflict>,
}

impl ExecutionResult {
    fn new(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            block_id: None,
            conflict: None,
        }
    }
}

/// Executes operation plans against the database.
///
/// The executor can run in normal mode (applying changes) or dry-run mode
/// (reporting without changes).
///
/// # Examples
///
/// ```no_run
/// use slotlock::database::{Database, DatabaseConfig};
/// use slotlock::operations::{MaintenanceOptions, MaintenancePlan, PlanExecutor};
/// use slotlock::ResourceId;
/// use chrono::NaiveDate;
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/slotlock.db")).unwrap();
///
/// let options = MaintenanceOptions::new(
///     ResourceId::new("van-07").unwrap(),
///     NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
///     "09:00-17:00".parse().unwrap(),
/// );
/// let plan = MaintenancePlan::new(options).build_plan(&db).unwrap();
///
/// // Preview without writing
/// let preview = PlanExecutor::new(&mut db).dry_run().execute(&plan).unwrap();
/// assert!(preview.dry_run);
///
/// // Apply for real
/// let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
/// if let Some(conflict) = result.conflict {
///     println!("slot not free: {conflict}");
/// }
/// ```
pub struct PlanExecutor<'a> {
    db: &'a mut Database,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub fn new(db: &'a mut Database) -> Self {
        Self { db, dry_run: false }
    }

    /// Sets the executor to dry-run mode.
    ///
    /// In dry-run mode, the executor reports the plan but does not modify
    /// the database.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// If in dry-run mode, reports the plan without database changes.
    /// Otherwise, applies the actions in order. A conflict on a
    /// `CreateBlock` action halts the plan: `success` is set to `false`
    /// and the conflict is carried in the result for the caller to
    /// surface.
    ///
    /// # Errors
    ///
    /// Returns an error if an action fails for infrastructure reasons
    /// (storage failure, lock timeout). Contention never produces an
    /// error.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new(plan, self.dry_run);
        if self.dry_run {
            return Ok(result);
        }

        for action in &plan.actions {
            match action {
                PlanAction::CreateBlock(block) => match self.db.try_insert_block(block)? {
                    InsertOutcome::Inserted(id) => result.block_id = Some(id),
                    InsertOutcome::Conflict(conflict) => {
                        result.success = false;
                        result.conflict = Some(conflict);
                        return Ok(result);
                    }
                },
                PlanAction::DeleteBlock(id) => {
                    self.db.delete_block(*id)?;
                }
                PlanAction::CancelBooking(booking_ref) => {
                    self.db.delete_booking_blocks(booking_ref)?;
                }
            }
        }

        Ok(result)
    }
}
