//! Operator block registration planning and execution.
//!
//! Operators take resources out of service by registering maintenance,
//! blackout, or buffer blocks. These share the conflict semantics of a
//! hold - an occupied slot cannot be blocked - but carry no expiry and no
//! session; they stay until explicitly deleted.

use chrono::{NaiveDate, Utc};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::{BlockId, BlockKind, Conflict, Interval, ReservationBlock, ResourceId};

use super::executor::PlanExecutor;
use super::plan::{OperationPlan, PlanAction};

/// Options for registering an operator block.
#[derive(Debug, Clone)]
pub struct MaintenanceOptions {
    /// The resource to take out of service.
    pub resource_id: ResourceId,

    /// The calendar day the block applies to.
    pub date: NaiveDate,

    /// The time interval to block.
    pub interval: Interval,

    /// The block kind; must be one of the operator kinds
    /// (maintenance, blackout, buffer).
    pub kind: BlockKind,

    /// Optional free-text annotation shown in schedules.
    pub notes: Option<String>,
}

impl MaintenanceOptions {
    /// Creates options for a maintenance block.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use slotlock::operations::MaintenanceOptions;
    /// use slotlock::{BlockKind, ResourceId};
    ///
    /// let options = MaintenanceOptions::new(
    ///     ResourceId::new("van-07").unwrap(),
    ///     NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
    ///     "09:00-17:00".parse().unwrap(),
    /// );
    /// assert_eq!(options.kind, BlockKind::Maintenance);
    /// ```
    #[must_use]
    pub const fn new(resource_id: ResourceId, date: NaiveDate, interval: Interval) -> Self {
        Self {
            resource_id,
            date,
            interval,
            kind: BlockKind::Maintenance,
            notes: None,
        }
    }

    /// Sets the block kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: BlockKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the operator notes.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}

/// Outcome of an operator block registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The block was registered.
    Registered(BlockId),
    /// An active block already covers part of the requested interval.
    Conflict(Conflict),
}

/// A registration plan generator.
///
/// This struct is responsible for analyzing a registration request and
/// generating a plan that describes what actions to take.
pub struct MaintenancePlan {
    options: MaintenanceOptions,
}

impl MaintenancePlan {
    /// Creates a new registration plan with the given options.
    #[must_use]
    pub const fn new(options: MaintenanceOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this registration request.
    ///
    /// This method validates the request and performs an advisory conflict
    /// check so dry-run previews can warn about occupied slots. It does
    /// NOT modify the database; the authoritative conflict check happens
    /// inside the execution transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is not an operator kind, or if the
    /// block fails field validation.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let mut plan = OperationPlan::new(format!(
            "Register {} block on {} {}",
            self.options.kind, self.options.resource_id, self.options.date
        ));

        if !self.options.kind.is_operator_kind() {
            return Err(Error::Validation {
                field: "kind".into(),
                message: format!(
                    "operators may only register maintenance, blackout, or buffer blocks, not {}",
                    self.options.kind
                ),
            });
        }

        let block = ReservationBlock::builder(
            self.options.resource_id.clone(),
            self.options.date,
            self.options.interval,
            self.options.kind,
        )
        .notes(self.options.notes.clone())
        .build()?;

        // Advisory only: the state may change before execution.
        if Database::has_active_overlap(
            db.connection(),
            block.resource_id(),
            block.date(),
            block.interval(),
            Utc::now(),
        )? {
            plan = plan.add_warning(format!(
                "slot {} on {} {} is currently occupied; registration will fail unless it frees up",
                self.options.interval, self.options.resource_id, self.options.date
            ));
        }

        plan = plan.add_action(PlanAction::CreateBlock(block));

        Ok(plan)
    }
}

/// Registers an operator block, planning and executing in one step.
///
/// # Errors
///
/// Returns an error for invalid input or storage failures. An occupied
/// slot is reported as [`RegisterOutcome::Conflict`], not an error.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use slotlock::database::{Database, DatabaseConfig};
/// use slotlock::operations::{register_block, MaintenanceOptions, RegisterOutcome};
/// use slotlock::ResourceId;
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/slotlock.db")).unwrap();
///
/// let options = MaintenanceOptions::new(
///     ResourceId::new("van-07").unwrap(),
///     NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
///     "09:00-17:00".parse().unwrap(),
/// )
/// .with_notes(Some("annual inspection".to_string()));
///
/// match register_block(&mut db, &options).unwrap() {
///     RegisterOutcome::Registered(id) => println!("registered block {id}"),
///     RegisterOutcome::Conflict(conflict) => println!("{conflict}"),
/// }
/// ```
pub fn register_block(db: &mut Database, options: &MaintenanceOptions) -> Result<RegisterOutcome> {
    let plan = MaintenancePlan::new(options.clone()).build_plan(db)?;
    let result = PlanExecutor::new(db).execute(&plan)?;

    if let Some(conflict) = result.conflict {
        return Ok(RegisterOutcome::Conflict(conflict));
    }
    result.block_id.map(RegisterOutcome::Registered).ok_or_else(|| {
        // A registration plan always carries exactly one CreateBlock action.
        Error::Validation {
            field: "plan".into(),
            message: "registration plan produced no block".into(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::create_test_database;

    fn options(interval: &str) -> MaintenanceOptions {
        MaintenanceOptions::new(
            ResourceId::new("van-07").unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            interval.parse().unwrap(),
        )
    }

    #[test]
    fn test_register_maintenance_block() {
        let mut db = create_test_database();

        let outcome = register_block(
            &mut db,
            &options("09:00-17:00").with_notes(Some("brake service".to_string())),
        )
        .unwrap();

        let RegisterOutcome::Registered(id) = outcome else {
            panic!("expected registration, got {outcome:?}");
        };
        let block = Database::get_block(db.connection(), id).unwrap().unwrap();
        assert_eq!(block.kind(), BlockKind::Maintenance);
        assert_eq!(block.notes(), Some("brake service"));
    }

    #[test]
    fn test_register_blackout_and_buffer() {
        let mut db = create_test_database();

        let blackout = options("00:00-24:00").with_kind(BlockKind::Blackout);
        assert!(matches!(
            register_block(&mut db, &blackout).unwrap(),
            RegisterOutcome::Registered(_)
        ));

        let buffer = MaintenanceOptions::new(
            ResourceId::new("van-08").unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            "12:00-12:30".parse().unwrap(),
        )
        .with_kind(BlockKind::Buffer);
        assert!(matches!(
            register_block(&mut db, &buffer).unwrap(),
            RegisterOutcome::Registered(_)
        ));
    }

    #[test]
    fn test_register_rejects_non_operator_kinds() {
        let db = create_test_database();

        for kind in [BlockKind::Hold, BlockKind::Booking] {
            let plan = MaintenancePlan::new(options("09:00-10:00").with_kind(kind));
            let err = plan.build_plan(&db).unwrap_err();
            assert!(matches!(err, Error::Validation { ref field, .. } if field == "kind"));
        }
    }

    #[test]
    fn test_register_conflicts_with_existing_block() {
        let mut db = create_test_database();
        register_block(&mut db, &options("09:00-17:00")).unwrap();

        let outcome = register_block(&mut db, &options("10:00-11:00")).unwrap();
        assert!(matches!(outcome, RegisterOutcome::Conflict(_)));
    }

    #[test]
    fn test_plan_warns_on_occupied_slot() {
        let mut db = create_test_database();
        register_block(&mut db, &options("09:00-17:00")).unwrap();

        let plan = MaintenancePlan::new(options("10:00-11:00"))
            .build_plan(&db)
            .unwrap();
        assert_eq!(plan.warnings.len(), 1);
        assert!(plan.warnings[0].contains("occupied"));
    }

    #[test]
    fn test_plan_on_free_slot_has_no_warnings() {
        let db = create_test_database();
        let plan = MaintenancePlan::new(options("10:00-11:00"))
            .build_plan(&db)
            .unwrap();
        assert!(plan.warnings.is_empty());
        assert_eq!(plan.len(), 1);
    }
}
