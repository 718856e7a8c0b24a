//! Reservation operations built on the atomic database layer.
//!
//! Two styles of operation live here:
//!
//! 1. **The hold protocol** ([`create_hold`] / [`confirm_hold`] /
//!    [`release_hold`]): the caller-facing checkout flow. These go
//!    straight to the database layer's atomic operations because the
//!    hold's TTL is stamped relative to the moment of insertion.
//! 2. **Plan-execute operations** (operator block registration, booking
//!    cancellation): planning reads and validates without writing, which
//!    enables dry-run previews; execution applies the plan through the
//!    same atomic operations, so a plan that raced another writer fails
//!    with a conflict outcome rather than a double booking.
//!
//! The [`Sweeper`] and the availability queries round out the surface:
//! background reclamation of expired holds, and advisory "is this slot
//! free" reads.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use slotlock::database::{Database, DatabaseConfig};
//! use slotlock::operations::{create_hold, confirm_hold, is_available, HoldOptions, HoldOutcome};
//! use slotlock::ResourceId;
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/slotlock.db")).unwrap();
//! let resource = ResourceId::new("van-07").unwrap();
//! let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
//! let interval = "10:00-12:00".parse().unwrap();
//!
//! // Advisory probe, then the authoritative hold attempt
//! if is_available(&db, &resource, date, interval).unwrap() {
//!     let options = HoldOptions::new(resource, date, interval, "session-123");
//!     if let HoldOutcome::Created { id, .. } = create_hold(&mut db, &options).unwrap() {
//!         // ... external booking and payment succeed ...
//!         confirm_hold(&mut db, id, "session-123", "BK-100").unwrap();
//!     }
//! }
//! ```

pub mod availability;
pub mod executor;
pub mod hold;
pub mod maintenance;
pub mod plan;
pub mod release;
pub mod sweep;

pub use availability::{day_schedule, is_available};
pub use executor::{ExecutionResult, PlanExecutor};
pub use hold::{
    confirm_hold, create_hold, release_hold, HoldOptions, HoldOutcome, DEFAULT_HOLD_TTL_MINUTES,
};
pub use maintenance::{register_block, MaintenanceOptions, MaintenancePlan, RegisterOutcome};
pub use plan::{OperationPlan, PlanAction};
pub use release::{cancel_booking, CancellationOptions, CancellationPlan};
pub use sweep::{SweepOperations, SweepResult, Sweeper, DEFAULT_SWEEP_INTERVAL};
