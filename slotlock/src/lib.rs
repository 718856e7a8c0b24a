#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # slotlock
//!
//! A library for managing exclusive time-slot reservations on fleet
//! resources.
//!
//! slotlock guards one invariant: for a given resource and calendar day,
//! no two *active* blocks may overlap. Every reservation - a customer
//! hold, a firm booking, an operator maintenance window - flows through
//! an atomic check-then-insert, so concurrent callers cannot double-book
//! a vehicle. Holds carry a time-to-live and become inert the instant it
//! lapses; a background sweeper reclaims the leftover rows.
//!
//! ## Core Types
//!
//! - [`TimeOfDay`] and [`Interval`]: half-open daily time ranges with
//!   validation and the overlap predicate
//! - [`ReservationBlock`], [`BlockKind`], [`ResourceId`], [`BlockId`]:
//!   the unit of allocation and its identifiers
//! - [`Error`] and [`Result`]: error handling types
//! - Outcome enums ([`InsertOutcome`], [`HoldOutcome`],
//!   [`ConfirmOutcome`]): expected contention results, distinct from
//!   errors
//!
//! ## The checkout protocol
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use slotlock::database::{Database, DatabaseConfig};
//! use slotlock::operations::{create_hold, confirm_hold, HoldOptions, HoldOutcome};
//! use slotlock::ResourceId;
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/slotlock.db")).unwrap();
//!
//! let options = HoldOptions::new(
//!     ResourceId::new("van-07").unwrap(),
//!     NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
//!     "10:00-12:00".parse().unwrap(),
//!     "session-123",
//! );
//!
//! match create_hold(&mut db, &options).unwrap() {
//!     HoldOutcome::Created { id, .. } => {
//!         // external booking + payment happen here, outside any lock
//!         confirm_hold(&mut db, id, "session-123", "BK-100").unwrap();
//!     }
//!     HoldOutcome::Unavailable(conflict) => {
//!         println!("pick another time: {conflict}");
//!     }
//! }
//! ```

pub mod block;
pub mod config;
pub mod database;
pub mod error;
pub mod interval;
pub mod logging;
pub mod operations;
pub mod output;

// Re-export key types at crate root for convenience
pub use block::{BlockBuilder, BlockId, BlockKind, ReservationBlock, ResourceId};
pub use config::{Config, ConfigBuilder, HoldConfig, SweepConfig};
pub use database::{
    Conflict, ConfirmOutcome, Database, DatabaseConfig, InsertOutcome, RejectReason,
};
pub use error::{Error, Result};
pub use interval::{Interval, TimeOfDay};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{HoldOptions, HoldOutcome, RegisterOutcome, SweepResult, Sweeper};
pub use output::OutputFormat;
