//! Database layer for persistent storage of reservation blocks.
//!
//! This module provides a SQLite-based storage layer for reservation
//! blocks, including connection management, schema versioning, the atomic
//! conflict-checked insertion path, and batch helpers.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use slotlock::database::{Database, DatabaseConfig};
//! use slotlock::{BlockKind, InsertOutcome, ReservationBlock, ResourceId};
//!
//! // Open a database
//! let config = DatabaseConfig::new("/tmp/slotlock.db");
//! let mut db = Database::open(config).unwrap();
//!
//! // Register a maintenance window
//! let resource = ResourceId::new("van-07").unwrap();
//! let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
//! let block = ReservationBlock::builder(resource, date, "09:00-17:00".parse().unwrap(),
//!     BlockKind::Maintenance).build().unwrap();
//!
//! match db.try_insert_block(&block).unwrap() {
//!     InsertOutcome::Inserted(id) => println!("registered block {id}"),
//!     InsertOutcome::Conflict(conflict) => println!("{conflict}"),
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export public API
pub use config::{default_data_dir, resolve_database_path, DatabaseConfig};
pub use connection::Database;
pub use operations::{Conflict, ConfirmOutcome, InsertOutcome, RejectReason};
pub use transaction::BatchInsertOutcome;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
