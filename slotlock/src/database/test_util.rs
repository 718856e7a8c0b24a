//! Shared test utilities for database unit tests.
//!
//! This module provides helper functions used across multiple database
//! test modules.

use chrono::{DateTime, NaiveDate, Utc};
use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::{BlockKind, Interval, ReservationBlock, ResourceId};

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
/// This is acceptable in test code where we want to fail fast.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let config = DatabaseConfig::new(path);
    let db = Database::open(config).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Creates a maintenance block for the given resource, day, and interval.
///
/// # Panics
///
/// Panics on invalid input. This is acceptable in test code where we want
/// to fail fast.
#[must_use]
pub fn maintenance_block(resource: &str, date: &str, interval: &str) -> ReservationBlock {
    let resource = ResourceId::new(resource).unwrap();
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    let interval: Interval = interval.parse().unwrap();
    ReservationBlock::builder(resource, date, interval, BlockKind::Maintenance)
        .build()
        .unwrap()
}

/// Creates a hold block with the given session and expiry.
///
/// # Panics
///
/// Panics on invalid input. This is acceptable in test code where we want
/// to fail fast.
#[must_use]
pub fn hold_block(
    resource: &str,
    date: &str,
    interval: &str,
    session: &str,
    expires_at: DateTime<Utc>,
) -> ReservationBlock {
    let resource = ResourceId::new(resource).unwrap();
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    let interval: Interval = interval.parse().unwrap();
    ReservationBlock::builder(resource, date, interval, BlockKind::Hold)
        .hold_expires_at(Some(expires_at))
        .held_by_session(Some(session.to_string()))
        .build()
        .unwrap()
}
