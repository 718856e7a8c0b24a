//! Shared helpers for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use slotlock::database::{Database, DatabaseConfig};
use slotlock::{Interval, ResourceId};
use tempfile::TempDir;

/// Creates a temp directory and a database config pointing into it.
///
/// The directory must be kept alive for the duration of the test.
pub fn temp_config() -> (TempDir, DatabaseConfig) {
    let dir = TempDir::new().unwrap();
    let config = DatabaseConfig::new(dir.path().join("slotlock.db"));
    (dir, config)
}

/// Opens a fresh database in a temp directory.
pub fn temp_database() -> (TempDir, Database) {
    let (dir, config) = temp_config();
    let db = Database::open(config).unwrap();
    (dir, db)
}

pub fn resource(name: &str) -> ResourceId {
    ResourceId::new(name).unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn interval(s: &str) -> Interval {
    s.parse().unwrap()
}
