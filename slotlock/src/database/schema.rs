//! Database schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions, indices, and constants
//! related to the database schema for the slotlock reservation system.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
///
/// The metadata table stores key-value pairs for database configuration
/// and versioning information.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the blocks table.
///
/// One row per reservation block. Times are stored as minutes since
/// midnight, dates as ISO `YYYY-MM-DD` text, and timestamps as Unix epoch
/// seconds. The CHECK constraints enforce the structural invariants
/// (non-empty interval, holds always carry an expiry); the non-overlap
/// invariant is enforced transactionally by the insertion path, since it
/// involves the expiry-aware active predicate rather than simple column
/// uniqueness.
pub const CREATE_BLOCKS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS blocks (
        id INTEGER PRIMARY KEY,
        resource_id TEXT NOT NULL,
        date TEXT NOT NULL,
        start_minute INTEGER NOT NULL,
        end_minute INTEGER NOT NULL,
        kind TEXT NOT NULL,
        booking_ref TEXT,
        hold_expires_at INTEGER,
        held_by_session TEXT,
        notes TEXT,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        CHECK (start_minute < end_minute),
        CHECK (kind <> 'hold' OR hold_expires_at IS NOT NULL)
    )";

/// SQL statement to create the index over `(resource_id, date)`.
///
/// Every conflict check and day listing is keyed by this pair.
pub const CREATE_RESOURCE_DAY_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_blocks_resource_day
    ON blocks(resource_id, date)";

/// SQL statement to create the partial index over expiring holds.
///
/// Only hold rows carry an expiry, so the index is restricted to them.
/// This keeps the sweep scan cheap regardless of how many firm blocks
/// accumulate.
pub const CREATE_HOLD_EXPIRY_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_blocks_hold_expiry
    ON blocks(hold_expires_at) WHERE kind = 'hold'";

/// SQL statement to create the partial index over booking references.
///
/// Speeds up cascade deletion when a booking is cancelled.
pub const CREATE_BOOKING_REF_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_blocks_booking_ref
    ON blocks(booking_ref) WHERE booking_ref IS NOT NULL";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// SQL statement to insert a block.
///
/// Used by both single and batch insertion; the id column is left to
/// SQLite so the rowid becomes the block identifier.
pub const INSERT_BLOCK: &str = r"
    INSERT INTO blocks
    (resource_id, date, start_minute, end_minute, kind, booking_ref,
     hold_expires_at, held_by_session, notes, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

/// SQL statement to delete a block by id.
pub const DELETE_BLOCK: &str = "DELETE FROM blocks WHERE id = ?";
