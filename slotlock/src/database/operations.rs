//! Database operations for reservation blocks.
//!
//! This module implements the storage operations for blocks, including the
//! atomic check-then-insert that prevents double booking. Every mutating
//! operation runs inside an IMMEDIATE transaction: SQLite grants the write
//! lock at `BEGIN`, so concurrent reservation attempts - from other
//! threads or other processes sharing the database file - are serialized
//! and exactly one of two overlapping attempts can commit.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, TransactionBehavior};

use crate::block::{BlockId, BlockKind, ReservationBlock, ResourceId};
use crate::error::{Error, Result};
use crate::Interval;

use super::connection::Database;
use super::schema::{DELETE_BLOCK, INSERT_BLOCK};

/// Converts Unix epoch seconds from the database to a UTC timestamp.
pub(super) fn unix_secs_to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Maps a busy-timeout failure to the retryable [`Error::LockTimeout`],
/// passing every other database error through unchanged.
fn map_contention(err: rusqlite::Error, waited_secs: u64) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::DatabaseBusy => {
            Error::LockTimeout {
                seconds: waited_secs,
            }
        }
        other => Error::Database(other),
    }
}

/// Helper function to deserialize a block from a database row.
///
/// Expects row fields in this order: id, `resource_id`, date,
/// `start_minute`, `end_minute`, kind, `booking_ref`, `hold_expires_at`,
/// `held_by_session`, notes, `created_at`, `updated_at`.
fn row_to_block(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReservationBlock> {
    let conversion =
        |e: Box<dyn std::error::Error + Send + Sync>| rusqlite::Error::ToSqlConversionFailure(e);

    let id: i64 = row.get(0)?;
    let resource: String = row.get(1)?;
    let date: String = row.get(2)?;
    let start_minute: u16 = row.get(3)?;
    let end_minute: u16 = row.get(4)?;
    let kind: String = row.get(5)?;
    let booking_ref: Option<String> = row.get(6)?;
    let hold_expires_secs: Option<i64> = row.get(7)?;
    let held_by_session: Option<String> = row.get(8)?;
    let notes: Option<String> = row.get(9)?;
    let created_secs: i64 = row.get(10)?;
    let updated_secs: i64 = row.get(11)?;

    let resource_id = ResourceId::new(resource).map_err(|e| conversion(Box::new(e)))?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| conversion(Box::new(e)))?;
    let start = crate::TimeOfDay::try_from(start_minute).map_err(|e| conversion(Box::new(e)))?;
    let end = crate::TimeOfDay::try_from(end_minute).map_err(|e| conversion(Box::new(e)))?;
    let interval = Interval::new(start, end).map_err(|e| conversion(Box::new(e)))?;
    let kind: BlockKind = kind.parse().map_err(|e| conversion(Box::new(e)))?;

    ReservationBlock::builder(resource_id, date, interval, kind)
        .id(BlockId::from(id))
        .booking_ref(booking_ref)
        .hold_expires_at(hold_expires_secs.map(unix_secs_to_datetime))
        .held_by_session(held_by_session)
        .notes(notes)
        .created_at(unix_secs_to_datetime(created_secs))
        .updated_at(unix_secs_to_datetime(updated_secs))
        .build()
        .map_err(|e| conversion(Box::new(e)))
}

fn date_to_sql(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// SQL statements for block operations

const SELECT_BLOCK_BY_ID: &str = r"
    SELECT id, resource_id, date, start_minute, end_minute, kind,
           booking_ref, hold_expires_at, held_by_session, notes, created_at, updated_at
    FROM blocks
    WHERE id = ?
";

const SELECT_ACTIVE_CONFLICT: &str = r"
    SELECT id, resource_id, date, start_minute, end_minute, kind,
           booking_ref, hold_expires_at, held_by_session, notes, created_at, updated_at
    FROM blocks
    WHERE resource_id = ?1 AND date = ?2
      AND start_minute < ?3 AND end_minute > ?4
      AND (kind <> 'hold' OR hold_expires_at > ?5)
    ORDER BY start_minute
    LIMIT 1
";

const CONFIRM_HOLD: &str = r"
    UPDATE blocks
    SET kind = 'booking', booking_ref = ?2,
        hold_expires_at = NULL, held_by_session = NULL, updated_at = ?3
    WHERE id = ?1
";

const DELETE_OWNED_HOLD: &str = r"
    DELETE FROM blocks
    WHERE id = ?1 AND kind = 'hold' AND held_by_session = ?2
";

const SELECT_EXPIRED_HOLDS: &str = r"
    SELECT id, resource_id, date, start_minute, end_minute, kind,
           booking_ref, hold_expires_at, held_by_session, notes, created_at, updated_at
    FROM blocks
    WHERE kind = 'hold' AND hold_expires_at <= ?
    ORDER BY hold_expires_at
";

const DELETE_EXPIRED_HOLDS: &str = r"
    DELETE FROM blocks
    WHERE kind = 'hold' AND hold_expires_at <= ?
";

const COUNT_BOOKING_BLOCKS: &str = r"
    SELECT COUNT(*) FROM blocks WHERE kind = 'booking' AND booking_ref = ?
";

const DELETE_BOOKING_BLOCKS: &str = r"
    DELETE FROM blocks WHERE kind = 'booking' AND booking_ref = ?
";

const LIST_DAY: &str = r"
    SELECT id, resource_id, date, start_minute, end_minute, kind,
           booking_ref, hold_expires_at, held_by_session, notes, created_at, updated_at
    FROM blocks
    WHERE resource_id = ?1 AND date = ?2
    ORDER BY start_minute, end_minute
";

const LIST_ACTIVE_DAY: &str = r"
    SELECT id, resource_id, date, start_minute, end_minute, kind,
           booking_ref, hold_expires_at, held_by_session, notes, created_at, updated_at
    FROM blocks
    WHERE resource_id = ?1 AND date = ?2
      AND (kind <> 'hold' OR hold_expires_at > ?3)
    ORDER BY start_minute, end_minute
";

const LIST_RESOURCES: &str = r"
    SELECT DISTINCT resource_id FROM blocks ORDER BY resource_id
";

/// Details of the active block that defeated a reservation attempt.
///
/// The payload identifies the blocking interval and kind so callers can
/// render an accurate message ("under maintenance until 17:00" vs
/// "temporarily held"); it deliberately never exposes the holding
/// session's identity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Conflict {
    /// The kind of the blocking block.
    pub kind: BlockKind,
    /// The interval the blocking block occupies.
    pub interval: Interval,
    /// When the blocking hold lapses, if the blocker is a hold.
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&ReservationBlock> for Conflict {
    fn from(block: &ReservationBlock) -> Self {
        Self {
            kind: block.kind(),
            interval: block.interval(),
            expires_at: block.hold_expires_at(),
        }
    }
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot taken by {} block {}", self.kind, self.interval)
    }
}

/// Outcome of an atomic block insertion attempt.
///
/// A conflict is an expected result of contention, not an error; callers
/// should offer another slot rather than report a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The block was inserted and assigned this identifier.
    Inserted(BlockId),
    /// An active block already covers part of the requested interval.
    Conflict(Conflict),
}

/// Reason a confirm attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The hold's expiry has passed.
    Expired,
    /// The hold belongs to a different session.
    WrongSession,
    /// No hold with that identifier exists (released, swept, or already
    /// promoted).
    NotFound,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "expired"),
            Self::WrongSession => write!(f, "wrong_session"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}

/// Outcome of a confirm attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The hold was promoted in place to a booking block.
    Confirmed(BlockId),
    /// The hold could not be confirmed for the given reason.
    Rejected(RejectReason),
}

impl Database {
    /// Atomically checks for conflicts and inserts a block.
    ///
    /// This is the linearization point for all reservations: the overlap
    /// check and the insert run inside one IMMEDIATE transaction, so for
    /// any two concurrent attempts with overlapping intervals on the same
    /// `(resource, date)` at most one can succeed. The conflict predicate
    /// ignores expired holds, so an abandoned checkout never blocks a new
    /// reservation even before the sweeper removes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or committed.
    /// Contention is *not* an error: a conflicting active block produces
    /// `Ok(InsertOutcome::Conflict(_))`, and failure to acquire the write
    /// lock within the busy timeout produces the retryable
    /// [`Error::LockTimeout`].
    pub fn try_insert_block(&mut self, block: &ReservationBlock) -> Result<InsertOutcome> {
        let now = Utc::now();
        let waited = self.busy_timeout_secs();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| map_contention(e, waited))?;

        if let Some(existing) = Self::find_active_conflict(
            &tx,
            block.resource_id(),
            block.date(),
            block.interval(),
            now,
        )? {
            log::debug!(
                "reservation conflict on {} {}: requested {}, taken by block {:?}",
                block.resource_id(),
                block.date(),
                block.interval(),
                existing.id(),
            );
            // Dropping the transaction rolls it back; nothing was written.
            return Ok(InsertOutcome::Conflict(Conflict::from(&existing)));
        }

        let id = Self::insert_block_raw(&tx, block)?;
        tx.commit().map_err(|e| map_contention(e, waited))?;
        Ok(InsertOutcome::Inserted(id))
    }

    /// Inserts a block without any conflict check.
    ///
    /// Callers must have verified the non-overlap invariant within the
    /// same transaction; this is enforced by keeping the function private
    /// to the database layer.
    pub(super) fn insert_block_raw(conn: &Connection, block: &ReservationBlock) -> Result<BlockId> {
        conn.execute(
            INSERT_BLOCK,
            params![
                block.resource_id().as_str(),
                date_to_sql(block.date()),
                block.interval().start().minutes(),
                block.interval().end().minutes(),
                block.kind().as_str(),
                block.booking_ref(),
                block.hold_expires_at().map(|t| t.timestamp()),
                block.held_by_session(),
                block.notes(),
                block.created_at().timestamp(),
                block.updated_at().timestamp(),
            ],
        )?;
        Ok(BlockId::from(conn.last_insert_rowid()))
    }

    /// Finds the first active block overlapping the given interval.
    ///
    /// Applies the half-open overlap test together with the expiry
    /// carve-out: holds whose `hold_expires_at` is at or before `now` are
    /// invisible to this query even if they are still stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_active_conflict(
        conn: &Connection,
        resource_id: &ResourceId,
        date: NaiveDate,
        interval: Interval,
        now: DateTime<Utc>,
    ) -> Result<Option<ReservationBlock>> {
        let mut stmt = conn.prepare_cached(SELECT_ACTIVE_CONFLICT)?;
        let mut rows = stmt.query_map(
            params![
                resource_id.as_str(),
                date_to_sql(date),
                interval.end().minutes(),
                interval.start().minutes(),
                now.timestamp(),
            ],
            row_to_block,
        )?;

        match rows.next() {
            Some(Ok(block)) => Ok(Some(block)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Checks whether any active block overlaps the given interval.
    ///
    /// This is the advisory availability primitive: because it runs
    /// outside the reservation transaction, a `false` answer can be stale
    /// by the time the caller acts on it. Only [`Self::try_insert_block`]
    /// is authoritative.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_active_overlap(
        conn: &Connection,
        resource_id: &ResourceId,
        date: NaiveDate,
        interval: Interval,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(Self::find_active_conflict(conn, resource_id, date, interval, now)?.is_some())
    }

    /// Retrieves a block by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    ///
    /// # Returns
    ///
    /// - `Ok(Some(block))` if the block exists
    /// - `Ok(None)` if the block doesn't exist
    pub fn get_block(conn: &Connection, id: BlockId) -> Result<Option<ReservationBlock>> {
        let mut stmt = conn.prepare_cached(SELECT_BLOCK_BY_ID)?;
        let mut rows = stmt.query_map(params![id.value()], row_to_block)?;

        match rows.next() {
            Some(Ok(block)) => Ok(Some(block)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Atomically promotes a hold to a booking.
    ///
    /// The ownership, liveness, and existence checks run inside the same
    /// IMMEDIATE transaction as the mutation, so a concurrent sweep or a
    /// racing confirm from another session cannot interleave. The hold row
    /// is mutated in place rather than deleted and reinserted: there is no
    /// window in which the slot appears free.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or committed.
    /// All protocol failures are reported as `Rejected` outcomes, not
    /// errors.
    pub fn confirm_hold(
        &mut self,
        id: BlockId,
        session_id: &str,
        booking_ref: &str,
        now: DateTime<Utc>,
    ) -> Result<ConfirmOutcome> {
        let waited = self.busy_timeout_secs();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| map_contention(e, waited))?;

        let Some(block) = Self::get_block(&tx, id)? else {
            return Ok(ConfirmOutcome::Rejected(RejectReason::NotFound));
        };
        if block.kind() != BlockKind::Hold {
            // Already promoted (or never a hold): the caller's hold is gone.
            return Ok(ConfirmOutcome::Rejected(RejectReason::NotFound));
        }
        if block.held_by_session() != Some(session_id) {
            return Ok(ConfirmOutcome::Rejected(RejectReason::WrongSession));
        }
        if !block.is_active(now) {
            return Ok(ConfirmOutcome::Rejected(RejectReason::Expired));
        }

        tx.execute(
            CONFIRM_HOLD,
            params![id.value(), booking_ref, now.timestamp()],
        )?;
        tx.commit().map_err(|e| map_contention(e, waited))?;
        Ok(ConfirmOutcome::Confirmed(id))
    }

    /// Deletes a hold if it is owned by the given session.
    ///
    /// Idempotent: releasing a hold that was already released, swept, or
    /// promoted deletes nothing and is not an error. A hold owned by a
    /// different session is likewise left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or delete fails.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if a hold was deleted
    /// - `Ok(false)` if nothing matched
    pub fn release_hold(&mut self, id: BlockId, session_id: &str) -> Result<bool> {
        let waited = self.busy_timeout_secs();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| map_contention(e, waited))?;

        let rows_affected = tx.execute(DELETE_OWNED_HOLD, params![id.value(), session_id])?;

        tx.commit().map_err(|e| map_contention(e, waited))?;
        Ok(rows_affected > 0)
    }

    /// Deletes a block by id, regardless of kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or delete fails.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the block was found and deleted
    /// - `Ok(false)` if the block was not found
    pub fn delete_block(&mut self, id: BlockId) -> Result<bool> {
        let waited = self.busy_timeout_secs();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| map_contention(e, waited))?;

        let rows_affected = tx.execute(DELETE_BLOCK, params![id.value()])?;

        tx.commit().map_err(|e| map_contention(e, waited))?;
        Ok(rows_affected > 0)
    }

    /// Finds holds whose expiry is at or before `now`.
    ///
    /// These rows are already inert for conflict purposes; this query only
    /// exists so the sweeper (and its dry-run) can report what it removes.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_expired_holds(
        conn: &Connection,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReservationBlock>> {
        let mut stmt = conn.prepare_cached(SELECT_EXPIRED_HOLDS)?;
        let blocks = stmt
            .query_map(params![now.timestamp()], row_to_block)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(blocks)
    }

    /// Deletes all holds whose expiry is at or before `now`.
    ///
    /// Safe to run concurrently with every other operation: it deletes
    /// only rows that the active-overlap predicate already ignores, so it
    /// can never free a slot that was not already free.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or delete fails.
    ///
    /// # Returns
    ///
    /// The blocks that were removed.
    pub fn delete_expired_holds(&mut self, now: DateTime<Utc>) -> Result<Vec<ReservationBlock>> {
        let waited = self.busy_timeout_secs();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| map_contention(e, waited))?;

        let removed = {
            let mut stmt = tx.prepare_cached(SELECT_EXPIRED_HOLDS)?;
            let rows = stmt
                .query_map(params![now.timestamp()], row_to_block)?
                .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
            rows
        };
        tx.execute(DELETE_EXPIRED_HOLDS, params![now.timestamp()])?;

        tx.commit().map_err(|e| map_contention(e, waited))?;
        Ok(removed)
    }

    /// Counts booking blocks referencing the given booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_booking_blocks(conn: &Connection, booking_ref: &str) -> Result<usize> {
        let count: i64 = conn.query_row(COUNT_BOOKING_BLOCKS, params![booking_ref], |row| {
            row.get(0)
        })?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Deletes every booking block referencing the given booking.
    ///
    /// Called by the external cancellation workflow when a booking is
    /// cancelled; only `booking`-kind blocks are touched. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or delete fails.
    ///
    /// # Returns
    ///
    /// The number of blocks deleted.
    pub fn delete_booking_blocks(&mut self, booking_ref: &str) -> Result<usize> {
        let waited = self.busy_timeout_secs();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| map_contention(e, waited))?;

        let rows_affected = tx.execute(DELETE_BOOKING_BLOCKS, params![booking_ref])?;

        tx.commit().map_err(|e| map_contention(e, waited))?;
        Ok(rows_affected)
    }

    /// Lists all blocks for a resource on a day, inert holds included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be
    /// deserialized.
    pub fn list_blocks_for_day(
        conn: &Connection,
        resource_id: &ResourceId,
        date: NaiveDate,
    ) -> Result<Vec<ReservationBlock>> {
        let mut stmt = conn.prepare_cached(LIST_DAY)?;
        let blocks = stmt
            .query_map(params![resource_id.as_str(), date_to_sql(date)], row_to_block)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(blocks)
    }

    /// Lists the active blocks for a resource on a day.
    ///
    /// Expired-but-unswept holds are filtered out by the same predicate
    /// the conflict check uses.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be
    /// deserialized.
    pub fn list_active_blocks_for_day(
        conn: &Connection,
        resource_id: &ResourceId,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReservationBlock>> {
        let mut stmt = conn.prepare_cached(LIST_ACTIVE_DAY)?;
        let blocks = stmt
            .query_map(
                params![resource_id.as_str(), date_to_sql(date), now.timestamp()],
                row_to_block,
            )?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(blocks)
    }

    /// Lists all resources that have at least one block.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_resources(conn: &Connection) -> Result<Vec<ResourceId>> {
        let mut stmt = conn.prepare(LIST_RESOURCES)?;
        let resources = stmt
            .query_map([], |row| {
                let value: String = row.get(0)?;
                ResourceId::new(value)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
            })?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(resources)
    }

    /// Counts all stored blocks, inert holds included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_blocks(conn: &Connection) -> Result<usize> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM blocks", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Verifies database integrity using PRAGMA `integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns an error if the integrity check fails or detects
    /// corruption.
    pub fn verify_integrity(&mut self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption {
                details: format!("integrity check failed: {result}"),
            })
        }
    }
}
