//! Advisory availability queries.
//!
//! These are the read-only checks callers use for fast feedback before
//! attempting a hold. They apply the same active-overlap predicate as the
//! reservation path but run outside its transaction, so they are
//! *advisory*: a slot reported free can be taken by the time the caller
//! acts. Only the outcome of [`crate::operations::create_hold`] (or
//! [`crate::database::Database::try_insert_block`]) is authoritative.

use chrono::{NaiveDate, Utc};

use crate::database::Database;
use crate::error::Result;
use crate::{Interval, ReservationBlock, ResourceId};

/// Checks whether a resource is free for an interval on a day.
///
/// A `true` answer never guarantees that a subsequent hold will succeed;
/// callers must always treat a hold failure as authoritative.
///
/// # Errors
///
/// Returns an error if the query fails.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use slotlock::database::{Database, DatabaseConfig};
/// use slotlock::operations::is_available;
/// use slotlock::ResourceId;
///
/// let db = Database::open(DatabaseConfig::new("/tmp/slotlock.db")).unwrap();
///
/// let free = is_available(
///     &db,
///     &ResourceId::new("van-07").unwrap(),
///     NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
///     "10:00-12:00".parse().unwrap(),
/// )
/// .unwrap();
/// println!("free: {free}");
/// ```
pub fn is_available(
    db: &Database,
    resource_id: &ResourceId,
    date: NaiveDate,
    interval: Interval,
) -> Result<bool> {
    Ok(!Database::has_active_overlap(
        db.connection(),
        resource_id,
        date,
        interval,
        Utc::now(),
    )?)
}

/// Returns the active blocks for a resource on a day, ordered by start.
///
/// Expired-but-unswept holds are filtered out, so this is the schedule as
/// callers experience it.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn day_schedule(
    db: &Database,
    resource_id: &ResourceId,
    date: NaiveDate,
) -> Result<Vec<ReservationBlock>> {
    Database::list_active_blocks_for_day(db.connection(), resource_id, date, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, hold_block, maintenance_block};
    use crate::BlockKind;
    use chrono::Duration;

    fn resource() -> ResourceId {
        ResourceId::new("van-07").unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
    }

    #[test]
    fn test_empty_day_is_available() {
        let db = create_test_database();
        assert!(is_available(&db, &resource(), date(), "10:00-12:00".parse().unwrap()).unwrap());
    }

    #[test]
    fn test_occupied_slot_is_unavailable() {
        let mut db = create_test_database();
        db.try_insert_block(&maintenance_block("van-07", "2026-05-01", "09:00-17:00"))
            .unwrap();

        assert!(!is_available(&db, &resource(), date(), "10:00-11:00".parse().unwrap()).unwrap());
        // Outside the maintenance window the day is free.
        assert!(is_available(&db, &resource(), date(), "17:00-18:00".parse().unwrap()).unwrap());
    }

    #[test]
    fn test_expired_hold_reads_as_available() {
        let mut db = create_test_database();
        db.try_insert_block(&hold_block(
            "van-07",
            "2026-05-01",
            "10:00-12:00",
            "s1",
            Utc::now() - Duration::seconds(10),
        ))
        .unwrap();

        assert!(is_available(&db, &resource(), date(), "10:00-12:00".parse().unwrap()).unwrap());
    }

    #[test]
    fn test_day_schedule_orders_and_filters() {
        let mut db = create_test_database();
        let now = Utc::now();
        db.try_insert_block(&maintenance_block("van-07", "2026-05-01", "15:00-16:00"))
            .unwrap();
        db.try_insert_block(&hold_block(
            "van-07",
            "2026-05-01",
            "08:00-09:00",
            "s1",
            now + Duration::minutes(15),
        ))
        .unwrap();
        db.try_insert_block(&hold_block(
            "van-07",
            "2026-05-01",
            "10:00-11:00",
            "s2",
            now - Duration::seconds(10),
        ))
        .unwrap();

        let schedule = day_schedule(&db, &resource(), date()).unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].kind(), BlockKind::Hold);
        assert_eq!(schedule[1].kind(), BlockKind::Maintenance);
    }
}
