//! Reclamation of expired holds.
//!
//! Sweeping is advisory housekeeping: the conflict predicate already
//! ignores expired holds, so correctness never depends on how promptly a
//! sweep runs. The sweeper exists to bound storage growth and keep day
//! scans cheap. A sweep pass deletes only rows matching the
//! deterministic, already-inert expired-hold predicate, which makes it
//! safe to run concurrently with every other operation - including
//! another sweep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;

use crate::database::{Database, DatabaseConfig};
use crate::{ReservationBlock, Result};

/// Default interval between background sweep passes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Result of a sweep pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepResult {
    /// Number of holds removed (or that would be removed in dry-run mode).
    pub removed_count: usize,
    /// The holds that were (or would be) removed.
    pub removed_blocks: Vec<ReservationBlock>,
}

/// Sweep operations for removing expired holds.
pub struct SweepOperations;

impl SweepOperations {
    /// Removes holds whose expiry has passed.
    ///
    /// # Arguments
    ///
    /// * `db` - Database to operate on
    /// * `dry_run` - If true, report what would be removed without
    ///   actually removing
    ///
    /// # Errors
    ///
    /// Returns an error if database operations fail.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use slotlock::database::{Database, DatabaseConfig};
    /// use slotlock::operations::SweepOperations;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/slotlock.db")).unwrap();
    ///
    /// // Preview what would be swept
    /// let preview = SweepOperations::sweep_expired(&mut db, true).unwrap();
    /// println!("would sweep {} holds", preview.removed_count);
    ///
    /// // Actually sweep
    /// let result = SweepOperations::sweep_expired(&mut db, false).unwrap();
    /// println!("swept {} holds", result.removed_count);
    /// ```
    pub fn sweep_expired(db: &mut Database, dry_run: bool) -> Result<SweepResult> {
        let now = Utc::now();

        let removed_blocks = if dry_run {
            Database::find_expired_holds(db.connection(), now)?
        } else {
            let removed = db.delete_expired_holds(now)?;
            if !removed.is_empty() {
                log::debug!("swept {} expired holds", removed.len());
            }
            removed
        };

        Ok(SweepResult {
            removed_count: removed_blocks.len(),
            removed_blocks,
        })
    }
}

/// A background thread running sweep passes on a fixed interval.
///
/// The sweeper owns its own database connection (WAL mode permits
/// concurrent connections), so it never contends with the caller's
/// connection beyond the ordinary write lock. Dropping the sweeper stops
/// the thread.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use slotlock::database::DatabaseConfig;
/// use slotlock::operations::Sweeper;
///
/// let config = DatabaseConfig::new("/tmp/slotlock.db");
/// let sweeper = Sweeper::spawn(config, Duration::from_secs(60)).unwrap();
///
/// // ... serve reservations ...
///
/// sweeper.stop();
/// ```
#[derive(Debug)]
pub struct Sweeper {
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawns a background sweeper with its own database connection.
    ///
    /// The first pass runs immediately; subsequent passes run every
    /// `interval`. A failing pass is logged and retried on the next tick,
    /// since expired holds are already inert and deletion can safely
    /// wait.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn spawn(config: DatabaseConfig, interval: Duration) -> Result<Self> {
        let mut db = Database::open(config)?;
        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_flag = Arc::clone(&stop_flag);

        let handle = thread::spawn(move || {
            while !thread_flag.load(Ordering::Relaxed) {
                match SweepOperations::sweep_expired(&mut db, false) {
                    Ok(result) if result.removed_count > 0 => {
                        log::debug!("background sweep removed {} holds", result.removed_count);
                    }
                    Ok(_) => {}
                    Err(e) => log::debug!("background sweep pass failed: {e}"),
                }
                thread::park_timeout(interval);
            }
        });

        Ok(Self {
            stop_flag,
            handle: Some(handle),
        })
    }

    /// Stops the sweeper and waits for the thread to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, hold_block, maintenance_block};
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_sweep_removes_only_expired_holds() {
        let mut db = create_test_database();
        let now = Utc::now();

        db.try_insert_block(&hold_block(
            "van-07",
            "2026-05-01",
            "10:00-12:00",
            "s1",
            now - ChronoDuration::seconds(10),
        ))
        .unwrap();
        db.try_insert_block(&hold_block(
            "van-07",
            "2026-05-01",
            "13:00-14:00",
            "s2",
            now + ChronoDuration::minutes(15),
        ))
        .unwrap();
        db.try_insert_block(&maintenance_block("van-07", "2026-05-01", "15:00-16:00"))
            .unwrap();

        let result = SweepOperations::sweep_expired(&mut db, false).unwrap();
        assert_eq!(result.removed_count, 1);
        assert_eq!(result.removed_blocks[0].held_by_session(), Some("s1"));

        assert_eq!(Database::count_blocks(db.connection()).unwrap(), 2);
    }

    #[test]
    fn test_sweep_empty_database() {
        let mut db = create_test_database();
        let result = SweepOperations::sweep_expired(&mut db, false).unwrap();
        assert_eq!(result.removed_count, 0);
        assert!(result.removed_blocks.is_empty());
    }

    #[test]
    fn test_sweep_dry_run_reports_without_deleting() {
        let mut db = create_test_database();
        db.try_insert_block(&hold_block(
            "van-07",
            "2026-05-01",
            "10:00-12:00",
            "s1",
            Utc::now() - ChronoDuration::seconds(10),
        ))
        .unwrap();

        let preview = SweepOperations::sweep_expired(&mut db, true).unwrap();
        assert_eq!(preview.removed_count, 1);
        assert_eq!(Database::count_blocks(db.connection()).unwrap(), 1);

        let result = SweepOperations::sweep_expired(&mut db, false).unwrap();
        assert_eq!(result.removed_count, 1);
        assert_eq!(Database::count_blocks(db.connection()).unwrap(), 0);
    }

    #[test]
    fn test_sweep_is_repeatable() {
        let mut db = create_test_database();
        db.try_insert_block(&hold_block(
            "van-07",
            "2026-05-01",
            "10:00-12:00",
            "s1",
            Utc::now() - ChronoDuration::seconds(10),
        ))
        .unwrap();

        assert_eq!(
            SweepOperations::sweep_expired(&mut db, false)
                .unwrap()
                .removed_count,
            1
        );
        assert_eq!(
            SweepOperations::sweep_expired(&mut db, false)
                .unwrap()
                .removed_count,
            0
        );
    }

    #[test]
    fn test_background_sweeper_cleans_expired_holds() {
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let path = dir.path().join("sweep.db");

        let mut db = Database::open(DatabaseConfig::new(&path)).unwrap();
        db.try_insert_block(&hold_block(
            "van-07",
            "2026-05-01",
            "10:00-12:00",
            "s1",
            Utc::now() - ChronoDuration::seconds(10),
        ))
        .unwrap();

        let sweeper =
            Sweeper::spawn(DatabaseConfig::new(&path), Duration::from_millis(50)).unwrap();

        // Give the first pass time to run, then stop.
        std::thread::sleep(Duration::from_millis(300));
        sweeper.stop();

        assert_eq!(Database::count_blocks(db.connection()).unwrap(), 0);
    }
}
