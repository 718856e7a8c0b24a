//! Batch transaction helpers for operator calendar imports.
//!
//! Operators registering a season of maintenance windows or blackouts
//! need all-or-nothing semantics: a partial import would leave the
//! calendar half-applied. These helpers run the whole batch inside a
//! single IMMEDIATE transaction, conflict-checking each block against
//! both the committed state and the earlier blocks of the same batch.

use chrono::Utc;
use rusqlite::TransactionBehavior;

use crate::block::{BlockId, ReservationBlock};
use crate::error::Result;

use super::connection::Database;
use super::operations::Conflict;

/// Outcome of a batch insertion attempt.
///
/// Mirrors [`crate::InsertOutcome`] at batch granularity: either every
/// block was inserted, or the first conflicting block aborted the whole
/// batch and nothing was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchInsertOutcome {
    /// All blocks were inserted, in input order.
    Inserted(Vec<BlockId>),
    /// The block at `index` conflicted; the transaction was rolled back.
    Conflict {
        /// Index into the input batch of the conflicting block.
        index: usize,
        /// Details of the active block that defeated it.
        conflict: Conflict,
    },
}

impl Database {
    /// Inserts a batch of blocks in a single transaction.
    ///
    /// Each block is checked against the active-overlap predicate before
    /// insertion. Because the checks run inside the transaction, a block
    /// later in the batch also conflicts with earlier blocks of the same
    /// batch - an operator cannot import a self-overlapping calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or committed,
    /// or if a statement fails. Conflicts are reported through the outcome,
    /// not as errors.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use chrono::NaiveDate;
    /// use slotlock::database::{BatchInsertOutcome, Database, DatabaseConfig};
    /// use slotlock::{BlockKind, ReservationBlock, ResourceId};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/slotlock.db")).unwrap();
    ///
    /// let resource = ResourceId::new("van-07").unwrap();
    /// let date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    /// let blocks = vec![
    ///     ReservationBlock::builder(resource.clone(), date, "08:00-10:00".parse().unwrap(),
    ///         BlockKind::Maintenance).build().unwrap(),
    ///     ReservationBlock::builder(resource, date, "10:00-12:00".parse().unwrap(),
    ///         BlockKind::Maintenance).build().unwrap(),
    /// ];
    ///
    /// match db.batch_insert_blocks(&blocks).unwrap() {
    ///     BatchInsertOutcome::Inserted(ids) => println!("imported {} blocks", ids.len()),
    ///     BatchInsertOutcome::Conflict { index, .. } => println!("block {index} conflicts"),
    /// }
    /// ```
    pub fn batch_insert_blocks(&mut self, blocks: &[ReservationBlock]) -> Result<BatchInsertOutcome> {
        let now = Utc::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut ids = Vec::with_capacity(blocks.len());
        for (index, block) in blocks.iter().enumerate() {
            if let Some(existing) = Self::find_active_conflict(
                &tx,
                block.resource_id(),
                block.date(),
                block.interval(),
                now,
            )? {
                // Dropping the transaction rolls back the earlier inserts.
                return Ok(BatchInsertOutcome::Conflict {
                    index,
                    conflict: Conflict::from(&existing),
                });
            }
            ids.push(Self::insert_block_raw(&tx, block)?);
        }

        tx.commit()?;
        Ok(BatchInsertOutcome::Inserted(ids))
    }

    /// Deletes multiple blocks in a single transaction.
    ///
    /// This operation is atomic - either all deletes are applied or none
    /// are. Returns the number of blocks actually deleted; missing ids are
    /// skipped silently.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or committed,
    /// or if a delete fails.
    pub fn batch_delete_blocks(&mut self, ids: &[BlockId]) -> Result<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut total_deleted = 0;
        {
            let mut stmt = tx.prepare(super::schema::DELETE_BLOCK)?;
            for id in ids {
                total_deleted += stmt.execute([id.value()])?;
            }
        }

        tx.commit()?;
        Ok(total_deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, maintenance_block};

    #[test]
    fn test_batch_insert_blocks() {
        let mut db = create_test_database();

        let blocks = vec![
            maintenance_block("van-07", "2026-07-01", "08:00-10:00"),
            maintenance_block("van-07", "2026-07-01", "10:00-12:00"),
            maintenance_block("van-08", "2026-07-01", "08:00-10:00"),
        ];

        let outcome = db.batch_insert_blocks(&blocks).unwrap();
        let BatchInsertOutcome::Inserted(ids) = outcome else {
            panic!("expected insertion, got {outcome:?}");
        };
        assert_eq!(ids.len(), 3);
        assert_eq!(Database::count_blocks(db.connection()).unwrap(), 3);
    }

    #[test]
    fn test_batch_insert_empty() {
        let mut db = create_test_database();
        let outcome = db.batch_insert_blocks(&[]).unwrap();
        assert_eq!(outcome, BatchInsertOutcome::Inserted(Vec::new()));
    }

    #[test]
    fn test_batch_insert_rolls_back_on_conflict_with_committed() {
        let mut db = create_test_database();
        db.try_insert_block(&maintenance_block("van-07", "2026-07-01", "09:00-11:00"))
            .unwrap();

        let blocks = vec![
            maintenance_block("van-07", "2026-07-01", "12:00-13:00"),
            maintenance_block("van-07", "2026-07-01", "10:00-12:00"),
        ];

        let outcome = db.batch_insert_blocks(&blocks).unwrap();
        let BatchInsertOutcome::Conflict { index, .. } = outcome else {
            panic!("expected conflict, got {outcome:?}");
        };
        assert_eq!(index, 1);

        // Nothing from the batch was committed.
        assert_eq!(Database::count_blocks(db.connection()).unwrap(), 1);
    }

    #[test]
    fn test_batch_insert_detects_self_overlap() {
        let mut db = create_test_database();

        let blocks = vec![
            maintenance_block("van-07", "2026-07-01", "08:00-10:00"),
            maintenance_block("van-07", "2026-07-01", "09:00-11:00"),
        ];

        let outcome = db.batch_insert_blocks(&blocks).unwrap();
        assert!(matches!(
            outcome,
            BatchInsertOutcome::Conflict { index: 1, .. }
        ));
        assert_eq!(Database::count_blocks(db.connection()).unwrap(), 0);
    }

    #[test]
    fn test_batch_delete_blocks() {
        let mut db = create_test_database();

        let blocks = vec![
            maintenance_block("van-07", "2026-07-01", "08:00-10:00"),
            maintenance_block("van-07", "2026-07-01", "10:00-12:00"),
        ];
        let BatchInsertOutcome::Inserted(ids) = db.batch_insert_blocks(&blocks).unwrap() else {
            panic!("insert failed");
        };

        let deleted = db.batch_delete_blocks(&ids).unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(Database::count_blocks(db.connection()).unwrap(), 0);

        // Deleting the same ids again removes nothing.
        assert_eq!(db.batch_delete_blocks(&ids).unwrap(), 0);
    }
}
