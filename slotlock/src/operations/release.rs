//! Booking cancellation planning and execution.
//!
//! When the external workflow cancels a booking, the blocks that booking
//! occupied must be freed. Only `booking`-kind blocks carrying the
//! reference are touched; holds and operator blocks are never affected by
//! a cancellation. The operation is idempotent so the cancellation
//! workflow can safely retry.

use crate::database::Database;
use crate::error::{Error, Result};

use super::plan::{OperationPlan, PlanAction};

/// Options for a booking cancellation.
#[derive(Debug, Clone)]
pub struct CancellationOptions {
    /// The reference of the cancelled booking.
    pub booking_ref: String,
}

impl CancellationOptions {
    /// Creates new cancellation options.
    #[must_use]
    pub fn new(booking_ref: impl Into<String>) -> Self {
        Self {
            booking_ref: booking_ref.into(),
        }
    }
}

/// A cancellation plan generator.
pub struct CancellationPlan {
    options: CancellationOptions,
}

impl CancellationPlan {
    /// Creates a new cancellation plan with the given options.
    #[must_use]
    pub const fn new(options: CancellationOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this cancellation.
    ///
    /// Cancellations are idempotent - if no blocks reference the booking,
    /// a warning is added but no error occurs.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking reference is empty or the lookup
    /// fails.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let booking_ref = self.options.booking_ref.trim();
        if booking_ref.is_empty() {
            return Err(Error::Validation {
                field: "booking_ref".into(),
                message: "booking reference must be non-empty".into(),
            });
        }

        let mut plan = OperationPlan::new(format!("Release blocks for booking {booking_ref}"));

        if Database::count_booking_blocks(db.connection(), booking_ref)? > 0 {
            plan = plan.add_action(PlanAction::CancelBooking(booking_ref.to_string()));
        } else {
            plan = plan.add_warning(format!(
                "no blocks found for booking {booking_ref} (already released)"
            ));
        }

        Ok(plan)
    }
}

/// Deletes every block belonging to a cancelled booking.
///
/// # Errors
///
/// Returns an error if the booking reference is empty or the delete
/// fails.
///
/// # Returns
///
/// The number of blocks freed (zero when the cancellation was already
/// applied).
///
/// # Examples
///
/// ```no_run
/// use slotlock::database::{Database, DatabaseConfig};
/// use slotlock::operations::cancel_booking;
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/slotlock.db")).unwrap();
/// let freed = cancel_booking(&mut db, "BK-100").unwrap();
/// println!("freed {freed} blocks");
/// ```
pub fn cancel_booking(db: &mut Database, booking_ref: &str) -> Result<usize> {
    let booking_ref = booking_ref.trim();
    if booking_ref.is_empty() {
        return Err(Error::Validation {
            field: "booking_ref".into(),
            message: "booking reference must be non-empty".into(),
        });
    }
    db.delete_booking_blocks(booking_ref)
}
