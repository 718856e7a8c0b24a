//! The hold checkout protocol.
//!
//! A hold is a short-lived provisional reservation tied to a caller
//! session. The protocol has exactly three moves: create a hold while the
//! customer decides, confirm it into a firm booking once the external
//! booking record and payment succeed, or release it when checkout is
//! abandoned. A hold that is neither confirmed nor released simply
//! expires: from its expiry instant it stops counting toward conflicts,
//! and the sweeper deletes the row later.
//!
//! Holds deliberately bypass the plan-execute machinery used by operator
//! surfaces: the TTL is stamped relative to `now`, so the block must be
//! built and conflict-checked in the same breath.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::database::{ConfirmOutcome, Database, InsertOutcome};
use crate::error::{Error, Result};
use crate::{BlockId, BlockKind, Conflict, Interval, ReservationBlock, ResourceId};

/// Default hold time-to-live in minutes.
///
/// Long enough to finish a normal checkout, short enough that an
/// abandoned one frees the slot promptly.
pub const DEFAULT_HOLD_TTL_MINUTES: i64 = 15;

/// Options for creating a hold.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use slotlock::operations::HoldOptions;
/// use slotlock::ResourceId;
///
/// let options = HoldOptions::new(
///     ResourceId::new("van-07").unwrap(),
///     NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
///     "10:00-12:00".parse().unwrap(),
///     "session-123",
/// )
/// .with_ttl(Duration::minutes(5));
///
/// assert_eq!(options.ttl, Duration::minutes(5));
/// ```
#[derive(Debug, Clone)]
pub struct HoldOptions {
    /// The resource to hold.
    pub resource_id: ResourceId,

    /// The calendar day of the slot.
    pub date: NaiveDate,

    /// The time interval to hold.
    pub interval: Interval,

    /// Opaque identifier of the caller session; required to confirm or
    /// release the hold later.
    pub session_id: String,

    /// How long the hold stays live without confirmation.
    pub ttl: Duration,
}

impl HoldOptions {
    /// Creates hold options with the default TTL.
    #[must_use]
    pub fn new(
        resource_id: ResourceId,
        date: NaiveDate,
        interval: Interval,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            resource_id,
            date,
            interval,
            session_id: session_id.into(),
            ttl: Duration::minutes(DEFAULT_HOLD_TTL_MINUTES),
        }
    }

    /// Sets the time-to-live.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Outcome of a hold creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The hold was created.
    Created {
        /// The identifier to pass to confirm or release.
        id: BlockId,
        /// When the hold lapses without confirmation.
        expires_at: DateTime<Utc>,
    },
    /// An active block already covers part of the requested interval.
    ///
    /// This is the expected outcome of contention; offer the caller
    /// another slot.
    Unavailable(Conflict),
}

/// Creates a time-limited provisional reservation.
///
/// The hold is routed through the atomic conflict-checked insertion, so
/// two concurrent holds on overlapping intervals cannot both succeed. An
/// expired hold on the same interval never blocks creation, even if it
/// has not been swept yet.
///
/// Creation is idempotent per `(resource, date, interval, session)`: a
/// caller retrying after a transport failure gets its original live hold
/// back, with the original expiry, rather than a conflict.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the session id is empty or the TTL is
/// not positive (caller bugs), and propagates storage failures. A taken
/// slot is *not* an error; it is reported as
/// [`HoldOutcome::Unavailable`].
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use slotlock::database::{Database, DatabaseConfig};
/// use slotlock::operations::{create_hold, HoldOptions, HoldOutcome};
/// use slotlock::ResourceId;
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/slotlock.db")).unwrap();
///
/// let options = HoldOptions::new(
///     ResourceId::new("van-07").unwrap(),
///     NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
///     "10:00-12:00".parse().unwrap(),
///     "session-123",
/// );
///
/// match create_hold(&mut db, &options).unwrap() {
///     HoldOutcome::Created { id, expires_at } => {
///         println!("hold {id} expires at {expires_at}");
///     }
///     HoldOutcome::Unavailable(conflict) => println!("{conflict}"),
/// }
/// ```
pub fn create_hold(db: &mut Database, options: &HoldOptions) -> Result<HoldOutcome> {
    let session = options.session_id.trim();
    if session.is_empty() {
        return Err(Error::Validation {
            field: "session_id".into(),
            message: "session identifier must be non-empty".into(),
        });
    }
    if options.ttl <= Duration::zero() {
        return Err(Error::Validation {
            field: "ttl".into(),
            message: "hold time-to-live must be positive".into(),
        });
    }

    let expires_at = Utc::now() + options.ttl;
    let block = ReservationBlock::builder(
        options.resource_id.clone(),
        options.date,
        options.interval,
        BlockKind::Hold,
    )
    .hold_expires_at(Some(expires_at))
    .held_by_session(Some(session.to_string()))
    .build()?;

    match db.try_insert_block(&block)? {
        InsertOutcome::Inserted(id) => Ok(HoldOutcome::Created { id, expires_at }),
        InsertOutcome::Conflict(conflict) => {
            // A retried create for the identical slot and session is
            // idempotent: hand back the live hold from the earlier
            // attempt instead of a conflict, keeping its original expiry.
            if let Some(existing) = Database::find_active_conflict(
                db.connection(),
                &options.resource_id,
                options.date,
                options.interval,
                Utc::now(),
            )? {
                if existing.kind() == BlockKind::Hold
                    && existing.held_by_session() == Some(session)
                    && existing.interval() == options.interval
                {
                    if let (Some(id), Some(expires_at)) = (existing.id(), existing.hold_expires_at())
                    {
                        return Ok(HoldOutcome::Created { id, expires_at });
                    }
                }
            }
            Ok(HoldOutcome::Unavailable(conflict))
        }
    }
}

/// Promotes a hold to a firm booking.
///
/// Succeeds only if the hold still exists, belongs to `session_id`, and
/// has not expired; all three checks happen atomically with the in-place
/// mutation, so neither a racing sweep nor a concurrent confirm can
/// interleave. The rejection reason distinguishes `expired`,
/// `wrong_session`, and `not_found` so the checkout flow can show an
/// accurate message.
///
/// # Errors
///
/// Returns [`Error::Validation`] for an empty session or booking
/// reference, and propagates storage failures. Protocol failures are
/// `Rejected` outcomes, not errors.
pub fn confirm_hold(
    db: &mut Database,
    hold_id: BlockId,
    session_id: &str,
    booking_ref: &str,
) -> Result<ConfirmOutcome> {
    let session = session_id.trim();
    if session.is_empty() {
        return Err(Error::Validation {
            field: "session_id".into(),
            message: "session identifier must be non-empty".into(),
        });
    }
    let booking_ref = booking_ref.trim();
    if booking_ref.is_empty() {
        return Err(Error::Validation {
            field: "booking_ref".into(),
            message: "booking reference must be non-empty".into(),
        });
    }

    db.confirm_hold(hold_id, session, booking_ref, Utc::now())
}

/// Releases a hold.
///
/// Idempotent: releasing twice, releasing an expired hold, or releasing
/// after a confirm is not an error and affects nothing. A hold owned by a
/// different session is left untouched.
///
/// # Errors
///
/// Propagates storage failures.
///
/// # Returns
///
/// - `Ok(true)` if a hold was deleted
/// - `Ok(false)` if nothing matched
pub fn release_hold(db: &mut Database, hold_id: BlockId, session_id: &str) -> Result<bool> {
    db.release_hold(hold_id, session_id.trim())
}
