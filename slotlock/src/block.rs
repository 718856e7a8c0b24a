//! Reservation block types for tracking slot allocations.
//!
//! A block is the unit of allocation: one time interval occupying one
//! resource on one calendar day. Blocks come in several kinds (firm
//! bookings, operator maintenance windows, provisional holds, and
//! operational padding), and only *active* blocks participate in conflict
//! detection.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Interval;

/// A unique identifier for a stored reservation block.
///
/// Assigned by the database on insertion and immutable thereafter.
///
/// # Examples
///
/// ```
/// use slotlock::BlockId;
///
/// let id = BlockId::from(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(format!("{id}"), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(i64);

impl BlockId {
    /// Returns the underlying identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for BlockId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for an exclusive resource (typically a vehicle).
///
/// Resource identifiers are opaque to this crate; the only requirement is
/// that they are non-empty after trimming whitespace.
///
/// # Examples
///
/// ```
/// use slotlock::ResourceId;
///
/// let id = ResourceId::new("van-07").unwrap();
/// assert_eq!(id.as_str(), "van-07");
///
/// // Whitespace is trimmed; empty identifiers are rejected
/// assert_eq!(ResourceId::new("  van-07  ").unwrap().as_str(), "van-07");
/// assert!(ResourceId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a new resource identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty after trimming whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(ValidationError {
                field: "resource_id".into(),
                message: "resource identifier must be non-empty".into(),
            });
        }
        Ok(Self(trimmed))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ResourceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of a reservation block.
///
/// The kind determines the block's lifecycle and whether it can expire:
/// only `Hold` blocks carry an expiry and become inert when it passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// A firm, customer-facing booking.
    Booking,
    /// Operator-imposed unavailability (servicing, inspection).
    Maintenance,
    /// A provisional, expiring reservation created during checkout.
    Hold,
    /// An operator blackout (resource withdrawn for the day or season).
    Blackout,
    /// Operational padding between bookings (cleaning, repositioning).
    Buffer,
}

impl BlockKind {
    /// Returns the canonical lowercase name used in storage and display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Maintenance => "maintenance",
            Self::Hold => "hold",
            Self::Blackout => "blackout",
            Self::Buffer => "buffer",
        }
    }

    /// Returns `true` for the operator-managed kinds that may be
    /// registered directly (maintenance, blackout, buffer).
    ///
    /// Bookings only ever arise from confirming a hold, and holds only
    /// from the checkout protocol.
    #[must_use]
    pub const fn is_operator_kind(self) -> bool {
        matches!(self, Self::Maintenance | Self::Blackout | Self::Buffer)
    }
}

impl FromStr for BlockKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booking" => Ok(Self::Booking),
            "maintenance" => Ok(Self::Maintenance),
            "hold" => Ok(Self::Hold),
            "blackout" => Ok(Self::Blackout),
            "buffer" => Ok(Self::Buffer),
            other => Err(ValidationError {
                field: "kind".into(),
                message: format!("unknown block kind '{other}'"),
            }),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single time-interval occupying a resource on a given day.
///
/// Blocks are constructed through [`ReservationBlock::builder`], which
/// enforces the field invariants:
///
/// - a `Hold` block must carry both `hold_expires_at` and
///   `held_by_session`; no other kind may carry either;
/// - `booking_ref` may only be set on a `Booking` block;
/// - free-text fields are trimmed and must be non-empty when present.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use slotlock::{BlockKind, Interval, ReservationBlock, ResourceId};
///
/// let resource = ResourceId::new("van-07").unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
/// let interval: Interval = "09:00-17:00".parse().unwrap();
///
/// let block = ReservationBlock::builder(resource, date, interval, BlockKind::Maintenance)
///     .notes(Some("annual inspection".to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(block.kind(), BlockKind::Maintenance);
/// assert_eq!(block.notes(), Some("annual inspection"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationBlock {
    id: Option<BlockId>,
    resource_id: ResourceId,
    date: NaiveDate,
    interval: Interval,
    kind: BlockKind,
    booking_ref: Option<String>,
    hold_expires_at: Option<DateTime<Utc>>,
    held_by_session: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReservationBlock {
    /// Creates a new block builder.
    #[must_use]
    pub fn builder(
        resource_id: ResourceId,
        date: NaiveDate,
        interval: Interval,
        kind: BlockKind,
    ) -> BlockBuilder {
        BlockBuilder {
            id: None,
            resource_id,
            date,
            interval,
            kind,
            booking_ref: None,
            hold_expires_at: None,
            held_by_session: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns the storage identifier, or `None` if the block has not been
    /// inserted yet.
    #[must_use]
    pub const fn id(&self) -> Option<BlockId> {
        self.id
    }

    /// Returns the resource this block occupies.
    #[must_use]
    pub const fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    /// Returns the calendar day the block applies to.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the occupied time interval.
    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// Returns the block kind.
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Returns the back-reference to the firm booking, if any.
    #[must_use]
    pub fn booking_ref(&self) -> Option<&str> {
        self.booking_ref.as_deref()
    }

    /// Returns the hold expiry, present exactly when `kind == Hold`.
    #[must_use]
    pub const fn hold_expires_at(&self) -> Option<DateTime<Utc>> {
        self.hold_expires_at
    }

    /// Returns the session that created the hold, if any.
    #[must_use]
    pub fn held_by_session(&self) -> Option<&str> {
        self.held_by_session.as_deref()
    }

    /// Returns the operator notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` if this block counts toward conflict detection at
    /// the given instant.
    ///
    /// Every non-hold block is always active. A hold is active only until
    /// its expiry passes; from then on it is logically inert and must not
    /// block new reservations, whether or not it has been swept yet.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.kind {
            BlockKind::Hold => self.hold_expires_at.is_some_and(|expiry| expiry > now),
            _ => true,
        }
    }
}

/// Builder for creating [`ReservationBlock`] instances.
#[derive(Debug)]
pub struct BlockBuilder {
    id: Option<BlockId>,
    resource_id: ResourceId,
    date: NaiveDate,
    interval: Interval,
    kind: BlockKind,
    booking_ref: Option<String>,
    hold_expires_at: Option<DateTime<Utc>>,
    held_by_session: Option<String>,
    notes: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BlockBuilder {
    /// Sets the storage identifier (used when loading rows).
    #[must_use]
    pub(crate) const fn id(mut self, id: BlockId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the booking back-reference.
    ///
    /// The value is trimmed of leading/trailing whitespace.
    #[must_use]
    pub fn booking_ref(mut self, booking_ref: Option<String>) -> Self {
        self.booking_ref = booking_ref.map(|r| r.trim().to_string());
        self
    }

    /// Sets the hold expiry timestamp.
    #[must_use]
    pub const fn hold_expires_at(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.hold_expires_at = expires_at;
        self
    }

    /// Sets the holding session identifier.
    ///
    /// The value is trimmed of leading/trailing whitespace.
    #[must_use]
    pub fn held_by_session(mut self, session: Option<String>) -> Self {
        self.held_by_session = session.map(|s| s.trim().to_string());
        self
    }

    /// Sets the operator notes.
    ///
    /// The value is trimmed of leading/trailing whitespace.
    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.map(|n| n.trim().to_string());
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the last-mutation timestamp.
    #[must_use]
    pub const fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds the block, validating the kind/field invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a hold is missing its expiry or session;
    /// - a non-hold carries hold fields;
    /// - `booking_ref` is set on a non-booking block;
    /// - any present free-text field is empty after trimming.
    pub fn build(self) -> Result<ReservationBlock, ValidationError> {
        let non_empty = |field: &str, value: &Option<String>| -> Result<(), ValidationError> {
            if value.as_deref().is_some_and(str::is_empty) {
                return Err(ValidationError {
                    field: field.into(),
                    message: format!("{field} must be non-empty after trimming whitespace"),
                });
            }
            Ok(())
        };

        non_empty("booking_ref", &self.booking_ref)?;
        non_empty("held_by_session", &self.held_by_session)?;
        non_empty("notes", &self.notes)?;

        match self.kind {
            BlockKind::Hold => {
                if self.hold_expires_at.is_none() {
                    return Err(ValidationError {
                        field: "hold_expires_at".into(),
                        message: "holds must carry an expiry timestamp".into(),
                    });
                }
                if self.held_by_session.is_none() {
                    return Err(ValidationError {
                        field: "held_by_session".into(),
                        message: "holds must carry the creating session".into(),
                    });
                }
            }
            _ => {
                if self.hold_expires_at.is_some() || self.held_by_session.is_some() {
                    return Err(ValidationError {
                        field: "kind".into(),
                        message: format!(
                            "{} blocks must not carry hold expiry or session fields",
                            self.kind
                        ),
                    });
                }
            }
        }

        if self.booking_ref.is_some() && self.kind != BlockKind::Booking {
            return Err(ValidationError {
                field: "booking_ref".into(),
                message: format!("booking_ref is only valid on booking blocks, not {}", self.kind),
            });
        }

        let now = Utc::now();
        Ok(ReservationBlock {
            id: self.id,
            resource_id: self.resource_id,
            date: self.date,
            interval: self.interval,
            kind: self.kind,
            booking_ref: self.booking_ref,
            hold_expires_at: self.hold_expires_at,
            held_by_session: self.held_by_session,
            notes: self.notes,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        })
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn resource() -> ResourceId {
        ResourceId::new("van-07").unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
    }

    fn interval(s: &str) -> Interval {
        s.parse().unwrap()
    }

    #[test]
    fn test_resource_id_trims() {
        assert_eq!(ResourceId::new(" van-07 ").unwrap().as_str(), "van-07");
    }

    #[test]
    fn test_resource_id_rejects_empty() {
        assert!(ResourceId::new("").is_err());
        assert!(ResourceId::new("  ").is_err());
    }

    #[test]
    fn test_block_kind_round_trip() {
        for kind in [
            BlockKind::Booking,
            BlockKind::Maintenance,
            BlockKind::Hold,
            BlockKind::Blackout,
            BlockKind::Buffer,
        ] {
            assert_eq!(kind.as_str().parse::<BlockKind>().unwrap(), kind);
        }
        assert!("breakfast".parse::<BlockKind>().is_err());
    }

    #[test]
    fn test_operator_kinds() {
        assert!(BlockKind::Maintenance.is_operator_kind());
        assert!(BlockKind::Blackout.is_operator_kind());
        assert!(BlockKind::Buffer.is_operator_kind());
        assert!(!BlockKind::Booking.is_operator_kind());
        assert!(!BlockKind::Hold.is_operator_kind());
    }

    #[test]
    fn test_hold_requires_expiry_and_session() {
        let result = ReservationBlock::builder(resource(), date(), interval("10:00-12:00"), BlockKind::Hold)
            .held_by_session(Some("s1".to_string()))
            .build();
        assert_eq!(result.unwrap_err().field, "hold_expires_at");

        let result = ReservationBlock::builder(resource(), date(), interval("10:00-12:00"), BlockKind::Hold)
            .hold_expires_at(Some(Utc::now()))
            .build();
        assert_eq!(result.unwrap_err().field, "held_by_session");
    }

    #[test]
    fn test_non_hold_rejects_hold_fields() {
        let result = ReservationBlock::builder(
            resource(),
            date(),
            interval("10:00-12:00"),
            BlockKind::Maintenance,
        )
        .hold_expires_at(Some(Utc::now()))
        .build();
        assert_eq!(result.unwrap_err().field, "kind");
    }

    #[test]
    fn test_booking_ref_only_on_bookings() {
        let result = ReservationBlock::builder(
            resource(),
            date(),
            interval("10:00-12:00"),
            BlockKind::Maintenance,
        )
        .booking_ref(Some("BK-100".to_string()))
        .build();
        assert_eq!(result.unwrap_err().field, "booking_ref");

        let block = ReservationBlock::builder(
            resource(),
            date(),
            interval("10:00-12:00"),
            BlockKind::Booking,
        )
        .booking_ref(Some("BK-100".to_string()))
        .build()
        .unwrap();
        assert_eq!(block.booking_ref(), Some("BK-100"));
    }

    #[test]
    fn test_empty_notes_rejected() {
        let result = ReservationBlock::builder(
            resource(),
            date(),
            interval("10:00-12:00"),
            BlockKind::Maintenance,
        )
        .notes(Some("   ".to_string()))
        .build();
        assert_eq!(result.unwrap_err().field, "notes");
    }

    #[test]
    fn test_unexpired_hold_is_active() {
        let now = Utc::now();
        let block = ReservationBlock::builder(resource(), date(), interval("10:00-12:00"), BlockKind::Hold)
            .hold_expires_at(Some(now + Duration::minutes(15)))
            .held_by_session(Some("s1".to_string()))
            .build()
            .unwrap();
        assert!(block.is_active(now));
    }

    #[test]
    fn test_expired_hold_is_inert() {
        let now = Utc::now();
        let block = ReservationBlock::builder(resource(), date(), interval("10:00-12:00"), BlockKind::Hold)
            .hold_expires_at(Some(now - Duration::seconds(1)))
            .held_by_session(Some("s1".to_string()))
            .build()
            .unwrap();
        assert!(!block.is_active(now));
    }

    #[test]
    fn test_expiry_boundary_is_inert() {
        // A hold whose expiry equals "now" no longer counts.
        let now = Utc::now();
        let block = ReservationBlock::builder(resource(), date(), interval("10:00-12:00"), BlockKind::Hold)
            .hold_expires_at(Some(now))
            .held_by_session(Some("s1".to_string()))
            .build()
            .unwrap();
        assert!(!block.is_active(now));
    }

    #[test]
    fn test_non_hold_kinds_always_active() {
        let now = Utc::now();
        for kind in [BlockKind::Maintenance, BlockKind::Blackout, BlockKind::Buffer] {
            let block =
                ReservationBlock::builder(resource(), date(), interval("10:00-12:00"), kind)
                    .build()
                    .unwrap();
            assert!(block.is_active(now), "{kind} should always be active");
        }
    }

    #[test]
    fn test_timestamps_defaulted_at_build() {
        let before = Utc::now();
        let block = ReservationBlock::builder(
            resource(),
            date(),
            interval("10:00-12:00"),
            BlockKind::Maintenance,
        )
        .build()
        .unwrap();
        assert!(block.created_at() >= before);
        assert_eq!(block.created_at(), block.updated_at());
        assert!(block.id().is_none());
    }

    #[test]
    fn test_block_serde_round_trip() {
        let block = ReservationBlock::builder(
            resource(),
            date(),
            interval("10:00-12:00"),
            BlockKind::Booking,
        )
        .booking_ref(Some("BK-7".to_string()))
        .build()
        .unwrap();

        let json = serde_json::to_string(&block).unwrap();
        let back: ReservationBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }
}
