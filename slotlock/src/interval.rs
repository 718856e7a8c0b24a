//! Time-of-day and interval types for daily scheduling.
//!
//! This module provides the types that describe when a block occupies a
//! resource within a single calendar day, including validation and the
//! half-open overlap predicate used for conflict detection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A time of day expressed as minutes since midnight.
///
/// Values range from `0` (00:00) to `1440` (24:00). The end-of-day value
/// `1440` is only meaningful as the exclusive end of an interval; it can
/// never be an interval start because intervals must be non-empty.
///
/// # Examples
///
/// ```
/// use slotlock::TimeOfDay;
///
/// let t = TimeOfDay::try_from(630).unwrap();
/// assert_eq!(t.hour(), 10);
/// assert_eq!(t.minute(), 30);
/// assert_eq!(format!("{t}"), "10:30");
///
/// // Out of range
/// assert!(TimeOfDay::try_from(1441).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight, the start of the day.
    pub const MIDNIGHT: Self = Self(0);

    /// The exclusive end of the day (24:00), valid only as an interval end.
    pub const END_OF_DAY: Self = Self(1440);

    /// Returns the number of minutes since midnight.
    ///
    /// # Examples
    ///
    /// ```
    /// use slotlock::TimeOfDay;
    ///
    /// let t = TimeOfDay::try_from(600).unwrap();
    /// assert_eq!(t.minutes(), 600);
    /// ```
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Returns the hour component (0-24).
    #[must_use]
    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Returns the minute component (0-59).
    #[must_use]
    pub const fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl TryFrom<u16> for TimeOfDay {
    type Error = InvalidTimeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value > 1440 {
            Err(InvalidTimeError {
                value,
                reason: "must be at most 1440 minutes (24:00)".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl From<TimeOfDay> for u16 {
    fn from(time: TimeOfDay) -> Self {
        time.0
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidTimeError;

    /// Parses a `HH:MM` string such as `"09:30"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| InvalidTimeError {
            value: 0,
            reason: format!("cannot parse '{s}': {reason}"),
        };

        let (hours, minutes) = s.split_once(':').ok_or_else(|| invalid("expected HH:MM"))?;
        let hours: u16 = hours.parse().map_err(|_| invalid("invalid hour"))?;
        let minutes: u16 = minutes.parse().map_err(|_| invalid("invalid minute"))?;
        if hours > 24 {
            return Err(invalid("hour must be 0-24"));
        }
        if minutes > 59 {
            return Err(invalid("minute must be 0-59"));
        }
        Self::try_from(hours * 60 + minutes)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Error type for invalid times of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimeError {
    /// The invalid minute value.
    pub value: u16,
    /// The reason the time is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time of day {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidTimeError {}

/// A half-open time range `[start, end)` within a single day.
///
/// Intervals never cross midnight and are always non-empty
/// (`start < end`). Two intervals conflict when they overlap under the
/// standard half-open test; touching endpoints do not overlap, so
/// back-to-back reservations are allowed.
///
/// # Examples
///
/// ```
/// use slotlock::{Interval, TimeOfDay};
///
/// let morning = Interval::new(
///     TimeOfDay::try_from(600).unwrap(),   // 10:00
///     TimeOfDay::try_from(720).unwrap(),   // 12:00
/// ).unwrap();
/// let afternoon = Interval::new(
///     TimeOfDay::try_from(720).unwrap(),   // 12:00
///     TimeOfDay::try_from(840).unwrap(),   // 14:00
/// ).unwrap();
///
/// // Back-to-back intervals do not overlap
/// assert!(!morning.overlaps(afternoon));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl Interval {
    /// Creates a new interval.
    ///
    /// # Errors
    ///
    /// Returns an error if `start >= end` (intervals must be non-empty).
    ///
    /// # Examples
    ///
    /// ```
    /// use slotlock::{Interval, TimeOfDay};
    ///
    /// let start = TimeOfDay::try_from(600).unwrap();
    /// let end = TimeOfDay::try_from(720).unwrap();
    /// assert!(Interval::new(start, end).is_ok());
    /// assert!(Interval::new(end, start).is_err());
    /// assert!(Interval::new(start, start).is_err());
    /// ```
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, InvalidIntervalError> {
        if start >= end {
            return Err(InvalidIntervalError {
                start,
                end,
                reason: "start must be strictly before end".into(),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns the inclusive start of the interval.
    #[must_use]
    pub const fn start(self) -> TimeOfDay {
        self.start
    }

    /// Returns the exclusive end of the interval.
    #[must_use]
    pub const fn end(self) -> TimeOfDay {
        self.end
    }

    /// Returns the interval length in minutes.
    #[must_use]
    pub const fn duration_minutes(self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Returns `true` if this interval overlaps `other`.
    ///
    /// Uses the half-open overlap test: `a.start < b.end && a.end > b.start`.
    /// Intervals that merely touch (one's end equals the other's start) do
    /// not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use slotlock::Interval;
    ///
    /// let a: Interval = "10:00-12:00".parse().unwrap();
    /// let b: Interval = "11:00-13:00".parse().unwrap();
    /// let c: Interval = "12:00-14:00".parse().unwrap();
    ///
    /// assert!(a.overlaps(b));
    /// assert!(!a.overlaps(c));
    /// ```
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Returns `true` if this interval fully contains `other`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.start <= other.start && self.end >= other.end
    }
}

impl FromStr for Interval {
    type Err = InvalidIntervalError;

    /// Parses a `HH:MM-HH:MM` string such as `"10:00-12:00"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidIntervalError {
            start: TimeOfDay::MIDNIGHT,
            end: TimeOfDay::MIDNIGHT,
            reason: format!("cannot parse '{s}': expected HH:MM-HH:MM"),
        };

        let (start, end) = s.split_once('-').ok_or_else(malformed)?;
        let start: TimeOfDay = start.trim().parse().map_err(|_| malformed())?;
        let end: TimeOfDay = end.trim().parse().map_err(|_| malformed())?;
        Self::new(start, end)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Error type for invalid intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidIntervalError {
    /// The offending start time.
    pub start: TimeOfDay,
    /// The offending end time.
    pub end: TimeOfDay,
    /// The reason the interval is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidIntervalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid interval {}-{}: {}",
            self.start, self.end, self.reason
        )
    }
}

impl std::error::Error for InvalidIntervalError {}
