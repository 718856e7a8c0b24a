//! Error types for the slotlock library.
//!
//! This module provides the error hierarchy for all operations in the
//! slotlock library, using `thiserror` for ergonomic error handling.
//!
//! Expected contention outcomes are deliberately *not* errors: a slot that
//! is already taken, or a hold that can no longer be confirmed, is a normal
//! result of concurrent checkout and travels in outcome enums such as
//! [`crate::InsertOutcome`] and [`crate::ConfirmOutcome`]. The variants
//! here cover caller bugs (validation), infrastructure failures (storage,
//! I/O, configuration), and schema problems.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a slotlock error.
///
/// # Examples
///
/// ```
/// use slotlock::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(7)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the slotlock library.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid time of day was provided.
    #[error("invalid time of day {value}: {reason}")]
    InvalidTime {
        /// The invalid minute value.
        value: u16,
        /// The reason the time is invalid.
        reason: String,
    },

    /// An invalid interval was provided.
    #[error("invalid interval {start}-{end}: {reason}")]
    InvalidInterval {
        /// The offending start time.
        start: crate::TimeOfDay,
        /// The offending end time.
        end: crate::TimeOfDay,
        /// The reason the interval is invalid.
        reason: String,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The database write lock could not be acquired within the busy
    /// timeout. Callers should treat this as transient and retry.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

// Additional conversions for better ergonomics

impl From<crate::interval::InvalidTimeError> for Error {
    fn from(err: crate::interval::InvalidTimeError) -> Self {
        Self::InvalidTime {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl From<crate::interval::InvalidIntervalError> for Error {
    fn from(err: crate::interval::InvalidIntervalError) -> Self {
        Self::InvalidInterval {
            start: err.start,
            end: err.end,
            reason: err.reason,
        }
    }
}

impl From<crate::block::ValidationError> for Error {
    fn from(err: crate::block::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Check if the error indicates a missing resource.
    ///
    /// # Examples
    ///
    /// ```
    /// use slotlock::Error;
    ///
    /// let err = Error::NotFound { resource: "block 42".to_string() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the error is a transient lock timeout that callers may
    /// retry.
    ///
    /// # Examples
    ///
    /// ```
    /// use slotlock::Error;
    ///
    /// let err = Error::LockTimeout { seconds: 5 };
    /// assert!(err.is_lock_timeout());
    /// ```
    #[must_use]
    pub fn is_lock_timeout(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }
}
