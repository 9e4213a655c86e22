//! Error types for the bookinn library.
//!
//! This module provides the error hierarchy for all reservation and pricing
//! operations, using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Result type alias for operations that may fail with a bookinn error.
///
/// # Examples
///
/// ```
/// use bookinn::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the bookinn library.
///
/// This enum encompasses all error conditions that can occur during
/// reservation, cancellation, and pricing operations. The taxonomy mirrors
/// the failure semantics of the reservation protocol: validation failures
/// happen before any lock is touched, conflicts are retryable, and
/// availability failures never leave a partial mutation behind.
#[derive(Debug, Error)]
pub enum Error {
    /// A validation error occurred. Rejected before any lock or write.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A date/slot lock could not be acquired. Safe to retry.
    #[error("reservation conflict: could not acquire lock for {key}")]
    Conflict {
        /// The lock key that was contended.
        key: String,
    },

    /// Capacity was insufficient at the double-check inside the lock window.
    /// No mutation has taken place.
    #[error("insufficient availability: {details}")]
    Unavailable {
        /// Details about which date or slot ran out of capacity.
        details: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// An illegal booking status transition was attempted. The booking is
    /// untouched.
    #[error("illegal status transition from {from} to {to}")]
    StateTransition {
        /// The current status of the booking.
        from: String,
        /// The requested target status.
        to: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An unsupported store schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the store.
        found: i32,
    },

    /// The lock service backend failed (not a contention failure).
    #[error("lock service error: {details}")]
    LockBackend {
        /// Details about the backend failure.
        details: String,
    },
}

impl Error {
    /// Check if the error indicates a retryable contention failure.
    ///
    /// Callers that see a retryable error should back off and retry the
    /// reservation; the inventory has not been touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookinn::Error;
    ///
    /// let err = Error::Conflict { key: "inv:1:2026-09-01".into() };
    /// assert!(err.is_retryable());
    /// ```
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if the error indicates a missing entity.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Convenience constructor for validation errors.
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
