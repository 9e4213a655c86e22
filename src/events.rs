//! Post-commit booking events.
//!
//! Events are emitted after a store transaction commits, never inside it, so
//! a slow or failing sink can never roll back a reservation. Delivery is
//! best-effort by contract: sinks must not panic, and errors they report are
//! logged and dropped.

use serde::{Deserialize, Serialize};

use crate::booking::BookingStatus;

/// A lifecycle event for a booking, emitted after the owning transaction
/// has committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingEvent {
    /// A booking was created and inventory decremented.
    Created {
        /// Store id of the new booking.
        booking_id: i64,
        /// Human-readable booking reference.
        booking_number: String,
    },
    /// A booking changed status.
    StatusChanged {
        /// Store id of the booking.
        booking_id: i64,
        /// Status before the transition.
        from: BookingStatus,
        /// Status after the transition.
        to: BookingStatus,
    },
    /// A booking was cancelled and its inventory restored.
    Cancelled {
        /// Store id of the booking.
        booking_id: i64,
        /// Operator-supplied reason, if any.
        reason: Option<String>,
    },
}

/// Receives booking events after commit.
///
/// Implementations must be cheap or internally queued; the reservation path
/// calls [`EventSink::publish`] synchronously after each commit.
pub trait EventSink: Send + Sync {
    /// Delivers one event. Failures are the sink's problem; the caller logs
    /// and continues.
    fn publish(&self, event: &BookingEvent);
}

/// An event sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: &BookingEvent) {}
}
