//! Booking cancellation.
//!
//! Cancellation takes no date locks: the inventory restoration is keyed by
//! the booking's own recorded quantities, so it cannot oversell and needs no
//! serialization against concurrent reservations.

use std::time::SystemTime;

use crate::booking::Booking;
use crate::error::Result;
use crate::events::BookingEvent;

use super::reserve::ReservationCoordinator;

/// Options for a cancel operation.
#[derive(Debug, Clone, Default)]
pub struct CancelOptions {
    /// Operator- or guest-supplied reason, recorded on the booking.
    pub reason: Option<String>,
}

impl CancelOptions {
    /// Creates empty cancel options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cancellation reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl ReservationCoordinator<'_> {
    /// Cancels a booking and restores its inventory atomically.
    ///
    /// Legal from `PENDING` and `CONFIRMED` only; a checked-in guest cannot
    /// be cancelled out of the room and terminal bookings stay terminal.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for unknown bookings and
    /// [`crate::Error::StateTransition`] when the current status does not
    /// allow cancellation. The booking is untouched in both cases.
    pub fn cancel(&mut self, booking_id: i64, options: &CancelOptions) -> Result<Booking> {
        let booking = self.store_mut().cancel_booking_atomic(
            booking_id,
            options.reason.as_deref(),
            SystemTime::now(),
        )?;

        log::info!(
            "cancelled booking {} ({} room(s) restored)",
            booking.booking_number,
            booking.num_rooms
        );
        self.publish(&BookingEvent::Cancelled {
            booking_id,
            reason: booking.cancel_reason.clone(),
        });

        Ok(booking)
    }
}
