//! Booking lifecycle transitions other than cancellation.
//!
//! Each transition is a compare-and-set against the booking's current
//! status; the transition table is checked exactly once, in the store's
//! status update. A "status changed" event is published after commit.

use std::time::SystemTime;

use crate::booking::{Booking, BookingStatus};
use crate::error::Result;
use crate::events::BookingEvent;

use super::reserve::ReservationCoordinator;

impl ReservationCoordinator<'_> {
    /// Confirms a pending booking and records its payment as received, in
    /// one atomic store update.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StateTransition`] unless the booking is
    /// `PENDING`.
    pub fn confirm(&mut self, booking_id: i64) -> Result<Booking> {
        let booking = self
            .store_mut()
            .confirm_booking_atomic(booking_id, SystemTime::now())?;

        log::info!(
            "booking {} moved {} -> {}",
            booking.booking_number,
            BookingStatus::Pending,
            BookingStatus::Confirmed
        );
        self.publish(&BookingEvent::StatusChanged {
            booking_id,
            from: BookingStatus::Pending,
            to: BookingStatus::Confirmed,
        });

        Ok(booking)
    }

    /// Checks a confirmed booking in.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StateTransition`] unless the booking is
    /// `CONFIRMED`.
    pub fn check_in(&mut self, booking_id: i64) -> Result<Booking> {
        self.transition(booking_id, BookingStatus::CheckedIn)
    }

    /// Checks a checked-in booking out.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StateTransition`] unless the booking is
    /// `CHECKED_IN`.
    pub fn check_out(&mut self, booking_id: i64) -> Result<Booking> {
        self.transition(booking_id, BookingStatus::CheckedOut)
    }

    /// Marks a confirmed booking as a no-show.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StateTransition`] unless the booking is
    /// `CONFIRMED`.
    pub fn mark_no_show(&mut self, booking_id: i64) -> Result<Booking> {
        self.transition(booking_id, BookingStatus::NoShow)
    }

    /// Transitions a booking to `to`, validating against the transition
    /// table and the booking's current status.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for unknown bookings and
    /// [`crate::Error::StateTransition`] for illegal transitions; the
    /// booking is untouched in both cases.
    pub fn transition(&mut self, booking_id: i64, to: BookingStatus) -> Result<Booking> {
        let before = self.store().get_booking(booking_id)?;
        self.store_mut()
            .update_booking_status(booking_id, before.status, to, SystemTime::now())?;

        log::info!(
            "booking {} moved {} -> {to}",
            before.booking_number,
            before.status
        );
        self.publish(&BookingEvent::StatusChanged {
            booking_id,
            from: before.status,
            to,
        });

        self.store().get_booking(booking_id)
    }
}
