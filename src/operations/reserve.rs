//! Booking reservation under contention.
//!
//! This module implements the reservation protocol: validate, lock the
//! affected dates, re-check availability inside the lock window, then write
//! the booking, inventory decrements, and commission in one atomic store
//! transaction. Locks are released on every exit path by the lock set's
//! drop guard.

use std::time::SystemTime;

use chrono::NaiveDate;

use crate::availability::{check_availability, validate_request};
use crate::booking::{
    generate_booking_number, Booking, BookingSource, BookingStatus, PaymentStatus, Stay,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{BookingEvent, EventSink, NullSink};
use crate::lock::{LockService, LockSet};
use crate::store::Store;

/// How many times a reservation retries on a booking-number collision.
/// Collisions need a 1-in-36^6 draw, so one retry is already generous.
const MAX_NUMBER_ATTEMPTS: u32 = 3;

static NULL_SINK: NullSink = NullSink;

/// Options for a reserve operation.
///
/// This struct contains all the parameters needed to create a booking.
///
/// # Examples
///
/// ```
/// use bookinn::operations::ReserveOptions;
/// use bookinn::Stay;
/// use chrono::NaiveDate;
///
/// let stay = Stay::daily(
///     NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 9, 3).unwrap(),
/// )
/// .unwrap();
///
/// let options = ReserveOptions::new(1, stay, "Ada Khumalo")
///     .with_num_rooms(2)
///     .with_num_guests(4);
/// assert_eq!(options.num_rooms, 2);
/// ```
#[derive(Debug, Clone)]
pub struct ReserveOptions {
    /// The room type to reserve.
    pub room_type_id: i64,

    /// The dates or slot to occupy.
    pub stay: Stay,

    /// Rooms requested.
    pub num_rooms: u32,

    /// Total guests across all rooms.
    pub num_guests: u32,

    /// Name on the reservation.
    pub guest_name: String,

    /// Contact detail for the guest.
    pub guest_contact: Option<String>,

    /// Where the booking originated.
    pub source: BookingSource,
}

impl ReserveOptions {
    /// Creates a new `ReserveOptions` with the given room type, stay, and
    /// guest name.
    ///
    /// Defaults: one room, one guest, no contact, direct source.
    #[must_use]
    pub fn new(room_type_id: i64, stay: Stay, guest_name: impl Into<String>) -> Self {
        Self {
            room_type_id,
            stay,
            num_rooms: 1,
            num_guests: 1,
            guest_name: guest_name.into(),
            guest_contact: None,
            source: BookingSource::Direct,
        }
    }

    /// Sets the room count.
    #[must_use]
    pub const fn with_num_rooms(mut self, num_rooms: u32) -> Self {
        self.num_rooms = num_rooms;
        self
    }

    /// Sets the guest count.
    #[must_use]
    pub const fn with_num_guests(mut self, num_guests: u32) -> Self {
        self.num_guests = num_guests;
        self
    }

    /// Sets the guest contact.
    #[must_use]
    pub fn with_guest_contact(mut self, contact: Option<String>) -> Self {
        self.guest_contact = contact;
        self
    }

    /// Sets the booking source.
    #[must_use]
    pub const fn with_source(mut self, source: BookingSource) -> Self {
        self.source = source;
        self
    }
}

/// Orchestrates booking mutations against the store and the lock service.
///
/// The coordinator owns no state of its own; it borrows a store connection,
/// a lock service, and the engine configuration, and optionally an event
/// sink for post-commit notifications.
pub struct ReservationCoordinator<'a> {
    store: &'a mut Store,
    locks: &'a dyn LockService,
    config: &'a Config,
    events: &'a dyn EventSink,
}

impl<'a> ReservationCoordinator<'a> {
    /// Creates a coordinator with no event sink.
    pub fn new(store: &'a mut Store, locks: &'a dyn LockService, config: &'a Config) -> Self {
        Self {
            store,
            locks,
            config,
            events: &NULL_SINK,
        }
    }

    /// Attaches an event sink for post-commit notifications.
    #[must_use]
    pub fn with_events(mut self, events: &'a dyn EventSink) -> Self {
        self.events = events;
        self
    }

    pub(crate) fn store_mut(&mut self) -> &mut Store {
        self.store
    }

    pub(crate) fn store(&self) -> &Store {
        self.store
    }

    pub(crate) fn config(&self) -> &Config {
        self.config
    }

    pub(crate) fn publish(&self, event: &BookingEvent) {
        self.events.publish(event);
    }

    /// Creates a booking, holding one lock per affected date or slot for
    /// the duration of the availability re-check and the atomic write.
    ///
    /// `today` anchors the past-date check; callers pass the current date.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - a validation error for malformed requests, rejected before any
    ///   lock is taken
    /// - [`Error::Conflict`] when a date/slot lock is contended; safe to
    ///   retry
    /// - [`Error::Unavailable`] when capacity ran out at the re-check; no
    ///   mutation has taken place
    pub fn reserve(&mut self, options: &ReserveOptions, today: NaiveDate) -> Result<Booking> {
        if options.stay.start_date() < today {
            return Err(Error::Validation {
                field: "stay".into(),
                message: format!(
                    "check-in {} is in the past (today is {today})",
                    options.stay.start_date()
                ),
            });
        }

        let room_type = self.store.get_room_type(options.room_type_id)?;
        let hotel = self.store.get_hotel(room_type.hotel_id)?;
        validate_request(&room_type, &options.stay, options.num_rooms, options.num_guests)?;

        let ttl = match options.stay {
            Stay::Daily { .. } => self.config.daily_lock_ttl,
            Stay::Hourly { .. } => self.config.slot_lock_ttl,
        };
        let lock_keys = options
            .stay
            .inventory_keys(room_type.id)
            .iter()
            .map(crate::inventory::InventoryKey::lock_key)
            .collect::<Vec<_>>();

        // Held until every exit path below; drop releases
        let _locks = LockSet::acquire(self.locks, lock_keys, ttl)?;

        // Re-check inside the lock window
        let quote = check_availability(
            self.store,
            self.config,
            &room_type,
            &options.stay,
            options.num_rooms,
            options.num_guests,
        )?;

        let commission_amount = if options.source.owes_commission() {
            round_commission(quote.pricing.total, hotel.commission_rate)
        } else {
            0
        };

        let now = SystemTime::now();
        let mut booking = Booking {
            id: 0,
            booking_number: generate_booking_number(options.stay.start_date()),
            hotel_id: hotel.id,
            room_type_id: room_type.id,
            stay: options.stay.clone(),
            num_rooms: options.num_rooms,
            num_guests: options.num_guests,
            guest_name: options.guest_name.clone(),
            guest_contact: options.guest_contact.clone(),
            pricing: quote.pricing,
            commission_amount,
            hotel_payout: quote.pricing.total - commission_amount,
            source: options.source,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            cancel_reason: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        };

        let mut attempts = 0;
        let booking_id = loop {
            match self
                .store
                .create_booking_atomic(&booking, room_type.total_rooms)
            {
                Ok(id) => break id,
                Err(e) if is_number_collision(&e) && attempts < MAX_NUMBER_ATTEMPTS => {
                    attempts += 1;
                    log::debug!(
                        "booking number {} collided, regenerating (attempt {attempts})",
                        booking.booking_number
                    );
                    booking.booking_number = generate_booking_number(options.stay.start_date());
                }
                Err(e) => return Err(e),
            }
        };
        booking.id = booking_id;

        log::info!(
            "created booking {} ({} room(s), {})",
            booking.booking_number,
            booking.num_rooms,
            booking.stay.start_date()
        );
        self.events.publish(&BookingEvent::Created {
            booking_id,
            booking_number: booking.booking_number.clone(),
        });

        Ok(booking)
    }
}

/// Commission in minor units, rounded to the nearest unit.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn round_commission(total: i64, rate: f64) -> i64 {
    ((total as f64) * rate).round() as i64
}

fn is_number_collision(e: &Error) -> bool {
    matches!(
        e,
        Error::Database(rusqlite::Error::SqliteFailure(inner, Some(msg)))
            if inner.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("booking_number")
    )
}
