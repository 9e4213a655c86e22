//! Hotel and room type entities.
//!
//! A [`RoomType`] is the bookable unit of the system: a category of identical
//! rooms within a hotel with a fixed capacity ceiling and base prices. Room
//! types are immutable during a reservation; only the excluded admin surface
//! mutates them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A minimal hotel record.
///
/// Only the fields the reservation core needs are carried here; full hotel
/// CRUD lives in the upstream admin surface. The commission rate is the
/// fraction of a platform-sourced booking total owed to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    /// Unique hotel identifier.
    pub id: i64,
    /// Hotel display name.
    pub name: String,
    /// Commission rate in [0, 1] applied to platform-sourced bookings.
    pub commission_rate: f64,
}

impl Hotel {
    /// Creates a new hotel record.
    ///
    /// # Errors
    ///
    /// Returns an error if the commission rate is outside [0, 1].
    pub fn new(id: i64, name: impl Into<String>, commission_rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&commission_rate) {
            return Err(Error::validation(
                "commission_rate",
                format!("must be in [0, 1], got {commission_rate}"),
            ));
        }
        Ok(Self {
            id,
            name: name.into(),
            commission_rate,
        })
    }
}

/// A bookable room category with a fixed room count and base prices.
///
/// Prices are in minor currency units. `total_rooms` is the capacity ceiling
/// for every date: no combination of active bookings may ever hold more rooms
/// than this on a single date.
///
/// # Examples
///
/// ```
/// use bookinn::RoomType;
///
/// let room_type = RoomType::builder(1, 10, "Deluxe")
///     .total_rooms(5)
///     .base_price_daily(3000)
///     .max_guests(2)
///     .build()
///     .unwrap();
///
/// assert_eq!(room_type.total_rooms, 5);
/// assert!(room_type.is_active);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    /// Unique room type identifier.
    pub id: i64,
    /// The hotel this room type belongs to.
    pub hotel_id: i64,
    /// Display name.
    pub name: String,
    /// Capacity ceiling: number of physical rooms of this type.
    pub total_rooms: u32,
    /// Base nightly price in minor currency units.
    pub base_price_daily: i64,
    /// Base price for an hourly slot, if hourly booking is offered.
    pub base_price_hourly: Option<i64>,
    /// Maximum guests included in the base price, per room.
    pub max_guests: u32,
    /// Maximum additional guests allowed beyond `max_guests`, per room.
    pub max_extra_guests: u32,
    /// Nightly charge per extra guest, in minor currency units.
    pub extra_guest_charge: i64,
    /// Whether this room type currently accepts reservations.
    pub is_active: bool,
}

impl RoomType {
    /// Creates a new room type builder.
    #[must_use]
    pub fn builder(id: i64, hotel_id: i64, name: impl Into<String>) -> RoomTypeBuilder {
        RoomTypeBuilder {
            id,
            hotel_id,
            name: name.into(),
            total_rooms: 1,
            base_price_daily: 0,
            base_price_hourly: None,
            max_guests: 1,
            max_extra_guests: 0,
            extra_guest_charge: 0,
            is_active: true,
        }
    }

    /// Maximum total guests per room, including chargeable extras.
    #[must_use]
    pub const fn guest_ceiling(&self) -> u32 {
        self.max_guests + self.max_extra_guests
    }
}

/// Builder for [`RoomType`] instances.
#[derive(Debug)]
pub struct RoomTypeBuilder {
    id: i64,
    hotel_id: i64,
    name: String,
    total_rooms: u32,
    base_price_daily: i64,
    base_price_hourly: Option<i64>,
    max_guests: u32,
    max_extra_guests: u32,
    extra_guest_charge: i64,
    is_active: bool,
}

impl RoomTypeBuilder {
    /// Sets the capacity ceiling.
    #[must_use]
    pub const fn total_rooms(mut self, total_rooms: u32) -> Self {
        self.total_rooms = total_rooms;
        self
    }

    /// Sets the base nightly price.
    #[must_use]
    pub const fn base_price_daily(mut self, price: i64) -> Self {
        self.base_price_daily = price;
        self
    }

    /// Sets the base hourly-slot price.
    #[must_use]
    pub const fn base_price_hourly(mut self, price: Option<i64>) -> Self {
        self.base_price_hourly = price;
        self
    }

    /// Sets the included guest count per room.
    #[must_use]
    pub const fn max_guests(mut self, max_guests: u32) -> Self {
        self.max_guests = max_guests;
        self
    }

    /// Sets the allowed extra guest count per room.
    #[must_use]
    pub const fn max_extra_guests(mut self, max_extra_guests: u32) -> Self {
        self.max_extra_guests = max_extra_guests;
        self
    }

    /// Sets the nightly charge per extra guest.
    #[must_use]
    pub const fn extra_guest_charge(mut self, charge: i64) -> Self {
        self.extra_guest_charge = charge;
        self
    }

    /// Sets whether the room type accepts reservations.
    #[must_use]
    pub const fn is_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    /// Builds the room type.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `total_rooms` is zero
    /// - `base_price_daily` is negative
    /// - a negative hourly price or extra guest charge is given
    /// - `max_guests` is zero
    pub fn build(self) -> Result<RoomType> {
        if self.total_rooms == 0 {
            return Err(Error::validation("total_rooms", "must be at least 1"));
        }
        if self.base_price_daily < 0 {
            return Err(Error::validation("base_price_daily", "must not be negative"));
        }
        if matches!(self.base_price_hourly, Some(p) if p < 0) {
            return Err(Error::validation("base_price_hourly", "must not be negative"));
        }
        if self.extra_guest_charge < 0 {
            return Err(Error::validation(
                "extra_guest_charge",
                "must not be negative",
            ));
        }
        if self.max_guests == 0 {
            return Err(Error::validation("max_guests", "must be at least 1"));
        }

        Ok(RoomType {
            id: self.id,
            hotel_id: self.hotel_id,
            name: self.name,
            total_rooms: self.total_rooms,
            base_price_daily: self.base_price_daily,
            base_price_hourly: self.base_price_hourly,
            max_guests: self.max_guests,
            max_extra_guests: self.max_extra_guests,
            extra_guest_charge: self.extra_guest_charge,
            is_active: self.is_active,
        })
    }
}
