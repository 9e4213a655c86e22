//! Availability checks and price quoting.
//!
//! The checker reads inventory without taking any lock, so its answer is
//! advisory: a concurrent booking can consume the capacity between the check
//! and a later reservation. The reservation coordinator re-validates inside
//! the lock window with the same logic before writing anything.

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use crate::booking::{PricingBreakdown, Stay};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::hotel::RoomType;
use crate::inventory::{InventoryKey, InventoryLevel};
use crate::store::Store;

/// A priced availability answer for one prospective booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// The room type quoted.
    pub room_type_id: i64,
    /// The stay quoted.
    pub stay: Stay,
    /// Rooms requested.
    pub num_rooms: u32,
    /// Effective price per occupied date/slot, for a single room.
    pub unit_prices: Vec<(InventoryKey, i64)>,
    /// Itemized pricing for the full request.
    pub pricing: PricingBreakdown,
}

/// Validates the shape of a reservation request before touching inventory.
///
/// # Errors
///
/// Returns a validation error if room or guest counts are out of range, the
/// room type is inactive, or an hourly stay is requested on a room type
/// without hourly pricing.
pub fn validate_request(
    room_type: &RoomType,
    stay: &Stay,
    num_rooms: u32,
    num_guests: u32,
) -> Result<()> {
    if num_rooms == 0 {
        return Err(Error::validation("num_rooms", "must be at least 1"));
    }
    if num_guests == 0 {
        return Err(Error::validation("num_guests", "must be at least 1"));
    }
    if !room_type.is_active {
        return Err(Error::validation(
            "room_type",
            format!("room type {} is not accepting reservations", room_type.id),
        ));
    }
    let ceiling = num_rooms
        .checked_mul(room_type.guest_ceiling())
        .ok_or_else(|| Error::validation("num_rooms", "room count out of range"))?;
    if num_guests > ceiling {
        return Err(Error::validation(
            "num_guests",
            format!("{num_guests} guests exceed the limit of {ceiling} for {num_rooms} room(s)"),
        ));
    }
    if matches!(stay, Stay::Hourly { .. }) && room_type.base_price_hourly.is_none() {
        return Err(Error::validation(
            "stay",
            format!("room type {} does not offer hourly booking", room_type.id),
        ));
    }
    Ok(())
}

/// Checks availability and computes a quote for a prospective booking.
///
/// Uses the level as stored, or full capacity for dates never written.
///
/// # Errors
///
/// Returns:
/// - a validation error for malformed requests or unmet minimum stays
/// - [`Error::Unavailable`] when any date/slot is closed or short on rooms
pub fn check_availability(
    store: &Store,
    config: &Config,
    room_type: &RoomType,
    stay: &Stay,
    num_rooms: u32,
    num_guests: u32,
) -> Result<Quote> {
    validate_request(room_type, stay, num_rooms, num_guests)?;

    let base_price = match stay {
        Stay::Daily { .. } => room_type.base_price_daily,
        // validate_request guarantees hourly pricing exists
        Stay::Hourly { .. } => room_type.base_price_hourly.unwrap_or_default(),
    };

    let mut unit_prices = Vec::new();
    for key in stay.inventory_keys(room_type.id) {
        let level = store
            .get_inventory_level(&key)?
            .unwrap_or_else(|| InventoryLevel::full(room_type.total_rooms));

        if level.closed {
            return Err(Error::Unavailable {
                details: format!("{key} is closed to reservations"),
            });
        }
        if level.available < num_rooms {
            return Err(Error::Unavailable {
                details: format!(
                    "{key}: {} room(s) available, {num_rooms} requested",
                    level.available
                ),
            });
        }
        if stay.nights() < level.min_stay_nights {
            return Err(Error::validation(
                "stay",
                format!(
                    "{key} requires a minimum stay of {} night(s)",
                    level.min_stay_nights
                ),
            ));
        }

        unit_prices.push((key, level.effective_price(base_price)));
    }

    let pricing = compute_pricing(config, room_type, stay, &unit_prices, num_rooms, num_guests);

    Ok(Quote {
        room_type_id: room_type.id,
        stay: stay.clone(),
        num_rooms,
        unit_prices,
        pricing,
    })
}

/// Computes the itemized pricing for a request given per-unit prices.
///
/// Extra-guest charges apply to guests beyond the included count across all
/// rooms, per billable night. Tax applies to the room-plus-extras subtotal
/// and rounds to the nearest minor unit.
#[must_use]
pub fn compute_pricing(
    config: &Config,
    room_type: &RoomType,
    stay: &Stay,
    unit_prices: &[(InventoryKey, i64)],
    num_rooms: u32,
    num_guests: u32,
) -> PricingBreakdown {
    let room_total: i64 = unit_prices.iter().map(|(_, p)| p).sum::<i64>() * i64::from(num_rooms);

    let included = num_rooms * room_type.max_guests;
    let extra_guests = num_guests.saturating_sub(included);
    let extra_guest_total =
        i64::from(extra_guests) * room_type.extra_guest_charge * i64::from(stay.nights());

    let subtotal = room_total + extra_guest_total;
    let tax = ((subtotal as f64) * config.tax_rate).round() as i64;

    PricingBreakdown {
        room_total,
        extra_guest_total,
        tax,
        total: subtotal + tax,
    }
}
