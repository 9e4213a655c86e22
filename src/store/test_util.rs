//! Shared test utilities for store unit tests.
//!
//! This module provides helper functions used across multiple store test
//! modules.

use std::time::SystemTime;

use chrono::NaiveDate;
use tempfile::tempdir;

use crate::booking::{
    Booking, BookingSource, BookingStatus, PaymentStatus, PricingBreakdown, Stay,
};
use crate::hotel::{Hotel, RoomType};
use crate::store::{Store, StoreConfig};

/// Creates a temporary test store that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or store cannot be created.
/// This is acceptable in test code where we want to fail fast.
#[must_use]
pub fn create_test_store() -> Store {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let config = StoreConfig::new(path);
    let store = Store::open(config).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    store
}

/// Seeds a hotel (id 1, 15% commission) with one room type (id 1, five
/// rooms at 3000/night) and returns both.
///
/// # Panics
///
/// Panics if the inserts fail.
pub fn seed_hotel_and_room_type(store: &mut Store) -> (Hotel, RoomType) {
    let hotel = Hotel::new(1, "Seaview", 0.15).unwrap();
    store.upsert_hotel(&hotel).unwrap();

    let room_type = RoomType::builder(1, hotel.id, "Deluxe")
        .total_rooms(5)
        .base_price_daily(3000)
        .base_price_hourly(Some(600))
        .max_guests(2)
        .max_extra_guests(1)
        .extra_guest_charge(500)
        .build()
        .unwrap();
    store.upsert_room_type(&room_type).unwrap();

    (hotel, room_type)
}

/// Builds a pending direct booking for tests: `nights` nights from
/// `check_in`, `num_rooms` rooms, one guest per room, flat test pricing.
///
/// # Panics
///
/// Panics if the stay dates are invalid.
#[must_use]
pub fn sample_booking(
    room_type: &RoomType,
    check_in: NaiveDate,
    nights: u32,
    num_rooms: u32,
) -> Booking {
    let check_out = check_in + chrono::Days::new(u64::from(nights));
    let stay = Stay::daily(check_in, check_out).unwrap();
    let room_total = room_type.base_price_daily * i64::from(nights) * i64::from(num_rooms);
    let now = SystemTime::now();

    Booking {
        id: 0,
        booking_number: format!("BK-{}-TEST00", check_in.format("%Y%m%d")),
        hotel_id: room_type.hotel_id,
        room_type_id: room_type.id,
        stay,
        num_rooms,
        num_guests: num_rooms,
        guest_name: "Test Guest".to_string(),
        guest_contact: None,
        pricing: PricingBreakdown {
            room_total,
            extra_guest_total: 0,
            tax: room_total * 12 / 100,
            total: room_total + room_total * 12 / 100,
        },
        commission_amount: 0,
        hotel_payout: room_total + room_total * 12 / 100,
        source: BookingSource::Direct,
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        cancel_reason: None,
        cancelled_at: None,
        created_at: now,
        updated_at: now,
    }
}
