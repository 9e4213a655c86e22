//! End-to-end booking lifecycle tests against a real store.

use bookinn::operations::{CancelOptions, ReservationCoordinator, ReserveOptions};
use bookinn::store::{Store, StoreConfig};
use bookinn::{
    BookingSource, BookingStatus, Config, Error, Hotel, InventoryKey, PaymentStatus, RoomType,
    SqliteLockService, Stay,
};
use chrono::NaiveDate;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2026, 8, 27)
}

/// A seeded store plus a lock service sharing its database file.
struct Fixture {
    _dir: TempDir,
    store: Store,
    locks: SqliteLockService,
    config: Config,
    room_type: RoomType,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookinn.db");
    let mut store = Store::open(StoreConfig::new(&path)).unwrap();

    let hotel = Hotel::new(1, "Seaview", 0.15).unwrap();
    store.upsert_hotel(&hotel).unwrap();
    let room_type = RoomType::builder(1, hotel.id, "Deluxe")
        .total_rooms(5)
        .base_price_daily(3000)
        .max_guests(2)
        .max_extra_guests(1)
        .extra_guest_charge(500)
        .build()
        .unwrap();
    store.upsert_room_type(&room_type).unwrap();

    let locks = SqliteLockService::open(&path).unwrap();
    Fixture {
        _dir: dir,
        store,
        locks,
        config: Config::default(),
        room_type,
    }
}

#[test]
fn two_night_booking_seeds_inventory_rows() {
    let mut fx = fixture();
    let stay = Stay::daily(date(2026, 9, 1), date(2026, 9, 3)).unwrap();
    let options = ReserveOptions::new(fx.room_type.id, stay, "Ada Khumalo")
        .with_num_rooms(2)
        .with_num_guests(4);

    let booking = ReservationCoordinator::new(&mut fx.store, &fx.locks, &fx.config)
        .reserve(&options, today())
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert!(booking.booking_number.starts_with("BK-20260901-"));

    // Both nights now have rows at 5 - 2 = 3
    for d in [date(2026, 9, 1), date(2026, 9, 2)] {
        let key = InventoryKey::daily(fx.room_type.id, d);
        let level = fx.store.get_inventory_level(&key).unwrap().unwrap();
        assert_eq!(level.available, 3);
    }
}

#[test]
fn full_lifecycle_to_checkout() {
    let mut fx = fixture();
    let stay = Stay::daily(date(2026, 9, 1), date(2026, 9, 2)).unwrap();
    let options = ReserveOptions::new(fx.room_type.id, stay, "Ada Khumalo");

    let mut coordinator = ReservationCoordinator::new(&mut fx.store, &fx.locks, &fx.config);
    let booking = coordinator.reserve(&options, today()).unwrap();

    let confirmed = coordinator.confirm(booking.id).unwrap();
    assert_eq!(confirmed.payment_status, PaymentStatus::Paid);

    coordinator.check_in(booking.id).unwrap();
    let done = coordinator.check_out(booking.id).unwrap();
    assert_eq!(done.status, BookingStatus::CheckedOut);

    // Terminal: cancellation is rejected and the status survives
    let err = coordinator
        .cancel(booking.id, &CancelOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::StateTransition { .. }));
    assert_eq!(
        fx.store.get_booking(booking.id).unwrap().status,
        BookingStatus::CheckedOut
    );
}

#[test]
fn cancellation_restores_exact_capacity() {
    let mut fx = fixture();
    let stay = Stay::daily(date(2026, 9, 1), date(2026, 9, 4)).unwrap();
    let options = ReserveOptions::new(fx.room_type.id, stay, "Ada Khumalo")
        .with_num_rooms(3)
        .with_num_guests(3);

    let mut coordinator = ReservationCoordinator::new(&mut fx.store, &fx.locks, &fx.config);
    let booking = coordinator.reserve(&options, today()).unwrap();

    coordinator
        .cancel(booking.id, &CancelOptions::new().with_reason("guest request"))
        .unwrap();

    for d in [date(2026, 9, 1), date(2026, 9, 2), date(2026, 9, 3)] {
        let key = InventoryKey::daily(fx.room_type.id, d);
        let level = fx.store.get_inventory_level(&key).unwrap().unwrap();
        assert_eq!(level.available, fx.room_type.total_rooms);
    }
}

#[test]
fn platform_booking_writes_commission_ledger() {
    let mut fx = fixture();
    let stay = Stay::daily(date(2026, 9, 1), date(2026, 9, 3)).unwrap();
    let options = ReserveOptions::new(fx.room_type.id, stay, "Ada Khumalo")
        .with_source(BookingSource::Bluestay);

    let booking = ReservationCoordinator::new(&mut fx.store, &fx.locks, &fx.config)
        .reserve(&options, today())
        .unwrap();

    assert!(booking.commission_amount > 0);
    assert_eq!(
        booking.hotel_payout,
        booking.pricing.total - booking.commission_amount
    );

    let commission = fx.store.get_commission(booking.id).unwrap().unwrap();
    assert_eq!(commission.amount, booking.commission_amount);
    assert_eq!(commission.booking_amount, booking.pricing.total);
}

#[test]
fn overlapping_bookings_respect_capacity_invariant() {
    let mut fx = fixture();
    let mut coordinator = ReservationCoordinator::new(&mut fx.store, &fx.locks, &fx.config);

    // Three overlapping stays covering 2026-09-02: 2 + 2 + 1 = 5 rooms
    for (start, end, rooms, name) in [
        (date(2026, 9, 1), date(2026, 9, 3), 2, "Ada"),
        (date(2026, 9, 2), date(2026, 9, 4), 2, "Ben"),
        (date(2026, 9, 2), date(2026, 9, 3), 1, "Cara"),
    ] {
        let stay = Stay::daily(start, end).unwrap();
        let options = ReserveOptions::new(fx.room_type.id, stay, name)
            .with_num_rooms(rooms)
            .with_num_guests(rooms);
        coordinator.reserve(&options, today()).unwrap();
    }

    // 2026-09-02 is fully booked now; one more room must be refused
    let stay = Stay::daily(date(2026, 9, 2), date(2026, 9, 3)).unwrap();
    let options = ReserveOptions::new(fx.room_type.id, stay, "Dan");
    let err = coordinator.reserve(&options, today()).unwrap_err();
    assert!(matches!(err, Error::Unavailable { .. }));

    let key = InventoryKey::daily(fx.room_type.id, date(2026, 9, 2));
    let level = fx.store.get_inventory_level(&key).unwrap().unwrap();
    assert_eq!(level.available, 0);
}

#[test]
fn hourly_booking_lifecycle() {
    let mut fx = fixture();
    // Give the room type hourly pricing
    let mut room_type = fx.room_type.clone();
    room_type.base_price_hourly = Some(600);
    fx.store.upsert_room_type(&room_type).unwrap();

    let slot = bookinn::Slot::parse("10:00-14:00").unwrap();
    let stay = Stay::hourly(date(2026, 9, 1), slot);
    let options = ReserveOptions::new(room_type.id, stay.clone(), "Ada Khumalo");

    let mut coordinator = ReservationCoordinator::new(&mut fx.store, &fx.locks, &fx.config);
    let booking = coordinator.reserve(&options, today()).unwrap();
    assert_eq!(booking.stay, stay);
    assert_eq!(booking.pricing.room_total, 600);

    coordinator
        .cancel(booking.id, &CancelOptions::new())
        .unwrap();
    let key = InventoryKey::hourly(room_type.id, date(2026, 9, 1), slot);
    let level = fx.store.get_inventory_level(&key).unwrap().unwrap();
    assert_eq!(level.available, room_type.total_rooms);
}
