//! Demand pricing tests: analysis over real occupancy, and suggestion
//! application feeding back into quotes.

use bookinn::operations::{ReservationCoordinator, ReserveOptions};
use bookinn::pricing::{DemandAnalyzer, DemandLevel, SuggestionApplier};
use bookinn::store::{Store, StoreConfig};
use bookinn::{
    check_availability, Config, Hotel, InventoryKey, RoomType, SqliteLockService, Stay,
};
use chrono::NaiveDate;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2026, 8, 27)
}

struct Fixture {
    _dir: TempDir,
    store: Store,
    locks: SqliteLockService,
    config: Config,
    room_type: RoomType,
}

fn fixture(total_rooms: u32) -> Fixture {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookinn.db");
    let mut store = Store::open(StoreConfig::new(&path)).unwrap();

    let hotel = Hotel::new(1, "Seaview", 0.15).unwrap();
    store.upsert_hotel(&hotel).unwrap();
    let room_type = RoomType::builder(1, hotel.id, "Deluxe")
        .total_rooms(total_rooms)
        .base_price_daily(3000)
        .max_guests(2)
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
fn nearly_full_weekday_suggests_a_surge_price() {
    // 25 rooms, 23 booked: occupancy 0.92 on a weekday with a long lead
    // gives multiplier 1.3 -> 3900 -> HIGH
    let mut fx = fixture(25);
    let mut coordinator = ReservationCoordinator::new(&mut fx.store, &fx.locks, &fx.config);

    // 2026-09-08 is a Tuesday
    let stay = Stay::daily(date(2026, 9, 8), date(2026, 9, 9)).unwrap();
    let options = ReserveOptions::new(fx.room_type.id, stay, "Tour Group")
        .with_num_rooms(23)
        .with_num_guests(23);
    coordinator.reserve(&options, today()).unwrap();

    let analyzer = DemandAnalyzer::new(&fx.store, &fx.config);
    let report = analyzer
        .analyze(fx.room_type.id, today(), date(2026, 9, 8), 1)
        .unwrap();

    let day = &report.suggestions[0];
    assert!((day.occupancy_rate - 0.92).abs() < 1e-9);
    assert!((day.multiplier - 1.3).abs() < 1e-9);
    assert_eq!(day.suggested_price, 3900);
    assert_eq!(day.demand_level, DemandLevel::High);

    // Revenue at current prices vs at the suggested price, for the 23
    // rooms already sold
    assert_eq!(report.current_revenue, 3000 * 23);
    assert_eq!(report.projected_revenue, 3900 * 23);
}

#[test]
fn empty_calendar_suggests_discounts() {
    let fx = fixture(5);
    let analyzer = DemandAnalyzer::new(&fx.store, &fx.config);

    // A quiet weekday far out: no history, no occupancy
    // 2026-09-07 is a Monday
    let report = analyzer
        .analyze(fx.room_type.id, today(), date(2026, 9, 7), 1)
        .unwrap();
    let day = &report.suggestions[0];
    assert!((day.multiplier - 0.85).abs() < 1e-9);
    assert_eq!(day.suggested_price, 2550);
    assert_eq!(day.demand_level, DemandLevel::Low);
}

#[test]
fn applied_suggestions_change_subsequent_quotes() {
    let mut fx = fixture(5);

    let items = vec![(date(2026, 9, 8), 3900), (date(2026, 9, 9), 3600)];
    let outcome = SuggestionApplier::new(&mut fx.store)
        .apply(fx.room_type.id, &items)
        .unwrap();
    assert_eq!(outcome.applied, 2);
    assert_eq!(outcome.skipped, 0);

    let stay = Stay::daily(date(2026, 9, 8), date(2026, 9, 10)).unwrap();
    let quote = check_availability(&fx.store, &fx.config, &fx.room_type, &stay, 1, 1).unwrap();
    assert_eq!(quote.pricing.room_total, 3900 + 3600);
}

#[test]
fn applying_twice_is_idempotent() {
    let mut fx = fixture(5);
    let items = vec![(date(2026, 9, 8), 3900)];

    SuggestionApplier::new(&mut fx.store)
        .apply(fx.room_type.id, &items)
        .unwrap();
    let key = InventoryKey::daily(fx.room_type.id, date(2026, 9, 8));
    let first = fx.store.get_inventory_level(&key).unwrap().unwrap();

    SuggestionApplier::new(&mut fx.store)
        .apply(fx.room_type.id, &items)
        .unwrap();
    let second = fx.store.get_inventory_level(&key).unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(second.price_override, Some(3900));
}

#[test]
fn overrides_survive_bookings_and_analysis_reflects_them() {
    let mut fx = fixture(5);

    SuggestionApplier::new(&mut fx.store)
        .apply(fx.room_type.id, &[(date(2026, 9, 8), 3900)])
        .unwrap();

    // Book two rooms on the overridden date at the override price
    let stay = Stay::daily(date(2026, 9, 8), date(2026, 9, 9)).unwrap();
    let options = ReserveOptions::new(fx.room_type.id, stay, "Ada Khumalo")
        .with_num_rooms(2)
        .with_num_guests(2);
    let booking = ReservationCoordinator::new(&mut fx.store, &fx.locks, &fx.config)
        .reserve(&options, today())
        .unwrap();
    assert_eq!(booking.pricing.room_total, 3900 * 2);

    // The analyzer reports the override as the current price
    let analyzer = DemandAnalyzer::new(&fx.store, &fx.config);
    let report = analyzer
        .analyze(fx.room_type.id, today(), date(2026, 9, 8), 1)
        .unwrap();
    assert_eq!(report.suggestions[0].current_price, 3900);
    assert_eq!(report.current_revenue, 3900 * 2);
}
