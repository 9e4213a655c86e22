//! Bulk application of accepted price suggestions.
//!
//! Unlike the reservation write path, applying suggestions is explicitly
//! best-effort: each date is upserted independently and a failing item is
//! counted as skipped without aborting the rest.

use chrono::NaiveDate;

use crate::error::Result;
use crate::inventory::InventoryKey;
use crate::store::Store;

/// Outcome of one apply pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Price overrides written.
    pub applied: usize,
    /// Items skipped due to validation or write failure.
    pub skipped: usize,
}

/// Writes accepted price suggestions as inventory price overrides.
pub struct SuggestionApplier<'a> {
    store: &'a mut Store,
}

impl<'a> SuggestionApplier<'a> {
    /// Creates an applier over the given store.
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    /// Upserts one price override per (date, price) pair for a room type.
    ///
    /// Non-positive prices and per-item write failures are skipped, not
    /// fatal. Applying the same list twice leaves identical overrides.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for an unknown room type; per-item
    /// failures never surface as errors.
    pub fn apply(&mut self, room_type_id: i64, items: &[(NaiveDate, i64)]) -> Result<ApplyOutcome> {
        let room_type = self.store.get_room_type(room_type_id)?;

        let mut outcome = ApplyOutcome::default();
        for &(date, price) in items {
            if price <= 0 {
                log::warn!("skipping non-positive price {price} for {date}");
                outcome.skipped += 1;
                continue;
            }

            let key = InventoryKey::daily(room_type_id, date);
            match self
                .store
                .set_price_override(&key, room_type.total_rooms, Some(price))
            {
                Ok(()) => outcome.applied += 1,
                Err(e) => {
                    log::warn!("failed to apply price for {date}: {e}");
                    outcome.skipped += 1;
                }
            }
        }

        log::info!(
            "applied {} price override(s) for room type {room_type_id}, skipped {}",
            outcome.applied,
            outcome.skipped
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::test_util::{create_test_store, seed_hotel_and_room_type};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_apply_writes_overrides() {
        let mut store = create_test_store();
        let (_, room_type) = seed_hotel_and_room_type(&mut store);

        let items = vec![(date(2026, 9, 1), 3900), (date(2026, 9, 2), 3450)];
        let outcome = SuggestionApplier::new(&mut store)
            .apply(room_type.id, &items)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome { applied: 2, skipped: 0 });

        for (d, price) in items {
            let key = InventoryKey::daily(room_type.id, d);
            let level = store.get_inventory_level(&key).unwrap().unwrap();
            assert_eq!(level.price_override, Some(price));
            // Applying never consumes capacity
            assert_eq!(level.available, room_type.total_rooms);
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut store = create_test_store();
        let (_, room_type) = seed_hotel_and_room_type(&mut store);

        let items = vec![(date(2026, 9, 1), 3900)];
        SuggestionApplier::new(&mut store)
            .apply(room_type.id, &items)
            .unwrap();
        SuggestionApplier::new(&mut store)
            .apply(room_type.id, &items)
            .unwrap();

        let key = InventoryKey::daily(room_type.id, date(2026, 9, 1));
        let level = store.get_inventory_level(&key).unwrap().unwrap();
        assert_eq!(level.price_override, Some(3900));
    }

    #[test]
    fn test_apply_skips_bad_prices_without_aborting() {
        let mut store = create_test_store();
        let (_, room_type) = seed_hotel_and_room_type(&mut store);

        let items = vec![
            (date(2026, 9, 1), 3900),
            (date(2026, 9, 2), 0),
            (date(2026, 9, 3), -50),
            (date(2026, 9, 4), 3450),
        ];
        let outcome = SuggestionApplier::new(&mut store)
            .apply(room_type.id, &items)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome { applied: 2, skipped: 2 });
    }

    #[test]
    fn test_apply_unknown_room_type() {
        let mut store = create_test_store();
        seed_hotel_and_room_type(&mut store);

        let err = SuggestionApplier::new(&mut store)
            .apply(42, &[(date(2026, 9, 1), 3900)])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_applied_override_feeds_quotes() {
        use crate::availability::check_availability;
        use crate::booking::Stay;

        let mut store = create_test_store();
        let (_, room_type) = seed_hotel_and_room_type(&mut store);
        let config = Config::default();

        SuggestionApplier::new(&mut store)
            .apply(room_type.id, &[(date(2026, 9, 1), 3900)])
            .unwrap();

        let stay = Stay::daily(date(2026, 9, 1), date(2026, 9, 2)).unwrap();
        let quote = check_availability(&store, &config, &room_type, &stay, 1, 1).unwrap();
        assert_eq!(quote.pricing.room_total, 3900);
    }
}
