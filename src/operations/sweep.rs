//! Stale pending booking sweep.
//!
//! A background scheduler calls this periodically to cancel unpaid pending
//! bookings that outlived their payment window, returning their inventory to
//! the pool. The sweep is best-effort per booking: one booking racing into a
//! confirmed state does not abort the rest of the pass.

use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::events::BookingEvent;

use super::reserve::ReservationCoordinator;

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepResult {
    /// Ids of bookings cancelled by this pass.
    pub cancelled: Vec<i64>,
    /// Bookings skipped because their status changed mid-sweep.
    pub skipped: usize,
}

impl ReservationCoordinator<'_> {
    /// Cancels every unpaid pending booking older than the configured stale
    /// age. Pending bookings whose payment already arrived are left for
    /// confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if the stale scan itself fails; per-booking
    /// cancellation races are counted as skipped, not errors.
    pub fn sweep_stale_pending(&mut self, now: SystemTime) -> Result<SweepResult> {
        let cutoff = now - self.config().stale_pending_age;
        let stale = self.store().list_stale_pending(cutoff)?;

        let mut result = SweepResult::default();
        for booking in stale {
            match self.store_mut().cancel_booking_atomic(
                booking.id,
                Some("payment window expired"),
                now,
            ) {
                Ok(cancelled) => {
                    log::info!(
                        "swept stale pending booking {}",
                        cancelled.booking_number
                    );
                    self.publish(&BookingEvent::Cancelled {
                        booking_id: booking.id,
                        reason: cancelled.cancel_reason.clone(),
                    });
                    result.cancelled.push(booking.id);
                }
                // Confirmed or cancelled by someone else between the scan
                // and the cancel
                Err(Error::StateTransition { .. } | Error::NotFound { .. }) => {
                    result.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingStatus, PaymentStatus};
    use crate::config::Config;
    use crate::inventory::InventoryKey;
    use crate::lock::SqliteLockService;
    use crate::store::test_util::{create_test_store, sample_booking, seed_hotel_and_room_type};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lock_service() -> SqliteLockService {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        let service = SqliteLockService::open(&path).unwrap();
        std::mem::forget(path);
        service
    }

    #[test]
    fn test_sweep_cancels_only_stale_pending() {
        let mut store = create_test_store();
        let (_, room_type) = seed_hotel_and_room_type(&mut store);

        let old = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
        let mut stale = sample_booking(&room_type, date(2026, 9, 1), 1, 1);
        stale.created_at = old;
        stale.updated_at = old;
        let stale_id = store
            .create_booking_atomic(&stale, room_type.total_rooms)
            .unwrap();

        let mut fresh = sample_booking(&room_type, date(2026, 9, 5), 1, 1);
        fresh.booking_number = "BK-20260905-FRESH0".to_string();
        let fresh_id = store
            .create_booking_atomic(&fresh, room_type.total_rooms)
            .unwrap();

        let locks = lock_service();
        let config = Config::default();
        let result = ReservationCoordinator::new(&mut store, &locks, &config)
            .sweep_stale_pending(SystemTime::now())
            .unwrap();

        assert_eq!(result.cancelled, vec![stale_id]);
        assert_eq!(result.skipped, 0);
        assert_eq!(
            store.get_booking(stale_id).unwrap().status,
            BookingStatus::Cancelled
        );
        assert_eq!(
            store.get_booking(fresh_id).unwrap().status,
            BookingStatus::Pending
        );

        // The swept booking's inventory is back in the pool
        let key = InventoryKey::daily(room_type.id, date(2026, 9, 1));
        let level = store.get_inventory_level(&key).unwrap().unwrap();
        assert_eq!(level.available, room_type.total_rooms);
    }

    #[test]
    fn test_sweep_leaves_paid_pending_alone() {
        let mut store = create_test_store();
        let (_, room_type) = seed_hotel_and_room_type(&mut store);

        let old = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
        let mut paid = sample_booking(&room_type, date(2026, 9, 1), 1, 1);
        paid.payment_status = PaymentStatus::Paid;
        paid.created_at = old;
        paid.updated_at = old;
        let paid_id = store
            .create_booking_atomic(&paid, room_type.total_rooms)
            .unwrap();

        let locks = lock_service();
        let config = Config::default();
        let result = ReservationCoordinator::new(&mut store, &locks, &config)
            .sweep_stale_pending(SystemTime::now())
            .unwrap();

        assert!(result.cancelled.is_empty());
        assert_eq!(
            store.get_booking(paid_id).unwrap().status,
            BookingStatus::Pending
        );
    }

    #[test]
    fn test_sweep_empty_store() {
        let mut store = create_test_store();
        seed_hotel_and_room_type(&mut store);
        let locks = lock_service();
        let config = Config::default();

        let result = ReservationCoordinator::new(&mut store, &locks, &config)
            .sweep_stale_pending(SystemTime::now())
            .unwrap();
        assert_eq!(result, SweepResult::default());
    }
}
