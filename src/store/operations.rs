//! Store CRUD operations for hotels, room types, inventory, and bookings.
//!
//! This module implements all persistent operations of the reservation
//! engine. The two multi-row mutations (`create_booking_atomic` and
//! `cancel_booking_atomic`) each run inside a single immediate transaction;
//! everything the reservation protocol promises about atomicity lives here.

use std::time::{Duration, SystemTime};

use chrono::NaiveDate;
use rusqlite::{params, TransactionBehavior};

use crate::booking::{
    Booking, BookingSource, BookingStatus, Commission, CommissionStatus, PaymentStatus,
    PricingBreakdown, Stay,
};
use crate::error::{Error, Result};
use crate::hotel::{Hotel, RoomType};
use crate::inventory::{InventoryKey, InventoryLevel, Slot};

use super::connection::Store;
use super::schema::{
    DECREMENT_INVENTORY, INSERT_BOOKING, INSERT_COMMISSION, RESTORE_INVENTORY, SEED_INVENTORY_ROW,
};

/// Converts a `SystemTime` to Unix epoch seconds for storage.
///
/// # Errors
///
/// Returns an error if the time is before the Unix epoch.
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn systemtime_to_unix_secs(time: SystemTime) -> Result<i64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| Error::Validation {
            field: "timestamp".into(),
            message: format!("Invalid timestamp: {e}"),
        })
        .map(|d| d.as_secs() as i64)
}

/// Converts Unix epoch seconds from the store to a `SystemTime`.
#[allow(clippy::cast_sign_loss)]
pub(crate) fn unix_secs_to_systemtime(secs: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs as u64)
}

fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn to_sql_err(e: Error) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(e))
}

/// The encoding of an inventory key's slot column: empty string for daily
/// rows, the slot's display form for hourly rows.
fn slot_column(key: &InventoryKey) -> String {
    key.slot.map(|s| s.to_string()).unwrap_or_default()
}

/// Helper function to deserialize a booking from a store row.
///
/// Expects the full column list of the bookings table in schema order.
fn row_to_booking(row: &rusqlite::Row<'_>) -> rusqlite::Result<Booking> {
    let check_in = parse_date(&row.get::<_, String>(4)?)?;
    let check_out: Option<String> = row.get(5)?;
    let slot: String = row.get(6)?;

    let stay = match check_out {
        Some(out) => Stay::daily(check_in, parse_date(&out)?).map_err(to_sql_err)?,
        None => {
            let slot = Slot::parse(&slot).map_err(to_sql_err)?;
            Stay::hourly(check_in, slot)
        }
    };

    let source = BookingSource::parse(&row.get::<_, String>(17)?).map_err(to_sql_err)?;
    let status = BookingStatus::parse(&row.get::<_, String>(18)?).map_err(to_sql_err)?;
    let payment_status = PaymentStatus::parse(&row.get::<_, String>(19)?).map_err(to_sql_err)?;

    Ok(Booking {
        id: row.get(0)?,
        booking_number: row.get(1)?,
        hotel_id: row.get(2)?,
        room_type_id: row.get(3)?,
        stay,
        num_rooms: row.get(7)?,
        num_guests: row.get(8)?,
        guest_name: row.get(9)?,
        guest_contact: row.get(10)?,
        pricing: PricingBreakdown {
            room_total: row.get(11)?,
            extra_guest_total: row.get(12)?,
            tax: row.get(13)?,
            total: row.get(14)?,
        },
        commission_amount: row.get(15)?,
        hotel_payout: row.get(16)?,
        source,
        status,
        payment_status,
        cancel_reason: row.get(20)?,
        cancelled_at: row.get::<_, Option<i64>>(21)?.map(unix_secs_to_systemtime),
        created_at: unix_secs_to_systemtime(row.get(22)?),
        updated_at: unix_secs_to_systemtime(row.get(23)?),
    })
}

const BOOKING_COLUMNS: &str = r"
    id, booking_number, hotel_id, room_type_id, check_in, check_out, slot,
    num_rooms, num_guests, guest_name, guest_contact,
    room_total, extra_guest_total, tax, total,
    commission_amount, hotel_payout, source, status, payment_status,
    cancel_reason, cancelled_at, created_at, updated_at
";

const SELECT_INVENTORY_LEVEL: &str = r"
    SELECT available, price_override, closed, min_stay_nights
    FROM room_inventory
    WHERE room_type_id = ? AND date = ? AND slot = ?
";

const UPDATE_BOOKING_STATUS: &str = r"
    UPDATE bookings
    SET status = ?, updated_at = ?
    WHERE id = ? AND status = ?
";

impl Store {
    /// Inserts or replaces a hotel record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn upsert_hotel(&mut self, hotel: &Hotel) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO hotels (id, name, commission_rate) VALUES (?, ?, ?)",
            params![hotel.id, hotel.name, hotel.commission_rate],
        )?;
        Ok(())
    }

    /// Fetches a hotel by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no hotel with the id exists.
    pub fn get_hotel(&self, id: i64) -> Result<Hotel> {
        self.conn
            .query_row(
                "SELECT id, name, commission_rate FROM hotels WHERE id = ?",
                [id],
                |row| {
                    Ok(Hotel {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        commission_rate: row.get(2)?,
                    })
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFound {
                    resource: format!("hotel {id}"),
                },
                other => other.into(),
            })
    }

    /// Inserts or replaces a room type.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn upsert_room_type(&mut self, room_type: &RoomType) -> Result<()> {
        self.conn.execute(
            r"INSERT OR REPLACE INTO room_types
              (id, hotel_id, name, total_rooms, base_price_daily, base_price_hourly,
               max_guests, max_extra_guests, extra_guest_charge, is_active)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                room_type.id,
                room_type.hotel_id,
                room_type.name,
                room_type.total_rooms,
                room_type.base_price_daily,
                room_type.base_price_hourly,
                room_type.max_guests,
                room_type.max_extra_guests,
                room_type.extra_guest_charge,
                room_type.is_active,
            ],
        )?;
        Ok(())
    }

    /// Fetches a room type by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no room type with the id exists.
    pub fn get_room_type(&self, id: i64) -> Result<RoomType> {
        self.conn
            .query_row(
                r"SELECT id, hotel_id, name, total_rooms, base_price_daily, base_price_hourly,
                         max_guests, max_extra_guests, extra_guest_charge, is_active
                  FROM room_types WHERE id = ?",
                [id],
                |row| {
                    Ok(RoomType {
                        id: row.get(0)?,
                        hotel_id: row.get(1)?,
                        name: row.get(2)?,
                        total_rooms: row.get(3)?,
                        base_price_daily: row.get(4)?,
                        base_price_hourly: row.get(5)?,
                        max_guests: row.get(6)?,
                        max_extra_guests: row.get(7)?,
                        extra_guest_charge: row.get(8)?,
                        is_active: row.get(9)?,
                    })
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFound {
                    resource: format!("room type {id}"),
                },
                other => other.into(),
            })
    }

    /// Lists all room types of a hotel.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_room_types(&self, hotel_id: i64) -> Result<Vec<RoomType>> {
        let mut stmt = self.conn.prepare(
            r"SELECT id, hotel_id, name, total_rooms, base_price_daily, base_price_hourly,
                     max_guests, max_extra_guests, extra_guest_charge, is_active
              FROM room_types WHERE hotel_id = ? ORDER BY id",
        )?;
        let rows = stmt.query_map([hotel_id], |row| {
            Ok(RoomType {
                id: row.get(0)?,
                hotel_id: row.get(1)?,
                name: row.get(2)?,
                total_rooms: row.get(3)?,
                base_price_daily: row.get(4)?,
                base_price_hourly: row.get(5)?,
                max_guests: row.get(6)?,
                max_extra_guests: row.get(7)?,
                extra_guest_charge: row.get(8)?,
                is_active: row.get(9)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    /// Reads the inventory level for one key, if a row exists.
    ///
    /// A `None` means the row has never been written: full capacity at the
    /// base price, open, no minimum stay.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_inventory_level(&self, key: &InventoryKey) -> Result<Option<InventoryLevel>> {
        match self.conn.query_row(
            SELECT_INVENTORY_LEVEL,
            params![key.room_type_id, key.date.to_string(), slot_column(key)],
            |row| {
                Ok(InventoryLevel {
                    available: row.get(0)?,
                    price_override: row.get(1)?,
                    closed: row.get(2)?,
                    min_stay_nights: row.get(3)?,
                })
            },
        ) {
            Ok(level) => Ok(Some(level)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Sets or clears the operator price override for one inventory key,
    /// seeding the row at full capacity if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_price_override(
        &mut self,
        key: &InventoryKey,
        total_rooms: u32,
        price: Option<i64>,
    ) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            SEED_INVENTORY_ROW,
            params![
                key.room_type_id,
                key.date.to_string(),
                slot_column(key),
                total_rooms
            ],
        )?;
        tx.execute(
            r"UPDATE room_inventory SET price_override = ?4
              WHERE room_type_id = ?1 AND date = ?2 AND slot = ?3",
            params![key.room_type_id, key.date.to_string(), slot_column(key), price],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Opens or closes one inventory key to new reservations, seeding the
    /// row at full capacity if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_closed(&mut self, key: &InventoryKey, total_rooms: u32, closed: bool) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            SEED_INVENTORY_ROW,
            params![
                key.room_type_id,
                key.date.to_string(),
                slot_column(key),
                total_rooms
            ],
        )?;
        tx.execute(
            r"UPDATE room_inventory SET closed = ?4
              WHERE room_type_id = ?1 AND date = ?2 AND slot = ?3",
            params![key.room_type_id, key.date.to_string(), slot_column(key), closed],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Sets the minimum stay requirement for one inventory key, seeding the
    /// row at full capacity if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_min_stay(
        &mut self,
        key: &InventoryKey,
        total_rooms: u32,
        min_stay_nights: u32,
    ) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            SEED_INVENTORY_ROW,
            params![
                key.room_type_id,
                key.date.to_string(),
                slot_column(key),
                total_rooms
            ],
        )?;
        tx.execute(
            r"UPDATE room_inventory SET min_stay_nights = ?4
              WHERE room_type_id = ?1 AND date = ?2 AND slot = ?3",
            params![
                key.room_type_id,
                key.date.to_string(),
                slot_column(key),
                min_stay_nights
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Creates a booking and decrements inventory for every occupied
    /// date/slot, all inside one immediate transaction.
    ///
    /// Inventory rows are seeded lazily at full capacity, then decremented
    /// conditionally: the update's WHERE clause re-checks `available` and
    /// `closed`, so a concurrent writer that got there first makes the
    /// decrement touch zero rows and the whole transaction rolls back.
    ///
    /// On success the booking's store id is returned; the commission ledger
    /// row, when the booking owes one, commits atomically with it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] naming the first date or slot that was
    /// short on capacity or closed. No mutation survives in that case.
    /// A duplicate booking number surfaces as a database constraint error;
    /// the coordinator regenerates and retries.
    pub fn create_booking_atomic(&mut self, booking: &Booking, total_rooms: u32) -> Result<i64> {
        let keys = booking.inventory_keys();
        let created_secs = systemtime_to_unix_secs(booking.created_at)?;
        let updated_secs = systemtime_to_unix_secs(booking.updated_at)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        for key in &keys {
            let date = key.date.to_string();
            let slot = slot_column(key);
            tx.execute(
                SEED_INVENTORY_ROW,
                params![key.room_type_id, date, slot, total_rooms],
            )?;
            let updated = tx.execute(
                DECREMENT_INVENTORY,
                params![key.room_type_id, date, slot, booking.num_rooms],
            )?;
            if updated == 0 {
                // Dropping the transaction rolls back earlier decrements
                return Err(Error::Unavailable {
                    details: format!(
                        "{key}: fewer than {} rooms available or closed",
                        booking.num_rooms
                    ),
                });
            }
        }

        let (check_in, check_out, slot) = match &booking.stay {
            Stay::Daily {
                check_in,
                check_out,
            } => (check_in.to_string(), Some(check_out.to_string()), String::new()),
            Stay::Hourly { date, slot } => (date.to_string(), None, slot.to_string()),
        };

        tx.execute(
            INSERT_BOOKING,
            params![
                booking.booking_number,
                booking.hotel_id,
                booking.room_type_id,
                check_in,
                check_out,
                slot,
                booking.num_rooms,
                booking.num_guests,
                booking.guest_name,
                booking.guest_contact,
                booking.pricing.room_total,
                booking.pricing.extra_guest_total,
                booking.pricing.tax,
                booking.pricing.total,
                booking.commission_amount,
                booking.hotel_payout,
                booking.source.to_string(),
                booking.status.to_string(),
                booking.payment_status.to_string(),
                booking.cancel_reason,
                booking
                    .cancelled_at
                    .map(systemtime_to_unix_secs)
                    .transpose()?,
                created_secs,
                updated_secs,
            ],
        )?;
        let booking_id = tx.last_insert_rowid();

        if booking.commission_amount > 0 {
            let rate = tx.query_row(
                "SELECT commission_rate FROM hotels WHERE id = ?",
                [booking.hotel_id],
                |row| row.get::<_, f64>(0),
            )?;
            tx.execute(
                INSERT_COMMISSION,
                params![
                    booking_id,
                    booking.hotel_id,
                    booking.pricing.total,
                    rate,
                    booking.commission_amount,
                    created_secs
                ],
            )?;
        }

        tx.commit()?;
        Ok(booking_id)
    }

    /// Fetches a booking by store id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no booking with the id exists.
    pub fn get_booking(&self, id: i64) -> Result<Booking> {
        self.conn
            .query_row(
                &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"),
                [id],
                row_to_booking,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFound {
                    resource: format!("booking {id}"),
                },
                other => other.into(),
            })
    }

    /// Fetches a booking by its booking number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no booking with the number exists.
    pub fn get_booking_by_number(&self, number: &str) -> Result<Booking> {
        self.conn
            .query_row(
                &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_number = ?"),
                [number],
                row_to_booking,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFound {
                    resource: format!("booking {number}"),
                },
                other => other.into(),
            })
    }

    /// Transitions a booking's status with a compare-and-set on the
    /// expected current status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateTransition`] if the transition is illegal or
    /// the booking's status changed underneath the caller, and
    /// [`Error::NotFound`] if the booking does not exist.
    pub fn update_booking_status(
        &mut self,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
        now: SystemTime,
    ) -> Result<()> {
        if !from.can_transition(to) {
            return Err(Error::StateTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let updated = self.conn.execute(
            UPDATE_BOOKING_STATUS,
            params![
                to.to_string(),
                systemtime_to_unix_secs(now)?,
                id,
                from.to_string()
            ],
        )?;
        if updated == 0 {
            // Either the booking is gone or a concurrent writer moved it
            let current = self.get_booking(id)?;
            return Err(Error::StateTransition {
                from: current.status.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    /// Confirms a pending booking and marks its payment received, in one
    /// statement.
    ///
    /// The status check and both writes share a single `UPDATE`, so a
    /// concurrent cancel or sweep can never leave a confirmed-but-unpaid or
    /// paid-but-cancelled row behind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the booking does not exist and
    /// [`Error::StateTransition`] if it is no longer pending.
    pub fn confirm_booking_atomic(&mut self, id: i64, now: SystemTime) -> Result<Booking> {
        let updated = self.conn.execute(
            r"UPDATE bookings SET status = ?, payment_status = ?, updated_at = ?
              WHERE id = ? AND status = ?",
            params![
                BookingStatus::Confirmed.to_string(),
                PaymentStatus::Paid.to_string(),
                systemtime_to_unix_secs(now)?,
                id,
                BookingStatus::Pending.to_string()
            ],
        )?;
        if updated == 0 {
            let current = self.get_booking(id)?;
            return Err(Error::StateTransition {
                from: current.status.to_string(),
                to: BookingStatus::Confirmed.to_string(),
            });
        }
        self.get_booking(id)
    }

    /// Cancels a booking and restores its inventory, all inside one
    /// immediate transaction.
    ///
    /// The status is re-read inside the transaction, so a booking confirmed
    /// or cancelled by a concurrent writer is handled correctly. Paid
    /// bookings are marked refunded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the booking does not exist and
    /// [`Error::StateTransition`] if its current status does not allow
    /// cancellation. No mutation survives in either case.
    pub fn cancel_booking_atomic(
        &mut self,
        id: i64,
        reason: Option<&str>,
        now: SystemTime,
    ) -> Result<Booking> {
        let now_secs = systemtime_to_unix_secs(now)?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let booking = tx
            .query_row(
                &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"),
                [id],
                row_to_booking,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFound {
                    resource: format!("booking {id}"),
                },
                other => other.into(),
            })?;

        if !booking.status.can_transition(BookingStatus::Cancelled) {
            return Err(Error::StateTransition {
                from: booking.status.to_string(),
                to: BookingStatus::Cancelled.to_string(),
            });
        }

        let payment_status = match booking.payment_status {
            PaymentStatus::Paid => PaymentStatus::Refunded,
            other => other,
        };

        tx.execute(
            r"UPDATE bookings
              SET status = ?, payment_status = ?, cancel_reason = ?,
                  cancelled_at = ?, updated_at = ?
              WHERE id = ?",
            params![
                BookingStatus::Cancelled.to_string(),
                payment_status.to_string(),
                reason,
                now_secs,
                now_secs,
                id
            ],
        )?;

        for key in booking.inventory_keys() {
            tx.execute(
                RESTORE_INVENTORY,
                params![
                    key.room_type_id,
                    key.date.to_string(),
                    slot_column(&key),
                    booking.num_rooms
                ],
            )?;
        }

        tx.commit()?;
        self.get_booking(id)
    }

    /// Lists unpaid pending bookings created before `cutoff`, oldest first.
    ///
    /// A pending booking whose payment already arrived is waiting on
    /// confirmation, not on the guest, and is not a sweep candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_stale_pending(&self, cutoff: SystemTime) -> Result<Vec<Booking>> {
        let cutoff_secs = systemtime_to_unix_secs(cutoff)?;
        let mut stmt = self.conn.prepare(&format!(
            r"SELECT {BOOKING_COLUMNS} FROM bookings
              WHERE status = 'PENDING' AND payment_status = 'UNPAID' AND created_at < ?
              ORDER BY created_at"
        ))?;
        let rows = stmt.query_map([cutoff_secs], row_to_booking)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    /// Lists confirmed, checked-in, and checked-out bookings for a room type
    /// with check-in on or after `since`. Demand history for the pricing
    /// analyzer; pending and no-show bookings never materialized as demand.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings_since(
        &self,
        room_type_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<Booking>> {
        let mut stmt = self.conn.prepare(&format!(
            r"SELECT {BOOKING_COLUMNS} FROM bookings
              WHERE room_type_id = ? AND check_in >= ?
                AND status IN ('CONFIRMED', 'CHECKED_IN', 'CHECKED_OUT')
              ORDER BY check_in"
        ))?;
        let rows = stmt.query_map(params![room_type_id, since.to_string()], row_to_booking)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    /// Reads the commission ledger row for a booking, if one was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_commission(&self, booking_id: i64) -> Result<Option<Commission>> {
        match self.conn.query_row(
            r"SELECT id, booking_id, hotel_id, booking_amount, rate, amount, status, created_at
              FROM commissions WHERE booking_id = ?",
            [booking_id],
            |row| {
                let status =
                    CommissionStatus::parse(&row.get::<_, String>(6)?).map_err(to_sql_err)?;
                Ok(Commission {
                    id: row.get(0)?,
                    booking_id: row.get(1)?,
                    hotel_id: row.get(2)?,
                    booking_amount: row.get(3)?,
                    rate: row.get(4)?,
                    amount: row.get(5)?,
                    status,
                    created_at: unix_secs_to_systemtime(row.get(7)?),
                })
            },
        ) {
            Ok(commission) => Ok(Some(commission)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Marks a booking's commission as settled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the booking has no commission row.
    pub fn settle_commission(&mut self, booking_id: i64) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE commissions SET status = 'SETTLED' WHERE booking_id = ?",
            [booking_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound {
                resource: format!("commission for booking {booking_id}"),
            });
        }
        Ok(())
    }

    /// Sets a booking's payment status without touching its lifecycle
    /// status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the booking does not exist.
    pub fn set_payment_status(
        &mut self,
        booking_id: i64,
        payment_status: PaymentStatus,
        now: SystemTime,
    ) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE bookings SET payment_status = ?, updated_at = ? WHERE id = ?",
            params![
                payment_status.to_string(),
                systemtime_to_unix_secs(now)?,
                booking_id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound {
                resource: format!("booking {booking_id}"),
            });
        }
        Ok(())
    }
}
