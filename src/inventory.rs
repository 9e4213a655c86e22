//! Dated inventory keys and levels.
//!
//! Inventory is the single shared mutable entity of the system: one row per
//! (room type, date) for daily stays, one per (room type, date, slot) for
//! hourly stays. A missing row means "full capacity at base price" — rows are
//! created lazily on first write.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A time window within a single day for hourly bookings.
///
/// # Examples
///
/// ```
/// use bookinn::Slot;
/// use chrono::NaiveTime;
///
/// let slot = Slot::new(
///     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(format!("{slot}"), "10:00-14:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    /// Inclusive start of the window.
    pub start: NaiveTime,
    /// Exclusive end of the window.
    pub end: NaiveTime,
}

impl Slot {
    /// Creates a new slot.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is not strictly before `end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start >= end {
            return Err(Error::validation(
                "slot",
                format!("start {start} must be before end {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// Parses a slot from its display form (`HH:MM-HH:MM`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is malformed or the window is empty.
    pub fn parse(s: &str) -> Result<Self> {
        let (start, end) = s.split_once('-').ok_or_else(|| {
            Error::validation("slot", format!("expected HH:MM-HH:MM, got '{s}'"))
        })?;
        let start = NaiveTime::parse_from_str(start, "%H:%M")
            .map_err(|e| Error::validation("slot", format!("bad start time '{start}': {e}")))?;
        let end = NaiveTime::parse_from_str(end, "%H:%M")
            .map_err(|e| Error::validation("slot", format!("bad end time '{end}': {e}")))?;
        Self::new(start, end)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Identifies one unit of dated inventory for a room type.
///
/// The display form doubles as the lock key handed to the lock service, so
/// two requests touching the same date/slot always contend on the same key.
///
/// # Examples
///
/// ```
/// use bookinn::InventoryKey;
/// use chrono::NaiveDate;
///
/// let key = InventoryKey::daily(7, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
/// assert_eq!(key.lock_key(), "inv:7:2026-09-01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryKey {
    /// The room type this inventory belongs to.
    pub room_type_id: i64,
    /// The calendar date.
    pub date: NaiveDate,
    /// The time window, for hourly inventory. `None` means a full day.
    pub slot: Option<Slot>,
}

impl InventoryKey {
    /// Creates a key for a full-day inventory row.
    #[must_use]
    pub const fn daily(room_type_id: i64, date: NaiveDate) -> Self {
        Self {
            room_type_id,
            date,
            slot: None,
        }
    }

    /// Creates a key for an hourly-slot inventory row.
    #[must_use]
    pub const fn hourly(room_type_id: i64, date: NaiveDate, slot: Slot) -> Self {
        Self {
            room_type_id,
            date,
            slot: Some(slot),
        }
    }

    /// Returns the string key used with the lock service for this unit.
    #[must_use]
    pub fn lock_key(&self) -> String {
        format!("{self}")
    }
}

impl fmt::Display for InventoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(slot) => write!(f, "inv:{}:{}:{}", self.room_type_id, self.date, slot),
            None => write!(f, "inv:{}:{}", self.room_type_id, self.date),
        }
    }
}

/// The mutable state of one inventory unit.
///
/// `available` is the authoritative remaining-capacity counter, not a cache:
/// the reservation write path decrements it conditionally and the cancellation
/// path restores it. It is always within `[0, total_rooms]` for its room type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLevel {
    /// Rooms still available on this date/slot.
    pub available: u32,
    /// Operator price override in minor currency units, if any.
    pub price_override: Option<i64>,
    /// Whether this date/slot is closed to new reservations.
    pub closed: bool,
    /// Minimum stay length in nights required to book across this date.
    pub min_stay_nights: u32,
}

impl InventoryLevel {
    /// Creates a fresh level at full capacity with no overrides.
    #[must_use]
    pub const fn full(total_rooms: u32) -> Self {
        Self {
            available: total_rooms,
            price_override: None,
            closed: false,
            min_stay_nights: 1,
        }
    }

    /// Effective nightly price given the room type's base price.
    #[must_use]
    pub fn effective_price(&self, base_price: i64) -> i64 {
        self.price_override.unwrap_or(base_price)
    }
}
