//! Booking entities and the booking lifecycle state machine.
//!
//! A [`Booking`] is created only by the reservation coordinator and mutated
//! only through the status state machine. The transition table lives in one
//! place ([`BookingStatus::can_transition`]) and every mutation call site
//! checks it exactly once.

use std::fmt;
use std::time::SystemTime;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::inventory::{InventoryKey, Slot};

/// Lifecycle status of a booking.
///
/// The full transition table:
///
/// - `Pending` → `Confirmed` | `Cancelled`
/// - `Confirmed` → `CheckedIn` | `Cancelled` | `NoShow`
/// - `CheckedIn` → `CheckedOut`
/// - `CheckedOut`, `Cancelled`, `NoShow` are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Created, awaiting confirmation (e.g. payment). Holds inventory.
    Pending,
    /// Confirmed and holding inventory.
    Confirmed,
    /// Guest has arrived.
    CheckedIn,
    /// Guest has departed. Terminal.
    CheckedOut,
    /// Cancelled; inventory restored. Terminal.
    Cancelled,
    /// Guest never arrived. Terminal.
    NoShow,
}

impl BookingStatus {
    /// Returns whether a transition from `self` to `to` is legal.
    ///
    /// This is the single source of truth for the booking lifecycle; illegal
    /// transitions are rejected without any mutation.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookinn::BookingStatus;
    ///
    /// assert!(BookingStatus::Pending.can_transition(BookingStatus::Confirmed));
    /// assert!(!BookingStatus::CheckedOut.can_transition(BookingStatus::Cancelled));
    /// ```
    #[must_use]
    pub fn can_transition(self, to: Self) -> bool {
        use BookingStatus::{Cancelled, CheckedIn, CheckedOut, Confirmed, NoShow, Pending};
        matches!(
            (self, to),
            (Pending, Confirmed | Cancelled)
                | (Confirmed, CheckedIn | Cancelled | NoShow)
                | (CheckedIn, CheckedOut)
        )
    }

    /// Returns whether this status is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled | Self::NoShow)
    }

    /// Returns whether a booking in this status holds inventory capacity.
    #[must_use]
    pub fn holds_inventory(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::CheckedIn)
    }

    /// Parses a status from its storage form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known status.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CHECKED_IN" => Ok(Self::CheckedIn),
            "CHECKED_OUT" => Ok(Self::CheckedOut),
            "CANCELLED" => Ok(Self::Cancelled),
            "NO_SHOW" => Ok(Self::NoShow),
            other => Err(Error::validation(
                "status",
                format!("unknown booking status '{other}'"),
            )),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::CheckedIn => "CHECKED_IN",
            Self::CheckedOut => "CHECKED_OUT",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        };
        write!(f, "{s}")
    }
}

/// Where the booking originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingSource {
    /// Booked directly with the hotel.
    Direct,
    /// Booked through the platform; commission is owed.
    Bluestay,
    /// Walk-in at the front desk.
    WalkIn,
}

impl BookingSource {
    /// Whether bookings from this source owe platform commission.
    #[must_use]
    pub const fn owes_commission(self) -> bool {
        matches!(self, Self::Bluestay)
    }

    /// Parses a source from its storage form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known source.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "DIRECT" => Ok(Self::Direct),
            "BLUESTAY" => Ok(Self::Bluestay),
            "WALK_IN" => Ok(Self::WalkIn),
            other => Err(Error::validation(
                "source",
                format!("unknown booking source '{other}'"),
            )),
        }
    }
}

impl fmt::Display for BookingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Direct => "DIRECT",
            Self::Bluestay => "BLUESTAY",
            Self::WalkIn => "WALK_IN",
        };
        write!(f, "{s}")
    }
}

/// Payment state of a booking, tracked independently of the lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// No payment received yet.
    Unpaid,
    /// Payment received in full.
    Paid,
    /// Payment returned after cancellation.
    Refunded,
}

impl PaymentStatus {
    /// Parses a payment status from its storage form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known payment status.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "UNPAID" => Ok(Self::Unpaid),
            "PAID" => Ok(Self::Paid),
            "REFUNDED" => Ok(Self::Refunded),
            other => Err(Error::validation(
                "payment_status",
                format!("unknown payment status '{other}'"),
            )),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unpaid => "UNPAID",
            Self::Paid => "PAID",
            Self::Refunded => "REFUNDED",
        };
        write!(f, "{s}")
    }
}

/// The dates or time window a booking occupies.
///
/// Daily stays use hotel semantics: the checkout date is exclusive, so a
/// two-night stay occupies exactly two inventory dates.
///
/// # Examples
///
/// ```
/// use bookinn::Stay;
/// use chrono::NaiveDate;
///
/// let stay = Stay::daily(
///     NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 9, 3).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(stay.nights(), 2);
/// assert_eq!(stay.inventory_keys(7).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stay {
    /// A multi-night stay; `check_out` is exclusive.
    Daily {
        /// Arrival date.
        check_in: NaiveDate,
        /// Departure date (exclusive).
        check_out: NaiveDate,
    },
    /// A time window within a single day.
    Hourly {
        /// The day of the slot.
        date: NaiveDate,
        /// The time window.
        slot: Slot,
    },
}

impl Stay {
    /// Creates a daily stay.
    ///
    /// # Errors
    ///
    /// Returns an error if `check_out` is not strictly after `check_in`.
    pub fn daily(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self> {
        if check_out <= check_in {
            return Err(Error::validation(
                "check_out",
                format!("must be after check-in ({check_in} >= {check_out})"),
            ));
        }
        Ok(Self::Daily {
            check_in,
            check_out,
        })
    }

    /// Creates an hourly stay.
    #[must_use]
    pub const fn hourly(date: NaiveDate, slot: Slot) -> Self {
        Self::Hourly { date, slot }
    }

    /// First occupied date.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        match self {
            Self::Daily { check_in, .. } => *check_in,
            Self::Hourly { date, .. } => *date,
        }
    }

    /// Number of billable nights. Hourly stays bill as one unit.
    #[must_use]
    pub fn nights(&self) -> u32 {
        match self {
            Self::Daily {
                check_in,
                check_out,
            } => u32::try_from((*check_out - *check_in).num_days()).unwrap_or(0),
            Self::Hourly { .. } => 1,
        }
    }

    /// All occupied dates, in order. For hourly stays this is the single day.
    #[must_use]
    pub fn occupied_dates(&self) -> Vec<NaiveDate> {
        match self {
            Self::Daily {
                check_in,
                check_out,
            } => {
                let mut dates = Vec::new();
                let mut d = *check_in;
                while d < *check_out {
                    dates.push(d);
                    let Some(next) = d.succ_opt() else { break };
                    d = next;
                }
                dates
            }
            Self::Hourly { date, .. } => vec![*date],
        }
    }

    /// The inventory keys this stay touches, one per occupied date or slot.
    #[must_use]
    pub fn inventory_keys(&self, room_type_id: i64) -> Vec<InventoryKey> {
        match self {
            Self::Daily { .. } => self
                .occupied_dates()
                .into_iter()
                .map(|d| InventoryKey::daily(room_type_id, d))
                .collect(),
            Self::Hourly { date, slot } => {
                vec![InventoryKey::hourly(room_type_id, *date, *slot)]
            }
        }
    }
}

/// Settlement state of a commission ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommissionStatus {
    /// Owed but not yet settled with the platform.
    Pending,
    /// Settled.
    Settled,
}

impl CommissionStatus {
    /// Parses a commission status from its storage form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known commission status.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "SETTLED" => Ok(Self::Settled),
            other => Err(Error::validation(
                "commission_status",
                format!("unknown commission status '{other}'"),
            )),
        }
    }
}

impl fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Settled => "SETTLED",
        };
        write!(f, "{s}")
    }
}

/// A platform commission owed for one booking.
///
/// Written exactly once, in the same transaction as the booking, and only
/// for platform-sourced bookings with a positive commission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    /// Store-assigned identifier.
    pub id: i64,
    /// The booking this commission belongs to.
    pub booking_id: i64,
    /// The hotel that owes it.
    pub hotel_id: i64,
    /// The booking total the rate was applied to.
    pub booking_amount: i64,
    /// The commission rate at booking time.
    pub rate: f64,
    /// The commission amount in minor currency units.
    pub amount: i64,
    /// Settlement state.
    pub status: CommissionStatus,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

/// Itemized pricing for a booking, in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    /// Sum of nightly (or slot) prices times rooms.
    pub room_total: i64,
    /// Extra-guest charges across the stay.
    pub extra_guest_total: i64,
    /// Tax on the subtotal.
    pub tax: i64,
    /// Grand total: room + extra guests + tax.
    pub total: i64,
}

/// A confirmed-or-pending room reservation with its pricing and lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Store-assigned identifier; zero until persisted.
    pub id: i64,
    /// Globally unique human-readable reference.
    pub booking_number: String,
    /// The hotel the room type belongs to.
    pub hotel_id: i64,
    /// The reserved room type.
    pub room_type_id: i64,
    /// The dates or slot occupied.
    pub stay: Stay,
    /// Rooms reserved.
    pub num_rooms: u32,
    /// Total guests across all rooms.
    pub num_guests: u32,
    /// Name on the reservation.
    pub guest_name: String,
    /// Contact detail for the guest, if supplied.
    pub guest_contact: Option<String>,
    /// Itemized pricing.
    pub pricing: PricingBreakdown,
    /// Commission owed to the platform, zero when none.
    pub commission_amount: i64,
    /// What the hotel receives after commission.
    pub hotel_payout: i64,
    /// Where the booking originated.
    pub source: BookingSource,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// Reason recorded at cancellation, if cancelled.
    pub cancel_reason: Option<String>,
    /// When the booking was cancelled, if cancelled.
    pub cancelled_at: Option<SystemTime>,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last mutation timestamp.
    pub updated_at: SystemTime,
}

impl Booking {
    /// The inventory keys this booking occupies.
    #[must_use]
    pub fn inventory_keys(&self) -> Vec<InventoryKey> {
        self.stay.inventory_keys(self.room_type_id)
    }
}

/// Generates a human-readable booking number.
///
/// Format: `BK-YYYYMMDD-XXXXXX` where the suffix is random base36. Global
/// uniqueness is enforced by the store's unique constraint; the caller
/// regenerates on the rare collision.
#[must_use]
pub fn generate_booking_number(check_in: NaiveDate) -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("BK-{}-{}", check_in.format("%Y%m%d"), suffix)
}
