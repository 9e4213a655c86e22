#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # bookinn
//!
//! A library for concurrency-safe room reservations and demand-driven
//! pricing over dated inventory.
//!
//! Many concurrent callers can reserve from a finite, date-indexed pool of
//! rooms without overselling: per-date advisory locks serialize writers, and
//! a conditional inventory decrement inside one store transaction is the
//! actual correctness guarantee. The same inventory feeds a demand analyzer
//! that suggests per-day price overrides.
//!
//! ## Core Types
//!
//! - [`RoomType`] and [`Hotel`]: the bookable catalog
//! - [`InventoryKey`] and [`InventoryLevel`]: dated capacity and pricing
//! - [`Booking`], [`BookingStatus`], [`Stay`]: reservations and their
//!   lifecycle
//! - [`LockService`] and [`SqliteLockService`]: the advisory lock seam
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use bookinn::{BookingStatus, RoomType, Stay};
//! use chrono::NaiveDate;
//!
//! let room_type = RoomType::builder(1, 10, "Deluxe")
//!     .total_rooms(5)
//!     .base_price_daily(3000)
//!     .max_guests(2)
//!     .build()
//!     .unwrap();
//! assert_eq!(room_type.total_rooms, 5);
//!
//! let stay = Stay::daily(
//!     NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2026, 9, 3).unwrap(),
//! )
//! .unwrap();
//! assert_eq!(stay.nights(), 2);
//!
//! assert!(BookingStatus::Pending.can_transition(BookingStatus::Confirmed));
//! ```

pub mod availability;
pub mod booking;
pub mod config;
pub mod error;
pub mod events;
pub mod hotel;
pub mod inventory;
pub mod lock;
pub mod operations;
pub mod pricing;
pub mod store;

// Re-export key types at crate root for convenience
pub use availability::{check_availability, Quote};
pub use booking::{
    Booking, BookingSource, BookingStatus, Commission, CommissionStatus, PaymentStatus,
    PricingBreakdown, Stay,
};
pub use config::Config;
pub use error::{Error, Result};
pub use events::{BookingEvent, EventSink, NullSink};
pub use hotel::{Hotel, RoomType, RoomTypeBuilder};
pub use inventory::{InventoryKey, InventoryLevel, Slot};
pub use lock::{LockService, LockSet, SqliteLockService};
pub use operations::{CancelOptions, ReservationCoordinator, ReserveOptions, SweepResult};
pub use pricing::{DemandAnalyzer, DemandLevel, DemandReport, PriceSuggestion, SuggestionApplier};
pub use store::{Store, StoreConfig};
