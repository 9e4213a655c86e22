//! Booking operations orchestrated by the reservation coordinator.
//!
//! The coordinator is the only writer of bookings. Reservation takes
//! per-date locks and re-checks availability inside the lock window;
//! cancellation and status transitions rely on the store's atomic
//! compare-and-set mutations and take no locks.
//!
//! # Examples
//!
//! ```no_run
//! use bookinn::operations::{ReservationCoordinator, ReserveOptions};
//! use bookinn::store::{Store, StoreConfig};
//! use bookinn::{Config, SqliteLockService, Stay};
//! use chrono::NaiveDate;
//!
//! let mut store = Store::open(StoreConfig::new("/tmp/bookinn.db")).unwrap();
//! let locks = SqliteLockService::open("/tmp/bookinn.db").unwrap();
//! let config = Config::default();
//!
//! let stay = Stay::daily(
//!     NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2026, 9, 3).unwrap(),
//! )
//! .unwrap();
//! let options = ReserveOptions::new(1, stay, "Ada Khumalo").with_num_rooms(2);
//!
//! let mut coordinator = ReservationCoordinator::new(&mut store, &locks, &config);
//! let booking = coordinator
//!     .reserve(&options, NaiveDate::from_ymd_opt(2026, 8, 27).unwrap())
//!     .unwrap();
//! println!("{}", booking.booking_number);
//! ```

pub mod cancel;
pub mod reserve;
pub mod status;
pub mod sweep;

pub use cancel::CancelOptions;
pub use reserve::{ReservationCoordinator, ReserveOptions};
pub use sweep::SweepResult;
