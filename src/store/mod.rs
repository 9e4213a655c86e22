//! Persistence layer for hotels, inventory, and bookings.
//!
//! This module provides a SQLite-based storage layer for the reservation
//! engine, including connection management, schema versioning, and the two
//! atomic multi-row mutations the reservation protocol relies on.
//!
//! # Examples
//!
//! ```no_run
//! use bookinn::store::{Store, StoreConfig};
//! use bookinn::{Hotel, RoomType};
//!
//! // Open a store
//! let config = StoreConfig::new("/tmp/bookinn.db");
//! let mut store = Store::open(config).unwrap();
//!
//! // Seed a hotel and a room type
//! let hotel = Hotel::new(1, "Seaview", 0.15).unwrap();
//! store.upsert_hotel(&hotel).unwrap();
//!
//! let room_type = RoomType::builder(1, hotel.id, "Deluxe")
//!     .total_rooms(5)
//!     .base_price_daily(3000)
//!     .max_guests(2)
//!     .build()
//!     .unwrap();
//! store.upsert_room_type(&room_type).unwrap();
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
#[cfg(test)]
pub(crate) mod test_util;

// Re-export public API
pub use config::StoreConfig;
pub use connection::Store;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
