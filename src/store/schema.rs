//! Store schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions, indices, and constants
//! related to the persistent schema of the reservation engine.

/// Current schema version for the store.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the store and the library.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
///
/// The metadata table stores key-value pairs for store configuration
/// and versioning information.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the hotels table.
///
/// Only the fields the reservation core reads are stored; hotel CRUD lives
/// in the upstream admin surface.
pub const CREATE_HOTELS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS hotels (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        commission_rate REAL NOT NULL
    )";

/// SQL statement to create the room types table.
pub const CREATE_ROOM_TYPES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS room_types (
        id INTEGER PRIMARY KEY,
        hotel_id INTEGER NOT NULL REFERENCES hotels(id),
        name TEXT NOT NULL,
        total_rooms INTEGER NOT NULL,
        base_price_daily INTEGER NOT NULL,
        base_price_hourly INTEGER,
        max_guests INTEGER NOT NULL,
        max_extra_guests INTEGER NOT NULL,
        extra_guest_charge INTEGER NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1
    )";

/// SQL statement to create the room inventory table.
///
/// One row per (room type, date, slot). Daily inventory uses the empty
/// string for `slot` rather than NULL so the primary key actually enforces
/// uniqueness (NULL != NULL in SQLite primary keys). Rows are created lazily
/// on first write; a missing row means full capacity at the base price.
pub const CREATE_ROOM_INVENTORY_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS room_inventory (
        room_type_id INTEGER NOT NULL REFERENCES room_types(id),
        date TEXT NOT NULL,
        slot TEXT NOT NULL DEFAULT '',
        available INTEGER NOT NULL,
        price_override INTEGER,
        closed INTEGER NOT NULL DEFAULT 0,
        min_stay_nights INTEGER NOT NULL DEFAULT 1,
        PRIMARY KEY (room_type_id, date, slot)
    )";

/// SQL statement to create the bookings table.
///
/// `booking_number` carries a UNIQUE constraint; the reservation path
/// regenerates the number on the rare collision rather than pre-checking.
pub const CREATE_BOOKINGS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS bookings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        booking_number TEXT NOT NULL UNIQUE,
        hotel_id INTEGER NOT NULL REFERENCES hotels(id),
        room_type_id INTEGER NOT NULL REFERENCES room_types(id),
        check_in TEXT NOT NULL,
        check_out TEXT,
        slot TEXT NOT NULL DEFAULT '',
        num_rooms INTEGER NOT NULL,
        num_guests INTEGER NOT NULL,
        guest_name TEXT NOT NULL,
        guest_contact TEXT,
        room_total INTEGER NOT NULL,
        extra_guest_total INTEGER NOT NULL,
        tax INTEGER NOT NULL,
        total INTEGER NOT NULL,
        commission_amount INTEGER NOT NULL,
        hotel_payout INTEGER NOT NULL,
        source TEXT NOT NULL,
        status TEXT NOT NULL,
        payment_status TEXT NOT NULL,
        cancel_reason TEXT,
        cancelled_at INTEGER,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// SQL statement to create the commissions ledger table.
///
/// One row per platform-sourced booking, written in the same transaction
/// that creates the booking.
pub const CREATE_COMMISSIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS commissions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        booking_id INTEGER NOT NULL UNIQUE REFERENCES bookings(id),
        hotel_id INTEGER NOT NULL REFERENCES hotels(id),
        booking_amount INTEGER NOT NULL,
        rate REAL NOT NULL,
        amount INTEGER NOT NULL,
        status TEXT NOT NULL DEFAULT 'PENDING',
        created_at INTEGER NOT NULL
    )";

/// SQL statement to create an index on booking status.
///
/// This index speeds up sweeper scans for stale pending bookings.
pub const CREATE_BOOKING_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status)";

/// SQL statement to create an index on (`room_type_id`, `check_in`).
///
/// This index speeds up availability and pricing-history queries.
pub const CREATE_BOOKING_ROOM_TYPE_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_bookings_room_type_check_in
    ON bookings(room_type_id, check_in)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// SQL statement to lazily seed an inventory row at full capacity.
///
/// A no-op when the row already exists; always executed before the
/// conditional decrement so the decrement has a row to hit.
pub const SEED_INVENTORY_ROW: &str = r"
    INSERT OR IGNORE INTO room_inventory (room_type_id, date, slot, available)
    VALUES (?1, ?2, ?3, ?4)
";

/// SQL statement for the conditional inventory decrement.
///
/// The WHERE clause is the availability double-check: the update touches
/// zero rows when capacity is short or the date is closed, and the caller
/// rolls back the whole reservation in that case.
pub const DECREMENT_INVENTORY: &str = r"
    UPDATE room_inventory
    SET available = available - ?4
    WHERE room_type_id = ?1 AND date = ?2 AND slot = ?3
      AND available >= ?4 AND closed = 0
";

/// SQL statement to restore inventory on cancellation.
///
/// Only ever executed for bookings whose creation decremented the same
/// rows, so the result cannot exceed the room type's capacity.
pub const RESTORE_INVENTORY: &str = r"
    UPDATE room_inventory
    SET available = available + ?4
    WHERE room_type_id = ?1 AND date = ?2 AND slot = ?3
";

/// SQL statement to insert a booking row.
pub const INSERT_BOOKING: &str = r"
    INSERT INTO bookings
    (booking_number, hotel_id, room_type_id, check_in, check_out, slot,
     num_rooms, num_guests, guest_name, guest_contact,
     room_total, extra_guest_total, tax, total,
     commission_amount, hotel_payout, source, status, payment_status,
     cancel_reason, cancelled_at, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

/// SQL statement to insert a commission ledger row.
pub const INSERT_COMMISSION: &str = r"
    INSERT INTO commissions
    (booking_id, hotel_id, booking_amount, rate, amount, status, created_at)
    VALUES (?, ?, ?, ?, ?, 'PENDING', ?)
";
