//! Store connection management.
//!
//! This module provides the main store connection type with proper
//! initialization and PRAGMA settings for concurrent `SQLite` access.

use rusqlite::{Connection, OpenFlags};

use crate::error::Result;

use super::config::StoreConfig;

/// A read-write connection to the reservation database.
///
/// Each thread of a multi-threaded caller opens its own `Store` on the same
/// path; WAL mode and the busy timeout make that safe. The schema is
/// initialized or version-checked on open.
///
/// # Examples
///
/// ```no_run
/// use bookinn::store::{Store, StoreConfig};
///
/// let config = StoreConfig::new("/tmp/bookinn.db");
/// let store = Store::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Store {
    pub(super) conn: Connection,
}

impl Store {
    /// Opens the database at `config.path`, creating the file and its
    /// parent directory when `auto_create` allows, and applies the WAL,
    /// synchronous, and busy-timeout pragmas before checking the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created, a pragma
    /// fails, or the on-disk schema version is incompatible.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if config.auto_create {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }

        let conn = Connection::open_with_flags(&config.path, flags)?;

        // PRAGMA journal_mode returns the resulting mode as a row
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {}",
            config.busy_timeout.as_millis()
        ))?;

        super::migrations::check_schema_compatibility(&conn)?;

        Ok(Self { conn })
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying `SQLite` connection.
    ///
    /// Required for operations that start transactions.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
