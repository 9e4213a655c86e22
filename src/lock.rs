//! Short-lived advisory locks over inventory keys.
//!
//! The reservation coordinator serializes writers per date/slot through a
//! [`LockService`]. The trait is deliberately tiny so the SQLite-backed
//! default can be swapped for an external backend without touching the
//! coordinator.
//!
//! Every lock carries a TTL. A crashed holder therefore blocks a key only
//! until the TTL lapses; expired rows are purged on the next acquisition
//! attempt for any key.

use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use rusqlite::{Connection, TransactionBehavior};

use crate::error::{Error, Result};

/// Acquires and releases named advisory locks.
///
/// Implementations must be safe to call from multiple threads and must make
/// `try_acquire` atomic: two concurrent calls for the same unheld key see
/// exactly one `true`.
#[cfg_attr(test, mockall::automock)]
pub trait LockService: Send + Sync {
    /// Attempts to acquire `key` for `ttl`. Returns `Ok(false)` without
    /// blocking if the key is already held.
    ///
    /// # Errors
    ///
    /// Returns an error only on backend failure, never on contention.
    fn try_acquire(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// Releases `key` if this service instance holds it. Releasing a key
    /// that expired and was taken by someone else is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    fn release(&self, key: &str) -> Result<()>;
}

const CREATE_LOCKS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS locks (
    key TEXT PRIMARY KEY,
    owner INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
)";

/// SQLite-backed [`LockService`].
///
/// Lock rows live in a `locks` table keyed by the lock string; atomicity
/// comes from an `INSERT OR IGNORE` inside an immediate transaction. Each
/// service instance has a random owner token so that `release` never deletes
/// a lock that expired and was re-acquired by another instance.
pub struct SqliteLockService {
    conn: Mutex<Connection>,
    owner: i64,
}

impl SqliteLockService {
    /// Opens (and initializes if needed) a lock service on the given
    /// database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "busy_timeout", 5000)?;
        conn.execute(CREATE_LOCKS_TABLE, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
            owner: rand::thread_rng().gen::<i64>(),
        })
    }

    fn now_millis() -> Result<i64> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::LockBackend {
                details: format!("system clock before epoch: {e}"),
            })?
            .as_millis();
        i64::try_from(millis).map_err(|_| Error::LockBackend {
            details: "system clock out of range".to_string(),
        })
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockBackend {
            details: "lock service connection poisoned".to_string(),
        })
    }
}

impl LockService for SqliteLockService {
    fn try_acquire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let now = Self::now_millis()?;
        let ttl_millis = i64::try_from(ttl.as_millis()).map_err(|_| Error::LockBackend {
            details: "lock TTL out of range".to_string(),
        })?;

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM locks WHERE expires_at <= ?1", [now])?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO locks (key, owner, expires_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, self.owner, now + ttl_millis],
        )?;
        tx.commit()?;
        Ok(inserted == 1)
    }

    fn release(&self, key: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "DELETE FROM locks WHERE key = ?1 AND owner = ?2",
            rusqlite::params![key, self.owner],
        )?;
        Ok(())
    }
}

/// A set of locks held together, released on drop.
///
/// Keys are deduplicated and acquired in sorted order, so two requests that
/// overlap on any subset of keys always contend in the same order and cannot
/// deadlock. If any key is unavailable the already-acquired keys are released
/// and the whole acquisition fails with [`Error::Conflict`].
pub struct LockSet<'a> {
    service: &'a dyn LockService,
    held: Vec<String>,
}

impl<'a> LockSet<'a> {
    /// Acquires all `keys` (deduplicated, in sorted order) with the given
    /// TTL, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] naming the first contended key, with all
    /// partially-acquired locks already released. Backend failures propagate
    /// as-is, also after rollback of held keys.
    pub fn acquire(
        service: &'a dyn LockService,
        keys: impl IntoIterator<Item = String>,
        ttl: Duration,
    ) -> Result<Self> {
        let mut sorted: Vec<String> = keys.into_iter().collect();
        sorted.sort();
        sorted.dedup();

        let mut set = Self {
            service,
            held: Vec::with_capacity(sorted.len()),
        };
        for key in sorted {
            match set.service.try_acquire(&key, ttl) {
                Ok(true) => set.held.push(key),
                Ok(false) => {
                    // Drop releases what we already hold
                    return Err(Error::Conflict { key });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(set)
    }

    /// The keys currently held, in acquisition order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.held
    }
}

impl Drop for LockSet<'_> {
    fn drop(&mut self) {
        for key in &self.held {
            if let Err(e) = self.service.release(key) {
                log::warn!("failed to release lock {key}: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn temp_service() -> (SqliteLockService, tempfile::TempPath) {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        let service = SqliteLockService::open(&path).unwrap();
        (service, path)
    }

    #[test]
    fn test_acquire_then_conflict() {
        let (service, _path) = temp_service();
        let ttl = Duration::from_secs(30);

        assert!(service.try_acquire("inv:1:2026-09-01", ttl).unwrap());
        assert!(!service.try_acquire("inv:1:2026-09-01", ttl).unwrap());
        // A different key is independent
        assert!(service.try_acquire("inv:1:2026-09-02", ttl).unwrap());
    }

    #[test]
    fn test_release_frees_key() {
        let (service, _path) = temp_service();
        let ttl = Duration::from_secs(30);

        assert!(service.try_acquire("inv:1:2026-09-01", ttl).unwrap());
        service.release("inv:1:2026-09-01").unwrap();
        assert!(service.try_acquire("inv:1:2026-09-01", ttl).unwrap());
    }

    #[test]
    fn test_expired_lock_is_reacquirable() {
        let (service, _path) = temp_service();

        assert!(service
            .try_acquire("inv:1:2026-09-01", Duration::from_millis(10))
            .unwrap());
        std::thread::sleep(Duration::from_millis(50));
        assert!(service
            .try_acquire("inv:1:2026-09-01", Duration::from_secs(30))
            .unwrap());
    }

    #[test]
    fn test_release_does_not_steal_foreign_lock() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        let a = SqliteLockService::open(&path).unwrap();
        let b = SqliteLockService::open(&path).unwrap();
        let ttl = Duration::from_secs(30);

        assert!(a.try_acquire("inv:1:2026-09-01", ttl).unwrap());
        // B never held the key; its release must not free A's lock
        b.release("inv:1:2026-09-01").unwrap();
        assert!(!b.try_acquire("inv:1:2026-09-01", ttl).unwrap());
    }

    #[test]
    fn test_concurrent_acquire_exactly_one_winner() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        let ttl = Duration::from_secs(30);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let p = path.to_path_buf();
            handles.push(std::thread::spawn(move || {
                let service = SqliteLockService::open(&p).unwrap();
                service.try_acquire("inv:9:2026-09-01", ttl).unwrap()
            }));
        }

        let wins: usize = handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_lock_set_acquires_sorted_and_deduped() {
        let mut mock = MockLockService::new();
        let ttl = Duration::from_secs(30);

        let mut seq = mockall::Sequence::new();
        for key in ["inv:1:2026-09-01", "inv:1:2026-09-02", "inv:1:2026-09-03"] {
            mock.expect_try_acquire()
                .with(eq(key), eq(ttl))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(true));
        }
        mock.expect_release().times(3).returning(|_| Ok(()));

        let keys = vec![
            "inv:1:2026-09-03".to_string(),
            "inv:1:2026-09-01".to_string(),
            "inv:1:2026-09-02".to_string(),
            "inv:1:2026-09-01".to_string(),
        ];
        let set = LockSet::acquire(&mock, keys, ttl).unwrap();
        assert_eq!(set.keys().len(), 3);
        drop(set);
    }

    #[test]
    fn test_lock_set_rolls_back_on_conflict() {
        let mut mock = MockLockService::new();
        let ttl = Duration::from_secs(30);

        mock.expect_try_acquire()
            .with(eq("inv:1:2026-09-01"), eq(ttl))
            .times(1)
            .returning(|_, _| Ok(true));
        mock.expect_try_acquire()
            .with(eq("inv:1:2026-09-02"), eq(ttl))
            .times(1)
            .returning(|_, _| Ok(false));
        // Only the first key was held, so only it is released
        mock.expect_release()
            .with(eq("inv:1:2026-09-01"))
            .times(1)
            .returning(|_| Ok(()));

        let keys = vec![
            "inv:1:2026-09-01".to_string(),
            "inv:1:2026-09-02".to_string(),
        ];
        let err = LockSet::acquire(&mock, keys, ttl).err().unwrap();
        assert!(err.is_retryable());
        match err {
            Error::Conflict { key } => assert_eq!(key, "inv:1:2026-09-02"),
            other => panic!("expected conflict, got {other}"),
        }
    }

    #[test]
    fn test_lock_set_drop_releases_all() {
        let (service, _path) = temp_service();
        let ttl = Duration::from_secs(30);

        let keys = vec![
            "inv:2:2026-09-01".to_string(),
            "inv:2:2026-09-02".to_string(),
        ];
        let set = LockSet::acquire(&service, keys.clone(), ttl).unwrap();
        drop(set);

        // Both keys are free again
        for key in &keys {
            assert!(service.try_acquire(key, ttl).unwrap());
        }
    }
}
