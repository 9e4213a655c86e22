//! Connection parameters for the reservation store.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parameters for opening a [`Store`](super::Store).
///
/// Every writer needs read-write access (the engine seeds inventory rows on
/// first touch), so the store always opens read-write; `auto_create` only
/// controls whether a missing database file is created.
///
/// # Examples
///
/// ```
/// use bookinn::store::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::new("/tmp/bookinn.db")
///     .with_busy_timeout(Duration::from_millis(10000));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// How long a writer waits on a locked database before erroring.
    pub busy_timeout: Duration,
    /// Whether to create the database file (and parent directory) if
    /// missing.
    pub auto_create: bool,
}

impl StoreConfig {
    /// Creates a configuration with a 5 second busy timeout and
    /// `auto_create` enabled.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
        }
    }

    /// Sets the busy timeout.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Disables creation of a missing database file; opening then fails if
    /// the file does not exist.
    #[must_use]
    pub fn existing_only(mut self) -> Self {
        self.auto_create = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = StoreConfig::new("/tmp/test.db");
        assert_eq!(config.path, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(5000));
        assert!(config.auto_create);
    }

    #[test]
    fn test_config_with_busy_timeout() {
        let config =
            StoreConfig::new("/tmp/test.db").with_busy_timeout(Duration::from_millis(10000));
        assert_eq!(config.busy_timeout, Duration::from_millis(10000));
    }

    #[test]
    fn test_config_existing_only() {
        let config = StoreConfig::new("/tmp/test.db").existing_only();
        assert!(!config.auto_create);
    }
}
