//! Engine configuration.
//!
//! All tunables of the reservation and pricing engines live here. A default
//! configuration is usable as-is; operators override individual fields via a
//! YAML file or the `with_` setters.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn default_daily_lock_ttl() -> Duration {
    Duration::from_secs(30)
}

fn default_slot_lock_ttl() -> Duration {
    Duration::from_secs(30)
}

fn default_tax_rate() -> f64 {
    0.12
}

fn default_pending_payment_timeout() -> Duration {
    Duration::from_secs(30 * 60)
}

fn default_stale_pending_age() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_price_step() -> i64 {
    50
}

fn default_max_suggestion_days() -> u32 {
    90
}

/// Tunables for the reservation and pricing engines.
///
/// # Examples
///
/// ```
/// use bookinn::Config;
/// use std::time::Duration;
///
/// let config = Config::default().with_tax_rate(0.10).unwrap();
/// assert_eq!(config.daily_lock_ttl, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// TTL for per-date locks taken during a daily reservation.
    #[serde(with = "duration_secs", default = "default_daily_lock_ttl")]
    pub daily_lock_ttl: Duration,
    /// TTL for per-slot locks taken during an hourly reservation.
    #[serde(with = "duration_secs", default = "default_slot_lock_ttl")]
    pub slot_lock_ttl: Duration,
    /// Tax rate applied to the room-plus-extras subtotal.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
    /// How long an unpaid pending booking may wait for payment.
    #[serde(with = "duration_secs", default = "default_pending_payment_timeout")]
    pub pending_payment_timeout: Duration,
    /// Age past which the sweeper cancels a still-pending booking.
    #[serde(with = "duration_secs", default = "default_stale_pending_age")]
    pub stale_pending_age: Duration,
    /// Granularity suggested prices are rounded to, in minor units.
    #[serde(default = "default_price_step")]
    pub price_step: i64,
    /// How far ahead the pricing analyzer will generate suggestions.
    #[serde(default = "default_max_suggestion_days")]
    pub max_suggestion_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daily_lock_ttl: default_daily_lock_ttl(),
            slot_lock_ttl: default_slot_lock_ttl(),
            tax_rate: default_tax_rate(),
            pending_payment_timeout: default_pending_payment_timeout(),
            stale_pending_age: default_stale_pending_age(),
            price_step: default_price_step(),
            max_suggestion_days: default_max_suggestion_days(),
        }
    }
}

impl Config {
    /// Loads a configuration from a YAML file, applying defaults for any
    /// omitted field.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// contains values that fail [`Config::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the daily lock TTL.
    #[must_use]
    pub const fn with_daily_lock_ttl(mut self, ttl: Duration) -> Self {
        self.daily_lock_ttl = ttl;
        self
    }

    /// Sets the slot lock TTL.
    #[must_use]
    pub const fn with_slot_lock_ttl(mut self, ttl: Duration) -> Self {
        self.slot_lock_ttl = ttl;
        self
    }

    /// Sets the tax rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is outside [0, 1].
    pub fn with_tax_rate(mut self, rate: f64) -> Result<Self> {
        self.tax_rate = rate;
        self.validate()?;
        Ok(self)
    }

    /// Sets the price rounding step.
    ///
    /// # Errors
    ///
    /// Returns an error if the step is not positive.
    pub fn with_price_step(mut self, step: i64) -> Result<Self> {
        self.price_step = step;
        self.validate()?;
        Ok(self)
    }

    /// Sets the suggestion horizon in days.
    #[must_use]
    pub const fn with_max_suggestion_days(mut self, days: u32) -> Self {
        self.max_suggestion_days = days;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is outside its legal range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(Error::validation(
                "tax_rate",
                format!("must be in [0, 1], got {}", self.tax_rate),
            ));
        }
        if self.price_step <= 0 {
            return Err(Error::validation("price_step", "must be positive"));
        }
        if self.daily_lock_ttl.is_zero() || self.slot_lock_ttl.is_zero() {
            return Err(Error::validation("lock_ttl", "must be non-zero"));
        }
        // A booking must never be swept while its payment window is open
        if self.stale_pending_age < self.pending_payment_timeout {
            return Err(Error::validation(
                "stale_pending_age",
                "must be at least pending_payment_timeout",
            ));
        }
        Ok(())
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
