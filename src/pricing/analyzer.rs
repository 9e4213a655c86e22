//! Demand analysis and price suggestion.
//!
//! The analyzer reads booking history and current occupancy for one room
//! type and produces per-day price suggestions. The multiplier itself is a
//! pure function of four signals (weekend, weekday demand ratio, occupancy,
//! lead time) so it can be tested exhaustively without a store.

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::inventory::{InventoryKey, InventoryLevel};
use crate::store::Store;

/// Demand bucket derived from the computed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLevel {
    /// Multiplier below 0.95.
    Low,
    /// Multiplier in [0.95, 1.15).
    Medium,
    /// Multiplier in [1.15, 1.4).
    High,
    /// Multiplier at or above 1.4.
    Peak,
}

impl DemandLevel {
    /// Buckets a final multiplier.
    #[must_use]
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier >= 1.4 {
            Self::Peak
        } else if multiplier >= 1.15 {
            Self::High
        } else if multiplier >= 0.95 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Peak => "PEAK",
        };
        write!(f, "{s}")
    }
}

/// The demand signals feeding one day's multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandSignals {
    /// Whether the target date falls on a weekend.
    pub is_weekend: bool,
    /// Historical bookings on this weekday relative to the all-weekday
    /// average. 1.0 when there is no history.
    pub weekday_ratio: f64,
    /// Booked rooms over total rooms for the target date, in [0, 1].
    pub occupancy_rate: f64,
    /// Days between now and the target date.
    pub lead_days: i64,
}

/// Computes the pricing multiplier for one day's signals.
///
/// Terms, applied multiplicatively:
/// - weekend baseline 1.15, weekday 1.0
/// - weekday demand ratio above 1.3 adds 1.1, below 0.7 adds 0.9
/// - occupancy tier: >= 0.90 adds 1.3, >= 0.75 adds 1.15, >= 0.50 adds
///   1.05, < 0.25 adds 0.85
/// - last-minute (lead <= 2 days): discount 0.9 when occupancy < 0.50,
///   surge 1.2 when occupancy >= 0.75
///
/// The result is clamped to [0.7, 2.0].
#[must_use]
pub fn compute_multiplier(signals: &DemandSignals) -> f64 {
    let mut multiplier: f64 = if signals.is_weekend { 1.15 } else { 1.0 };

    if signals.weekday_ratio > 1.3 {
        multiplier *= 1.1;
    } else if signals.weekday_ratio < 0.7 {
        multiplier *= 0.9;
    }

    let occupancy = signals.occupancy_rate;
    if occupancy >= 0.90 {
        multiplier *= 1.3;
    } else if occupancy >= 0.75 {
        multiplier *= 1.15;
    } else if occupancy >= 0.50 {
        multiplier *= 1.05;
    } else if occupancy < 0.25 {
        multiplier *= 0.85;
    }

    if signals.lead_days <= 2 {
        if occupancy < 0.50 {
            multiplier *= 0.9;
        } else if occupancy >= 0.75 {
            multiplier *= 1.2;
        }
    }

    multiplier.clamp(0.7, 2.0)
}

/// Rounds a raw price to the nearest multiple of `step`.
#[must_use]
pub fn round_to_step(raw: f64, step: i64) -> i64 {
    if step <= 0 {
        return raw.round() as i64;
    }
    let steps = (raw / step as f64).round() as i64;
    steps * step
}

/// One day's price suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSuggestion {
    /// The target date.
    pub date: NaiveDate,
    /// The effective price currently in force (override or base).
    pub current_price: i64,
    /// The suggested price, rounded to the configured step.
    pub suggested_price: i64,
    /// The final clamped multiplier.
    pub multiplier: f64,
    /// Demand bucket for the multiplier.
    pub demand_level: DemandLevel,
    /// Occupancy rate used for the suggestion.
    pub occupancy_rate: f64,
}

/// Per-day suggestions plus revenue aggregates for the analyzed period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandReport {
    /// The room type analyzed.
    pub room_type_id: i64,
    /// One suggestion per day in the requested range.
    pub suggestions: Vec<PriceSuggestion>,
    /// Revenue over the period at current effective prices, counting only
    /// rooms already booked.
    pub current_revenue: i64,
    /// Revenue over the period at suggested prices for the same booked
    /// rooms.
    pub projected_revenue: i64,
}

/// How far back booking history feeds the weekday demand ratios.
const HISTORY_DAYS: u64 = 90;

/// Reads demand signals from the store and produces price suggestions.
pub struct DemandAnalyzer<'a> {
    store: &'a Store,
    config: &'a Config,
}

impl<'a> DemandAnalyzer<'a> {
    /// Creates an analyzer over the given store.
    pub fn new(store: &'a Store, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Analyzes `days` days starting at `start` for one room type.
    ///
    /// `today` anchors lead-time computation and the history window.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `days` is zero or exceeds the
    /// configured horizon, [`Error::NotFound`] for an unknown room type,
    /// and store errors as-is.
    pub fn analyze(
        &self,
        room_type_id: i64,
        today: NaiveDate,
        start: NaiveDate,
        days: u32,
    ) -> Result<DemandReport> {
        if days == 0 {
            return Err(Error::validation("days", "must be at least 1"));
        }
        if days > self.config.max_suggestion_days {
            return Err(Error::validation(
                "days",
                format!(
                    "must be at most {} (got {days})",
                    self.config.max_suggestion_days
                ),
            ));
        }

        let room_type = self.store.get_room_type(room_type_id)?;
        let weekday_ratios = self.weekday_ratios(room_type_id, today)?;

        let mut suggestions = Vec::with_capacity(days as usize);
        let mut current_revenue = 0i64;
        let mut projected_revenue = 0i64;

        for offset in 0..days {
            let date = start + Days::new(u64::from(offset));
            let key = InventoryKey::daily(room_type_id, date);
            let level = self
                .store
                .get_inventory_level(&key)?
                .unwrap_or_else(|| InventoryLevel::full(room_type.total_rooms));

            let occupied = room_type.total_rooms.saturating_sub(level.available);
            let occupancy_rate = if room_type.total_rooms == 0 {
                0.0
            } else {
                f64::from(occupied) / f64::from(room_type.total_rooms)
            };

            let signals = DemandSignals {
                is_weekend: is_weekend(date),
                weekday_ratio: weekday_ratios
                    .get(&date.weekday())
                    .copied()
                    .unwrap_or(1.0),
                occupancy_rate,
                lead_days: (date - today).num_days(),
            };
            let multiplier = compute_multiplier(&signals);

            let suggested_price = round_to_step(
                room_type.base_price_daily as f64 * multiplier,
                self.config.price_step,
            );
            let current_price = level.effective_price(room_type.base_price_daily);

            current_revenue += current_price * i64::from(occupied);
            projected_revenue += suggested_price * i64::from(occupied);

            suggestions.push(PriceSuggestion {
                date,
                current_price,
                suggested_price,
                multiplier,
                demand_level: DemandLevel::from_multiplier(multiplier),
                occupancy_rate,
            });
        }

        log::debug!(
            "analyzed {days} day(s) for room type {room_type_id}: current revenue {current_revenue}, projected {projected_revenue}"
        );

        Ok(DemandReport {
            room_type_id,
            suggestions,
            current_revenue,
            projected_revenue,
        })
    }

    /// Per-weekday booking counts over the trailing history window,
    /// normalized by the all-weekday average. Missing history yields an
    /// empty map; callers default absent weekdays to 1.0.
    fn weekday_ratios(
        &self,
        room_type_id: i64,
        today: NaiveDate,
    ) -> Result<HashMap<Weekday, f64>> {
        let since = today - Days::new(HISTORY_DAYS);
        let history = self.store.list_bookings_since(room_type_id, since)?;

        let mut counts: HashMap<Weekday, u32> = HashMap::new();
        let mut total = 0u32;
        for booking in &history {
            let check_in = booking.stay.start_date();
            if check_in > today {
                continue;
            }
            *counts.entry(check_in.weekday()).or_insert(0) += 1;
            total += 1;
        }

        if total == 0 {
            return Ok(HashMap::new());
        }

        let average = f64::from(total) / 7.0;
        Ok(counts
            .into_iter()
            .map(|(weekday, count)| (weekday, f64::from(count) / average))
            .collect())
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
