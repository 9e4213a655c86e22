//! Demand-driven pricing: analysis and suggestion application.
//!
//! The analyzer turns occupancy and booking history into per-day price
//! suggestions; the applier writes accepted suggestions back as inventory
//! price overrides. Both read the same inventory the reservation engine
//! mutates, so an applied suggestion takes effect on the next quote.

pub mod analyzer;
pub mod applier;

pub use analyzer::{
    compute_multiplier, round_to_step, DemandAnalyzer, DemandLevel, DemandReport, DemandSignals,
    PriceSuggestion,
};
pub use applier::{ApplyOutcome, SuggestionApplier};
