//! Activity ledger library for blog-pulse.
//!
//! Provides:
//! - Calendar bucketing into a contiguous per-day ledger
//! - Activity aggregation (publications and updates per day)
//! - Streak and cadence statistics
//! - Weekly rollup of the ledger

pub mod aggregator;
pub mod calendar;
pub mod config;
pub mod date_key;
pub mod rollup;
pub mod stats;

pub use aggregator::{
    aggregate_activity, aggregate_into, ActivityAggregator, Aggregation, AggregationReport,
    SkippedEvent,
};
pub use calendar::{build_ledger, Ledger};
pub use config::AggregationWindow;
pub use date_key::{day_key, format_day_key, parse_day_key, week_key};
pub use rollup::{weekly_rollup, WeekSummary};
pub use stats::{calculate_stats, calculate_stats_for_year, calculate_streaks, StreakSummary};
