//! Calendar bucketer.
//!
//! Builds the per-day ledger: one zero-initialized [`DayBucket`] for every
//! calendar day between the window's first and last day, inclusive.
//! Buckets are only created here, so the ledger never has gaps.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use pulse_types::{ActivityRecord, DayBucket, PulseError};

use crate::config::AggregationWindow;
use crate::date_key::parse_day_key;

/// Ordered, contiguous day -> bucket ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    timezone: Tz,
    days: BTreeMap<NaiveDate, DayBucket>,
}

impl Ledger {
    /// Seed an empty bucket for every day the window touches.
    pub fn for_window(window: &AggregationWindow) -> Self {
        let first = window.first_day();
        let last = window.last_day();

        let days: BTreeMap<NaiveDate, DayBucket> = first
            .iter_days()
            .take_while(|day| *day <= last)
            .map(|day| (day, DayBucket::empty(day)))
            .collect();

        debug!(
            first = %first,
            last = %last,
            days = days.len(),
            timezone = window.timezone.name(),
            "Seeded ledger"
        );

        Self {
            timezone: window.timezone,
            days,
        }
    }

    /// Timezone the day keys were cut in.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.get(&date)
    }

    /// Look up a bucket by its `YYYY-MM-DD` key.
    pub fn get_key(&self, key: &str) -> Option<&DayBucket> {
        parse_day_key(key).and_then(|date| self.get(date))
    }

    /// Append a record to its day.
    ///
    /// Returns false (and records nothing) when the day lies outside the
    /// ledger; out-of-range keys are clipped, not errors.
    pub fn record(&mut self, record: ActivityRecord) -> bool {
        match self.days.get_mut(&record.date) {
            Some(bucket) => {
                bucket.record(record);
                true
            }
            None => false,
        }
    }

    /// All buckets in date order, including empty days.
    pub fn buckets(&self) -> impl Iterator<Item = &DayBucket> + '_ {
        self.days.values()
    }

    /// Buckets with at least one event, in date order.
    pub fn active_days(&self) -> impl Iterator<Item = &DayBucket> + '_ {
        self.days.values().filter(|bucket| bucket.is_active())
    }

    /// Day keys in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// Number of calendar days covered.
    pub fn span_days(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }
}

/// Build an empty ledger covering `[start, end]` in `timezone`.
///
/// Fails with `InvalidRange` when `end < start`; no partial ledger is
/// ever produced.
pub fn build_ledger(start: DateTime<Utc>, end: DateTime<Utc>, timezone: Tz) -> Result<Ledger, PulseError> {
    let window = AggregationWindow::new(start, end, timezone)?;
    Ok(Ledger::for_window(&window))
}
