//! Weekly cadence rollup.
//!
//! Groups ledger days into ISO weeks. Weeks at either end of the ledger
//! may be partial; `days_covered` says how many of their days the ledger
//! actually holds.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use pulse_types::DayBucket;

use crate::calendar::Ledger;
use crate::date_key::{week_bounds, week_key};

/// Activity totals for one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    /// ISO week key, e.g. "2026-W03"
    pub week: String,
    /// Monday of the week
    pub start_date: NaiveDate,
    /// Sunday of the week
    pub end_date: NaiveDate,
    pub days_covered: u8,
    pub active_days: u8,
    pub publications: u32,
    pub updates: u32,
}

impl WeekSummary {
    fn open(date: NaiveDate) -> Self {
        let (start_date, end_date) = week_bounds(date);
        Self {
            week: week_key(date),
            start_date,
            end_date,
            days_covered: 0,
            active_days: 0,
            publications: 0,
            updates: 0,
        }
    }

    fn absorb(&mut self, bucket: &DayBucket) {
        self.days_covered += 1;
        if bucket.is_active() {
            self.active_days += 1;
        }
        self.publications += bucket.publications();
        self.updates += bucket.updates();
    }
}

/// Roll a ledger up into consecutive ISO weeks.
pub fn weekly_rollup(ledger: &Ledger) -> Vec<WeekSummary> {
    let mut weeks: Vec<WeekSummary> = Vec::new();

    for bucket in ledger.buckets() {
        let date = bucket.date();
        match weeks.last_mut() {
            Some(week) if date <= week.end_date => week.absorb(bucket),
            _ => {
                let mut week = WeekSummary::open(date);
                week.absorb(bucket);
                weeks.push(week);
            }
        }
    }

    debug!(weeks = weeks.len(), days = ledger.span_days(), "Rolled up weeks");
    weeks
}
