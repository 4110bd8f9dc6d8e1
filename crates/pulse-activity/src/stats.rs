//! Streak and cadence statistics.
//!
//! Works on any collection of day buckets; order does not matter.
//! Empty days count toward the span used for the weekly average but are
//! otherwise ignored.

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use pulse_types::{BlogStats, DayBucket};

use crate::calendar::Ledger;
use crate::date_key::days_between;

/// Current and longest runs of consecutive active days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    /// Run ending at the most recent active day
    pub current: u32,
    pub longest: u32,
}

/// Compute streaks over active days sorted ascending.
///
/// Callers must pass distinct dates in ascending order. The "current"
/// streak is the run that ends at the last active day, however long ago
/// that was.
pub fn calculate_streaks(active_days: &[NaiveDate]) -> StreakSummary {
    let Some((first, rest)) = active_days.split_first() else {
        return StreakSummary::default();
    };

    let mut longest = 0;
    let mut run = 1;
    let mut previous = *first;

    for &day in rest {
        if days_between(previous, day) == 1 {
            run += 1;
        } else {
            longest = longest.max(run);
            run = 1;
        }
        previous = day;
    }

    StreakSummary {
        current: run,
        longest: longest.max(run),
    }
}

/// Compute stats, counting `postsThisYear` against the current UTC year.
pub fn calculate_stats<'a, I>(buckets: I) -> BlogStats
where
    I: IntoIterator<Item = &'a DayBucket>,
{
    calculate_stats_for_year(buckets, Utc::now().year())
}

/// Compute stats with an explicit "current" year.
pub fn calculate_stats_for_year<'a, I>(buckets: I, year: i32) -> BlogStats
where
    I: IntoIterator<Item = &'a DayBucket>,
{
    let mut span = 0usize;
    let mut active: Vec<&DayBucket> = Vec::new();
    for bucket in buckets {
        span += 1;
        if bucket.is_active() {
            active.push(bucket);
        }
    }
    active.sort_by_key(|bucket| bucket.date());

    let total_posts: u32 = active.iter().map(|b| b.publications()).sum();
    let total_updates: u32 = active.iter().map(|b| b.updates()).sum();
    let posts_this_year: u32 = active
        .iter()
        .filter(|b| b.date().year() == year)
        .map(|b| b.publications())
        .sum();

    let dates: Vec<NaiveDate> = active.iter().map(|b| b.date()).collect();
    let streaks = calculate_streaks(&dates);

    let average_posts_per_week = if span > 0 {
        round2(f64::from(total_posts) / span as f64 * 7.0)
    } else {
        0.0
    };

    debug!(
        span,
        active_days = active.len(),
        total_posts,
        current_streak = streaks.current,
        longest_streak = streaks.longest,
        "Calculated stats"
    );

    BlogStats {
        total_posts,
        active_days: active.len() as u32,
        current_streak: streaks.current,
        longest_streak: streaks.longest,
        average_posts_per_week,
        total_updates,
        posts_this_year,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Ledger {
    /// Stats over the whole ledger for the current year.
    pub fn stats(&self) -> BlogStats {
        calculate_stats(self.buckets())
    }

    /// Stats over the whole ledger with an explicit current year.
    pub fn stats_for_year(&self, year: i32) -> BlogStats {
        calculate_stats_for_year(self.buckets(), year)
    }
}
