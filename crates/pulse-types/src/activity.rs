//! Activity ledger types.
//!
//! The ledger is a contiguous run of calendar days:
//! Day -> ActivityRecord
//!
//! Each day carries event counters and the records behind them.
//! `BlogStats` is the derived summary over a ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Format used for day keys (`YYYY-MM-DD`).
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Kind of activity event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// First publication of a post
    Publication,
    /// Revision of an already published post
    Update,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Publication => write!(f, "publication"),
            ActivityKind::Update => write!(f, "update"),
        }
    }
}

/// A single publication or update, attributed to its calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Day key, same as the owning bucket
    pub date: NaiveDate,

    #[serde(rename = "type")]
    pub kind: ActivityKind,

    pub post_id: String,

    pub post_title: String,

    /// Tags as they were when the ledger was built
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
}

impl ActivityRecord {
    pub fn new(
        date: NaiveDate,
        kind: ActivityKind,
        post_id: impl Into<String>,
        post_title: impl Into<String>,
    ) -> Self {
        Self {
            date,
            kind,
            post_id: post_id.into(),
            post_title: post_title.into(),
            tags: Vec::new(),
            word_count: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_word_count(mut self, word_count: Option<usize>) -> Self {
        self.word_count = word_count;
        self
    }
}

/// Activity for one calendar day.
///
/// `count == publications + updates` always holds: counters only move
/// through [`DayBucket::record`] or the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    date: NaiveDate,
    count: u32,
    publications: u32,
    updates: u32,
    posts: Vec<ActivityRecord>,
}

impl DayBucket {
    /// Zero-initialized bucket for `date`.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            publications: 0,
            updates: 0,
            posts: Vec::new(),
        }
    }

    /// Bucket with preset counters and no records.
    ///
    /// Useful when the summary is known but the individual records are not.
    /// `updates` is clamped so that `count` still fits in a `u32`.
    pub fn with_counts(date: NaiveDate, publications: u32, updates: u32) -> Self {
        let updates = updates.min(u32::MAX - publications);
        Self {
            date,
            count: publications + updates,
            publications,
            updates,
            posts: Vec::new(),
        }
    }

    /// Append a record and bump the matching counter.
    pub fn record(&mut self, record: ActivityRecord) {
        match record.kind {
            ActivityKind::Publication => self.publications += 1,
            ActivityKind::Update => self.updates += 1,
        }
        self.count += 1;
        self.posts.push(record);
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Day key in `YYYY-MM-DD` form.
    pub fn date_key(&self) -> String {
        self.date.format(DATE_KEY_FORMAT).to_string()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn publications(&self) -> u32 {
        self.publications
    }

    pub fn updates(&self) -> u32 {
        self.updates
    }

    pub fn posts(&self) -> &[ActivityRecord] {
        &self.posts
    }

    /// True when at least one event landed on this day.
    pub fn is_active(&self) -> bool {
        self.count > 0
    }
}

/// Summary statistics derived from a ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    /// Publications across active days
    pub total_posts: u32,

    /// Days with at least one event
    pub active_days: u32,

    /// Length of the run ending at the most recent active day
    pub current_streak: u32,

    pub longest_streak: u32,

    /// Publications per week over the whole ledger span, 2 decimals
    pub average_posts_per_week: f64,

    pub total_updates: u32,

    /// Publications dated in the current calendar year
    pub posts_this_year: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[test]
    fn test_empty_bucket_is_inactive() {
        let bucket = DayBucket::empty(day(15));
        assert!(!bucket.is_active());
        assert_eq!(bucket.count(), 0);
        assert_eq!(bucket.date_key(), "2026-01-15");
    }

    #[test]
    fn test_record_keeps_count_invariant() {
        let mut bucket = DayBucket::empty(day(15));
        bucket.record(ActivityRecord::new(day(15), ActivityKind::Publication, "a", "A"));
        bucket.record(ActivityRecord::new(day(15), ActivityKind::Update, "b", "B"));
        bucket.record(ActivityRecord::new(day(15), ActivityKind::Publication, "c", "C"));

        assert_eq!(bucket.publications(), 2);
        assert_eq!(bucket.updates(), 1);
        assert_eq!(bucket.count(), bucket.publications() + bucket.updates());
        assert_eq!(bucket.posts().len(), 3);
        assert!(bucket.is_active());
    }

    #[test]
    fn test_with_counts() {
        let bucket = DayBucket::with_counts(day(15), 3, 2);
        assert_eq!(bucket.count(), 5);
        assert!(bucket.posts().is_empty());
    }

    #[test]
    fn test_with_counts_near_u32_max_keeps_sum() {
        let bucket = DayBucket::with_counts(day(15), u32::MAX - 1, 5);
        assert_eq!(bucket.publications(), u32::MAX - 1);
        assert_eq!(bucket.updates(), 1);
        assert_eq!(bucket.count(), u32::MAX);
        assert_eq!(bucket.count(), bucket.publications() + bucket.updates());
    }

    #[test]
    fn test_activity_kind_display() {
        assert_eq!(ActivityKind::Publication.to_string(), "publication");
        assert_eq!(ActivityKind::Update.to_string(), "update");
    }

    #[test]
    fn test_bucket_serializes_date_key() {
        let mut bucket = DayBucket::empty(day(3));
        bucket.record(
            ActivityRecord::new(day(3), ActivityKind::Update, "a", "A")
                .with_tags(vec!["rust".to_string()]),
        );
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["date"], "2026-01-03");
        assert_eq!(json["updates"], 1);
        assert_eq!(json["posts"][0]["type"], "update");
        assert_eq!(json["posts"][0]["postId"], "a");
    }

    #[test]
    fn test_blog_stats_camel_case() {
        let stats = BlogStats {
            total_posts: 3,
            average_posts_per_week: 1.25,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalPosts"], 3);
        assert_eq!(json["averagePostsPerWeek"], 1.25);
    }
}
