//! End-to-end test infrastructure for blog-pulse.
//!
//! Provides a shared fixture blog and helpers for tests covering the
//! document store -> ledger -> stats pipeline and related-post ranking.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use pulse_activity::AggregationWindow;
use pulse_types::Document;

/// Shared fixture for E2E tests.
///
/// Two months of posts with a mix of timestamp formats, one revised post,
/// one post published just before midnight UTC (already the next day in
/// Shanghai) and one post far outside the default window.
pub struct BlogFixture {
    pub documents: Vec<Document>,
}

impl BlogFixture {
    pub fn new() -> Self {
        Self {
            documents: blog_corpus(),
        }
    }

    /// Look up a fixture post by id.
    pub fn post(&self, id: &str) -> &Document {
        self.documents
            .iter()
            .find(|doc| doc.id == id)
            .unwrap_or_else(|| panic!("No fixture post {id}"))
    }

    /// Fixture posts in a reproducible shuffled order.
    pub fn shuffled(&self, seed: u64) -> Vec<Document> {
        let mut documents = self.documents.clone();
        documents.shuffle(&mut StdRng::seed_from_u64(seed));
        documents
    }

    /// Window covering 2026-01-01 through 2026-02-28 in `timezone`.
    pub fn window(&self, timezone: Tz) -> AggregationWindow {
        AggregationWindow::new(at(2026, 1, 1, 0), at(2026, 2, 28, 0), timezone)
            .expect("Fixture window is valid")
    }
}

impl Default for BlogFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixture blog.
pub fn blog_corpus() -> Vec<Document> {
    vec![
        Document::new("rust/ownership", "Ownership in Rust", "2026-01-05T09:00:00+08:00")
            .with_tags(["rust", "memory"])
            .with_category("tech")
            .with_author("lin")
            .with_word_count(1200),
        Document::new("rust/lifetimes", "Lifetimes", "2026-01-06T21:30:00+08:00")
            .with_updated("2026-02-01T10:00:00+08:00")
            .with_tags(["rust", "memory"])
            .with_category("tech")
            .with_author("lin"),
        Document::new("rust/traits", "Traits and generics", "2026-01-06T23:30:00Z")
            .with_tags(["rust", "types"])
            .with_category("tech")
            .with_author("lin"),
        Document::new("cli/clap", "Parsing arguments with clap", "2026-01-20T12:00:00Z")
            .with_tags(["rust", "cli"])
            .with_category("tech")
            .with_author("sam"),
        Document::new("life/sourdough", "Sourdough diary", "2026-01-21")
            .with_tags(["cooking"])
            .with_category("life")
            .with_author("lin"),
        Document::new("life/hiking", "Winter hiking", "2026-02-14 07:00:00")
            .with_tags(["outdoors"])
            .with_category("life"),
        Document::new("old/hello", "Hello world", "2024-06-01").with_tags(["meta"]),
    ]
}

/// Create `count` near-identical posts sharing `tags`, one day apart.
pub fn sample_posts(count: usize, tags: &[&str]) -> Vec<Document> {
    let first = date(2026, 1, 1);
    first
        .iter_days()
        .take(count)
        .enumerate()
        .map(|(i, day)| {
            Document::new(format!("sample-{i}"), format!("Sample {i}"), day.to_string())
                .with_tags(tags.iter().copied())
        })
        .collect()
}

/// UTC instant at the top of `hour`.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("Valid fixture instant")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("Valid fixture date")
}
