//! Document type for the post collection.
//!
//! Documents are supplied by the content store and are read-only to the
//! engines. Timestamps are kept exactly as the store provides them and
//! parsed on demand, so a single bad value only affects the event that
//! uses it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PulseError, TimestampField};

/// Default reading speed used by [`reading_time_minutes`].
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A post in the collection.
///
/// Field names serialize in camelCase to match frontmatter and JSON
/// collections (`pubDate`, `updatedDate`, `pinnedOrder`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier (slug)
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Raw publish timestamp
    pub pub_date: String,

    /// Raw update timestamp, if the post was revised
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default)]
    pub pinned: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_order: Option<i64>,

    /// Body word count, when the loader computed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
}

impl Document {
    /// Create a document with the required fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>, pub_date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            pub_date: pub_date.into(),
            updated_date: None,
            tags: Vec::new(),
            category: None,
            author: None,
            pinned: false,
            pinned_order: None,
            word_count: None,
        }
    }

    pub fn with_updated(mut self, updated_date: impl Into<String>) -> Self {
        self.updated_date = Some(updated_date.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = Some(word_count);
        self
    }

    /// Parse the publish timestamp.
    pub fn published_at(&self) -> Result<DateTime<Utc>, PulseError> {
        parse_timestamp(&self.pub_date).ok_or_else(|| PulseError::MalformedTimestamp {
            document_id: self.id.clone(),
            field: TimestampField::Published,
            value: self.pub_date.clone(),
        })
    }

    /// Parse the update timestamp. `None` when the document was never updated.
    pub fn updated_at(&self) -> Option<Result<DateTime<Utc>, PulseError>> {
        self.updated_date.as_ref().map(|raw| {
            parse_timestamp(raw).ok_or_else(|| PulseError::MalformedTimestamp {
                document_id: self.id.clone(),
                field: TimestampField::Updated,
                value: raw.clone(),
            })
        })
    }

    /// Non-empty category, if any.
    pub fn category(&self) -> Option<&str> {
        non_empty(self.category.as_deref())
    }

    /// Non-empty author, if any.
    pub fn author(&self) -> Option<&str> {
        non_empty(self.author.as_deref())
    }

    /// Estimated reading time at the default reading speed.
    pub fn reading_time_minutes(&self) -> Option<usize> {
        self.word_count
            .map(|words| reading_time_minutes(words, DEFAULT_WORDS_PER_MINUTE))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Parse a content-store timestamp.
///
/// Accepts RFC 3339, RFC 2822, naive date-times (taken as UTC) and bare
/// dates (UTC midnight). Returns `None` for anything else.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Parse a JSON array of documents.
pub fn parse_collection(json: &str) -> Result<Vec<Document>, PulseError> {
    Ok(serde_json::from_str(json)?)
}

/// Minutes needed to read `words` at `words_per_minute`, rounded up.
pub fn reading_time_minutes(words: usize, words_per_minute: usize) -> usize {
    if words_per_minute == 0 {
        return 0;
    }
    words.div_ceil(words_per_minute)
}
