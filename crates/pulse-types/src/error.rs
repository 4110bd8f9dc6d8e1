//! Error types for the blog-pulse engines.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Unified error type for activity and relatedness operations.
#[derive(Debug, Error)]
pub enum PulseError {
    /// The requested window ends before it starts
    #[error("Invalid range: end {end} precedes start {start}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A document timestamp could not be parsed into a date
    #[error("Malformed {field} timestamp on document {document_id}: {value:?}")]
    MalformedTimestamp {
        document_id: String,
        field: TimestampField,
        value: String,
    },

    /// Timezone string is not a known IANA identifier
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Which document timestamp an error or skip refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampField {
    /// The publish timestamp (`pubDate`)
    Published,
    /// The update timestamp (`updatedDate`)
    Updated,
}

impl std::fmt::Display for TimestampField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampField::Published => write!(f, "publish"),
            TimestampField::Updated => write!(f, "update"),
        }
    }
}
