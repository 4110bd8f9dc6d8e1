//! # pulse-types
//!
//! Shared domain types for blog-pulse.
//!
//! This crate defines the data structures used by the activity and
//! relatedness engines:
//! - Documents: Posts supplied by the content store
//! - Ledger entries: Per-day activity buckets and their records
//! - Stats: Streak and cadence summaries
//! - Rankings: Recommendation scores and tag counts
//! - Settings: Configuration types
//!
//! ## Usage
//!
//! ```rust
//! use pulse_types::Document;
//!
//! let post = Document::new("hello-world", "Hello, world", "2026-01-15")
//!     .with_tags(["rust", "intro"]);
//! assert!(post.published_at().is_ok());
//! ```

pub mod activity;
pub mod config;
pub mod document;
pub mod error;
pub mod recommendation;

pub use activity::{ActivityKind, ActivityRecord, BlogStats, DayBucket, DATE_KEY_FORMAT};
pub use config::{ActivityConfig, RelatedConfig, Settings, DEFAULT_TIMEZONE, MAX_WINDOW_DAYS};
pub use document::{parse_collection, parse_timestamp, reading_time_minutes, Document, DEFAULT_WORDS_PER_MINUTE};
pub use error::{PulseError, TimestampField};
pub use recommendation::{RecommendationScore, TagCount};
