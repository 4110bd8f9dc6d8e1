//! # pulse-related
//!
//! Related-post ranking and discovery lists for blog-pulse.
//!
//! Scores candidates against a target document on shared tags, category,
//! publish-date proximity and author, then lightly reorders near-tied high
//! scores through an injectable [`TieBreaker`].
//!
//! ## Features
//! - Weighted multi-factor relatedness scoring with explanations
//! - Single-pass adjacent swap for near-tied results
//! - Seeded, scripted or disabled tie-breaking for reproducible rankings
//! - Latest posts, tag frequencies and random picks

pub mod discovery;
pub mod scorer;
pub mod tie_break;

pub use discovery::{latest_posts, popular_tags, random_posts, tag_frequencies};
pub use scorer::{diversify, RelatednessScorer};
pub use tie_break::{AlwaysSwap, NoTieBreak, RandomTieBreaker, ScriptedTieBreaker, TieBreaker};
