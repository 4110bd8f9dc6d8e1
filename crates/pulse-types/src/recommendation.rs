//! Ranking result types.

use serde::Serialize;

use crate::document::Document;

/// Score for one candidate within a single scoring call.
///
/// Borrows the candidate from the corpus; scores are discarded once the
/// ranking is truncated.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationScore<'a> {
    #[serde(rename = "post")]
    pub document: &'a Document,

    /// Accumulated score, never negative
    pub score: f64,

    /// Human-readable explanation of contributing factors
    pub reasons: Vec<String>,
}

impl<'a> RecommendationScore<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            score: 0.0,
            reasons: Vec::new(),
        }
    }

    /// Add points for a factor and note why.
    pub fn add(&mut self, points: f64, reason: impl Into<String>) {
        self.score += points;
        self.reasons.push(reason.into());
    }
}

/// A tag and how many documents carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}
