//! Relatedness scoring.
//!
//! Scores every candidate in a corpus against a target document:
//! - shared tags (per unique shared tag)
//! - equal non-empty category
//! - publish-date proximity, linearly decaying
//! - equal non-empty author
//!
//! After sorting, a single adjacent-swap pass lightly reorders near-tied
//! high scores. The pass draws on a [`TieBreaker`], so callers choose
//! between real randomness and a reproducible source.

use std::collections::HashSet;

use tracing::{debug, instrument, trace};

use pulse_types::{Document, RecommendationScore, RelatedConfig};

use crate::tie_break::{RandomTieBreaker, TieBreaker};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Multi-factor relatedness scorer.
#[derive(Debug, Clone, Default)]
pub struct RelatednessScorer {
    config: RelatedConfig,
}

impl RelatednessScorer {
    pub fn new(config: RelatedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RelatedConfig {
        &self.config
    }

    /// Score one candidate against the target.
    ///
    /// Does not check identity; [`score_all`](Self::score_all) excludes the
    /// target before scoring.
    pub fn score<'a>(&self, target: &Document, candidate: &'a Document) -> RecommendationScore<'a> {
        let mut result = RecommendationScore::new(candidate);

        let shared = shared_tags(target, candidate);
        if !shared.is_empty() {
            result.add(
                self.config.tag_weight * shared.len() as f64,
                format!("shared tags: {}", shared.join(", ")),
            );
        }

        if let (Some(mine), Some(theirs)) = (target.category(), candidate.category()) {
            if mine == theirs {
                result.add(self.config.category_weight, format!("same category: {mine}"));
            }
        }

        if let Some(bonus) = self.recency_bonus(target, candidate) {
            result.add(bonus, "published around the same time");
        }

        if let (Some(mine), Some(theirs)) = (target.author(), candidate.author()) {
            if mine == theirs {
                result.add(self.config.author_weight, "same author");
            }
        }

        trace!(
            candidate = %candidate.id,
            score = result.score,
            "Scored candidate"
        );
        result
    }

    /// Recency bonus, or `None` when either date is unparseable or the
    /// distance is beyond the recency window.
    fn recency_bonus(&self, target: &Document, candidate: &Document) -> Option<f64> {
        let mine = target.published_at().ok()?;
        let theirs = candidate.published_at().ok()?;
        let days = (mine - theirs).num_seconds().unsigned_abs() as f64 / SECONDS_PER_DAY;

        if days > self.config.recency_window_days {
            return None;
        }
        Some((self.config.recency_max_bonus - days * self.config.recency_decay_per_day).max(0.0))
    }

    /// Score and rank the whole corpus.
    ///
    /// The target (by id) is excluded and repeated ids are kept only once.
    /// Scores are sorted descending (stable for equal scores), then run
    /// through the near-tie pass when enabled.
    pub fn score_all<'a, T>(&self, target: &Document, corpus: &'a [Document], tie_breaker: &mut T) -> Vec<RecommendationScore<'a>>
    where
        T: TieBreaker + ?Sized,
    {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut scores: Vec<RecommendationScore<'a>> = corpus
            .iter()
            .filter(|doc| doc.id != target.id)
            .filter(|doc| seen.insert(doc.id.as_str()))
            .map(|doc| self.score(target, doc))
            .collect();

        scores.sort_by(|a, b| b.score.total_cmp(&a.score));

        if self.config.diversify {
            let swaps = diversify(
                &mut scores,
                self.config.tie_margin,
                self.config.tie_threshold,
                tie_breaker,
            );
            trace!(swaps, "Diversified near-ties");
        }

        scores
    }

    /// Top related documents using thread-local randomness and the
    /// configured limit.
    pub fn related<'a>(&self, target: &Document, corpus: &'a [Document]) -> Vec<&'a Document> {
        let mut tie_breaker = RandomTieBreaker::thread_local(self.config.swap_probability);
        self.related_with(target, corpus, self.config.limit, &mut tie_breaker)
    }

    /// Top `limit` related documents with an explicit tie-break source.
    #[instrument(skip_all, fields(target = %target.id, corpus = corpus.len(), limit = limit))]
    pub fn related_with<'a, T>(&self, target: &Document, corpus: &'a [Document], limit: usize, tie_breaker: &mut T) -> Vec<&'a Document>
    where
        T: TieBreaker + ?Sized,
    {
        let related: Vec<&'a Document> = self
            .score_all(target, corpus, tie_breaker)
            .into_iter()
            .take(limit)
            .map(|scored| scored.document)
            .collect();

        debug!(returned = related.len(), "Ranked related documents");
        related
    }
}

/// Unique target tags that the candidate also carries, in target order.
fn shared_tags<'t>(target: &'t Document, candidate: &Document) -> Vec<&'t str> {
    let theirs: HashSet<&str> = candidate.tags.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    target
        .tags
        .iter()
        .map(String::as_str)
        .filter(|tag| theirs.contains(tag) && seen.insert(*tag))
        .collect()
}

/// Single forward pass over a descending ranking.
///
/// Each adjacent pair `(i, i + 1)` whose scores differ by less than
/// `margin`, and whose higher score exceeds `threshold`, is offered to the
/// tie breaker and swapped when it says so. A swapped element can move
/// again at the next position. Returns the number of swaps.
pub fn diversify<T>(scores: &mut [RecommendationScore<'_>], margin: f64, threshold: f64, tie_breaker: &mut T) -> usize
where
    T: TieBreaker + ?Sized,
{
    let mut swaps = 0;
    for i in 0..scores.len().saturating_sub(1) {
        let current = scores[i].score;
        let next = scores[i + 1].score;
        let near_tie = (current - next).abs() < margin;
        let high_enough = current.max(next) > threshold;

        if near_tie && high_enough && tie_breaker.should_swap() {
            scores.swap(i, i + 1);
            swaps += 1;
        }
    }
    swaps
}
