//! Deterministic discovery lists plus random picks.
//!
//! `latest_posts` and `tag_frequencies` are pure functions of their input.
//! `random_posts` takes the RNG as a parameter.

use std::cmp::Reverse;
use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use pulse_types::{Document, TagCount};

/// Most recently published documents first.
///
/// Sorting is stable, so equal timestamps keep corpus order. Documents
/// whose publish timestamp cannot be parsed sort last. When `exclude` is
/// given, every document with its id is left out.
pub fn latest_posts<'a>(corpus: &'a [Document], exclude: Option<&Document>, limit: usize) -> Vec<&'a Document> {
    let mut posts: Vec<&'a Document> = corpus
        .iter()
        .filter(|doc| exclude.is_none_or(|skip| skip.id != doc.id))
        .collect();

    posts.sort_by_cached_key(|doc| Reverse(doc.published_at().ok()));
    posts.truncate(limit);
    posts
}

/// Every tag with its occurrence count, most frequent first.
///
/// Equal counts keep the order in which tags were first encountered.
pub fn tag_frequencies(corpus: &[Document]) -> Vec<TagCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TagCount> = Vec::new();

    for tag in corpus.iter().flat_map(|doc| doc.tags.iter()) {
        match index.get(tag.as_str()) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(tag.as_str(), counts.len());
                counts.push(TagCount {
                    tag: tag.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    debug!(distinct = counts.len(), documents = corpus.len(), "Counted tags");
    counts
}

/// The `limit` most frequent tag names.
pub fn popular_tags(corpus: &[Document], limit: usize) -> Vec<String> {
    tag_frequencies(corpus)
        .into_iter()
        .take(limit)
        .map(|entry| entry.tag)
        .collect()
}

/// Up to `limit` documents other than the target, in random order.
pub fn random_posts<'a, R>(target: &Document, corpus: &'a [Document], limit: usize, rng: &mut R) -> Vec<&'a Document>
where
    R: Rng + ?Sized,
{
    let mut others: Vec<&'a Document> = corpus.iter().filter(|doc| doc.id != target.id).collect();
    others.shuffle(rng);
    others.truncate(limit);
    others
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn doc(id: &str, pub_date: &str, tags: &[&str]) -> Document {
        Document::new(id, id, pub_date).with_tags(tags.iter().copied())
    }

    fn ids(docs: &[&Document]) -> Vec<String> {
        docs.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn test_latest_posts_newest_first() {
        let corpus = vec![
            doc("old", "2024-01-01", &[]),
            doc("new", "2026-03-01", &[]),
            doc("mid", "2025-06-15T10:00:00Z", &[]),
        ];
        assert_eq!(ids(&latest_posts(&corpus, None, 10)), vec!["new", "mid", "old"]);
        assert_eq!(ids(&latest_posts(&corpus, None, 1)), vec!["new"]);
    }

    #[test]
    fn test_latest_posts_excludes_target() {
        let corpus = vec![doc("a", "2026-01-01", &[]), doc("b", "2026-01-02", &[])];
        let latest = latest_posts(&corpus, Some(&corpus[1]), 4);
        assert_eq!(ids(&latest), vec!["a"]);
    }

    #[test]
    fn test_latest_posts_unparseable_last_and_stable() {
        let corpus = vec![
            doc("broken", "soon", &[]),
            doc("first", "2026-01-01", &[]),
            doc("second", "2026-01-01", &[]),
        ];
        assert_eq!(
            ids(&latest_posts(&corpus, None, 10)),
            vec!["first", "second", "broken"]
        );
    }

    #[test]
    fn test_tag_frequencies_ties_keep_first_seen_order() {
        let corpus = vec![
            doc("a", "2026-01-01", &["web", "rust"]),
            doc("b", "2026-01-02", &["cli", "rust"]),
            doc("c", "2026-01-03", &["cli"]),
        ];
        let counts = tag_frequencies(&corpus);
        let flat: Vec<(&str, usize)> = counts.iter().map(|c| (c.tag.as_str(), c.count)).collect();
        assert_eq!(flat, vec![("rust", 2), ("cli", 2), ("web", 1)]);
    }

    #[test]
    fn test_popular_tags_limit() {
        let corpus = vec![
            doc("a", "2026-01-01", &["x", "y", "z"]),
            doc("b", "2026-01-01", &["z"]),
        ];
        assert_eq!(popular_tags(&corpus, 2), vec!["z".to_string(), "x".to_string()]);
        assert!(popular_tags(&corpus, 0).is_empty());
        assert!(popular_tags(&[], 5).is_empty());
    }

    #[test]
    fn test_random_posts_excludes_target_and_limits() {
        let corpus: Vec<Document> = (0..10).map(|i| doc(&format!("p{i}"), "2026-01-01", &[])).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let picked = random_posts(&corpus[0], &corpus, 4, &mut rng);
        assert_eq!(picked.len(), 4);
        assert!(picked.iter().all(|d| d.id != "p0"));

        let mut unique = ids(&picked);
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_random_posts_seeded_is_reproducible() {
        let corpus: Vec<Document> = (0..10).map(|i| doc(&format!("p{i}"), "2026-01-01", &[])).collect();
        let first = random_posts(&corpus[0], &corpus, 5, &mut StdRng::seed_from_u64(11));
        let second = random_posts(&corpus[0], &corpus, 5, &mut StdRng::seed_from_u64(11));
        assert_eq!(ids(&first), ids(&second));
    }
}
