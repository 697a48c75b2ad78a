//! Cross-field score aggregation and top-K ranking

use std::cmp::Ordering;

use crate::bm25::Scores;
use crate::index::DocId;

/// Search result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub score: f64,
    pub rank: usize,
}

impl SearchResult {
    /// `(doc_id, score)`, the shape callers without a rank column expect.
    pub fn hit(&self) -> (DocId, f64) {
        (self.doc_id, self.score)
    }
}

/// Sum per-field scores, each multiplied by its field weight.
///
/// A document only collects contributions from the fields that scored it.
pub fn weighted_sum<I>(per_field: I) -> Scores
where
    I: IntoIterator<Item = (f64, Scores)>,
{
    let mut total = Scores::new();
    for (weight, scores) in per_field {
        for (doc_id, score) in scores {
            *total.entry(doc_id).or_insert(0.0) += score * weight;
        }
    }
    total
}

/// Order by descending score, ties by ascending doc id, and keep the first `k`.
///
/// Documents whose aggregate is exactly zero are dropped.
pub fn top_k(scores: Scores, k: usize) -> Vec<SearchResult> {
    let mut ranked: Vec<(DocId, f64)> = scores
        .into_iter()
        .filter(|&(_, score)| score != 0.0)
        .collect();
    ranked.sort_unstable_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });

    ranked
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(rank, (doc_id, score))| SearchResult {
            doc_id,
            score,
            rank,
        })
        .collect()
}
