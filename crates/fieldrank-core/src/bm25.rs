//! BM25 scoring over a single field

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};
use crate::index::{DocId, InvertedIndex};
use crate::stats::FieldStats;

/// Per-document scores. Documents untouched by the query have no entry.
pub type Scores = AHashMap<DocId, f64>;

/// BM25 parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BM25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for BM25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

impl BM25Params {
    /// `k1` must be finite and non-negative, `b` within `[0, 1]`.
    ///
    /// Outside these ranges the length term can flip sign or scores turn NaN.
    pub fn validate(&self) -> Result<()> {
        let k1_ok = self.k1.is_finite() && self.k1 >= 0.0;
        let b_ok = (0.0..=1.0).contains(&self.b);
        if k1_ok && b_ok {
            Ok(())
        } else {
            Err(RankError::InvalidParams {
                k1: self.k1,
                b: self.b,
            })
        }
    }
}

/// BM25 scorer bound to one field's statistics
pub struct BM25Scorer<'a> {
    params: BM25Params,
    stats: &'a FieldStats,
}

impl<'a> BM25Scorer<'a> {
    pub fn new(params: BM25Params, stats: &'a FieldStats) -> Self {
        Self { params, stats }
    }

    /// Robertson/Sparck-Jones IDF, `ln((N - n + 0.5) / (n + 0.5))`.
    ///
    /// Negative once a token appears in more than half of the field's
    /// documents. The sign is kept as is.
    pub fn idf(&self, doc_freq: usize) -> f64 {
        let n = self.stats.n_docs() as f64;
        let df = doc_freq as f64;
        ((n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Score contribution of one token in one document.
    ///
    /// `tf` is the occurrence count relative to the document length.
    pub fn score_term(&self, count: u32, doc_len: u64, idf: f64) -> f64 {
        let BM25Params { k1, b } = self.params;
        let dl = doc_len as f64;
        let tf = f64::from(count) / dl;
        let denominator = tf + k1 * (1.0 - b + b * dl / self.stats.avg_doc_length());
        idf * tf * (k1 + 1.0) / denominator
    }

    /// Score every document of `index` touched by `tokens`.
    ///
    /// Tokens outside the vocabulary are skipped, as are zero-count occurrences.
    /// Repeated tokens add up again.
    pub fn score(&self, tokens: &[String], index: &InvertedIndex) -> Scores {
        let mut scores = Scores::new();
        for token in tokens {
            let Some(posting) = index.get(token) else {
                continue;
            };
            let idf = self.idf(posting.doc_frequency());
            for (doc_id, occ) in posting.iter().filter(|(_, occ)| occ.count > 0) {
                let doc_len = match self.stats.doc_length(doc_id) {
                    Some(len) if len > 0 => len,
                    _ => continue,
                };
                *scores.entry(doc_id).or_insert(0.0) += self.score_term(occ.count, doc_len, idf);
            }
        }
        scores
    }
}
