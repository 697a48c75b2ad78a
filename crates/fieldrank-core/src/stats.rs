//! Per-field corpus statistics used for BM25 length normalization

use ahash::AHashMap;

use crate::error::{RankError, Result};
use crate::index::{DocId, InvertedIndex};

/// Corpus size and document lengths of one field.
#[derive(Debug, Clone)]
pub struct FieldStats {
    n_docs: usize,
    avg_doc_length: f64,
    doc_lengths: AHashMap<DocId, u64>,
}

impl FieldStats {
    /// Derive statistics from a loaded index in a single pass over its postings.
    ///
    /// A document's length is the sum of its occurrence counts across every
    /// token of the field. Only documents present in some posting get an entry.
    pub fn from_index(index: &InvertedIndex) -> Result<Self> {
        let mut doc_lengths: AHashMap<DocId, u64> = AHashMap::new();
        for (_, posting) in index.iter() {
            for (doc_id, occ) in posting.iter() {
                *doc_lengths.entry(doc_id).or_insert(0) += u64::from(occ.count);
            }
        }

        let n_docs = doc_lengths.len();
        if n_docs == 0 {
            return Err(RankError::EmptyIndex);
        }
        let total: u64 = doc_lengths.values().sum();
        let avg_doc_length = total as f64 / n_docs as f64;

        Self::from_parts(n_docs, avg_doc_length, doc_lengths)
    }

    /// Use precomputed statistics.
    ///
    /// The average must be positive, otherwise length normalization divides by zero.
    /// A non-empty length table must hold exactly `n_docs` documents.
    pub fn from_parts(
        n_docs: usize,
        avg_doc_length: f64,
        doc_lengths: AHashMap<DocId, u64>,
    ) -> Result<Self> {
        if n_docs == 0 || !(avg_doc_length > 0.0 && avg_doc_length.is_finite()) {
            return Err(RankError::EmptyIndex);
        }
        if !doc_lengths.is_empty() && doc_lengths.len() != n_docs {
            return Err(RankError::MalformedIndex(format!(
                "statistics claim {n_docs} documents but list lengths for {}",
                doc_lengths.len()
            )));
        }
        Ok(Self {
            n_docs,
            avg_doc_length,
            doc_lengths,
        })
    }

    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    pub fn avg_doc_length(&self) -> f64 {
        self.avg_doc_length
    }

    /// Length of `doc_id` in this field, `None` if the field never mentions it.
    pub fn doc_length(&self, doc_id: DocId) -> Option<u64> {
        self.doc_lengths.get(&doc_id).copied()
    }
}
