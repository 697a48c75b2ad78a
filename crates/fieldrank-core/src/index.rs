//! Positional inverted index for a single field
//!
//! Index files are produced upstream as JSON objects of the shape
//! `{ token: { doc_id: { "count": n, "positions": [..] } } }`.
//! Loading is all-or-nothing: any shape error rejects the whole field.

use ahash::AHashMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{RankError, Result};

/// Document identifier shared by every field and the document catalog.
pub type DocId = u32;

/// Occurrences of one token in one document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Occurrence {
    pub count: u32,
    /// Token offsets within the document. Loaded but not used for scoring.
    #[serde(default)]
    pub positions: Vec<u32>,
}

impl Occurrence {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            positions: Vec::new(),
        }
    }
}

/// Documents containing a token, never empty once loaded.
#[derive(Debug, Clone, Default)]
pub struct Posting {
    docs: AHashMap<DocId, Occurrence>,
}

impl Posting {
    /// Number of documents containing the token.
    pub fn doc_frequency(&self) -> usize {
        self.docs.len()
    }

    pub fn get(&self, doc_id: DocId) -> Option<&Occurrence> {
        self.docs.get(&doc_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Occurrence)> {
        self.docs.iter().map(|(&doc_id, occ)| (doc_id, occ))
    }
}

impl FromIterator<(DocId, Occurrence)> for Posting {
    fn from_iter<I: IntoIterator<Item = (DocId, Occurrence)>>(iter: I) -> Self {
        Self {
            docs: iter.into_iter().collect(),
        }
    }
}

type RawIndex = HashMap<String, HashMap<DocId, Occurrence>>;

/// Token → posting mapping for one field. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: AHashMap<String, Posting>,
}

impl InvertedIndex {
    /// Build an index from already-parsed postings.
    ///
    /// Fails with [`RankError::MalformedIndex`] if any token has no documents.
    pub fn from_postings<I>(postings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Posting)>,
    {
        let mut index = AHashMap::new();
        for (token, posting) in postings {
            if posting.docs.is_empty() {
                return Err(RankError::MalformedIndex(format!(
                    "token `{token}` has an empty posting"
                )));
            }
            index.insert(token, posting);
        }
        Ok(Self { postings: index })
    }

    /// Parse an index from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawIndex = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Parse an index from any reader yielding JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawIndex = serde_json::from_reader(BufReader::new(reader))?;
        Self::from_raw(raw)
    }

    /// Load an index file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    fn from_raw(raw: RawIndex) -> Result<Self> {
        Self::from_postings(
            raw.into_iter()
                .map(|(token, docs)| (token, docs.into_iter().collect())),
        )
    }

    pub fn get(&self, token: &str) -> Option<&Posting> {
        self.postings.get(token)
    }

    /// Whether `token` is part of this field's vocabulary.
    pub fn contains_token(&self, token: &str) -> bool {
        self.postings.contains_key(token)
    }

    /// Vocabulary size.
    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Posting)> {
        self.postings
            .iter()
            .map(|(token, posting)| (token.as_str(), posting))
    }
}
