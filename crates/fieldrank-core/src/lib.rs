//! fieldrank core - multi-field BM25 ranking over precomputed inverted indexes
//!
//! Fields are loaded once from positional index files, their statistics are
//! derived at load time, and queries made of normalized tokens are scored
//! per field with BM25, combined by field weight and ranked.

pub mod aggregate;
pub mod bm25;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod stats;
pub mod tokenizer;

pub use aggregate::SearchResult;
pub use bm25::{BM25Params, BM25Scorer, Scores};
pub use config::{EngineConfig, FieldSpec, RankerConfig, DEFAULT_TOP_K};
pub use engine::{Field, FieldSummary, Operator, ParseOperatorError, QueryEngine};
pub use error::{RankError, Result};
pub use index::{DocId, InvertedIndex, Occurrence, Posting};
pub use stats::FieldStats;
pub use tokenizer::Tokenizer;
