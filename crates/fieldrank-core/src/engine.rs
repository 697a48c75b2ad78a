//! Multi-field query engine
//!
//! Each search scores the query against every field with BM25, sums the
//! weighted field scores, applies the operator and keeps the top results.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};

use crate::aggregate::{self, SearchResult};
use crate::bm25::{BM25Scorer, Scores};
use crate::config::{EngineConfig, FieldSpec, RankerConfig};
use crate::error::{RankError, Result};
use crate::index::InvertedIndex;
use crate::stats::FieldStats;

/// How query tokens combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Every query token must be known to at least one field.
    And,
    /// Any matching token is enough.
    Or,
}

#[derive(Debug, Error)]
#[error("unknown operator `{0}`, expected `and` or `or`")]
pub struct ParseOperatorError(String);

impl FromStr for Operator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            _ => Err(ParseOperatorError(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

/// A loaded field: its index, derived statistics and weight.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    index: InvertedIndex,
    stats: FieldStats,
    weight: f64,
}

impl Field {
    /// Compute statistics for `index` and validate `weight`.
    pub fn new(name: impl Into<String>, index: InvertedIndex, weight: f64) -> Result<Self> {
        let name = name.into();
        if !(weight > 0.0 && weight.is_finite()) {
            return Err(RankError::InvalidWeight {
                field: name,
                weight,
            });
        }
        let stats = FieldStats::from_index(&index).map_err(|e| e.in_field(name.as_str()))?;

        info!(
            field = %name,
            docs = stats.n_docs(),
            terms = index.num_terms(),
            avg_doc_len = stats.avg_doc_length(),
            weight,
            "loaded field"
        );

        Ok(Self {
            name,
            index,
            stats,
            weight,
        })
    }

    /// Load the index file named by `spec`.
    pub fn from_spec(spec: &FieldSpec) -> Result<Self> {
        let name = spec.name();
        let index = InvertedIndex::from_path(&spec.path).map_err(|e| e.in_field(name.as_str()))?;
        Self::new(name, index, spec.weight)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn stats(&self) -> &FieldStats {
        &self.stats
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Field statistics
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSummary {
    pub name: String,
    pub num_docs: usize,
    pub num_terms: usize,
    pub avg_doc_len: f64,
    pub weight: f64,
}

/// Ranks documents over a fixed, immutable set of fields.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    fields: Vec<Field>,
    config: EngineConfig,
}

impl QueryEngine {
    pub fn new(fields: Vec<Field>, config: EngineConfig) -> Result<Self> {
        if fields.is_empty() {
            return Err(RankError::NoFields);
        }
        config.params.validate()?;
        Ok(Self { fields, config })
    }

    /// Load every field. The first failure aborts the whole engine.
    pub fn load(specs: &[FieldSpec], config: EngineConfig) -> Result<Self> {
        config.params.validate()?;
        let fields = specs
            .iter()
            .map(Field::from_spec)
            .collect::<Result<Vec<_>>>()?;
        Self::new(fields, config)
    }

    pub fn from_config(config: &RankerConfig) -> Result<Self> {
        Self::load(&config.fields, config.engine)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether any field's vocabulary contains `token`.
    pub fn knows_token(&self, token: &str) -> bool {
        self.fields.iter().any(|f| f.index.contains_token(token))
    }

    /// Weighted aggregate BM25 score of every document touched by `tokens`.
    pub fn score(&self, tokens: &[String]) -> Scores {
        aggregate::weighted_sum(self.fields.iter().map(|field| {
            let scorer = BM25Scorer::new(self.config.params, &field.stats);
            (field.weight, scorer.score(tokens, &field.index))
        }))
    }

    /// Rank documents for already-normalized query tokens.
    pub fn search(&self, tokens: &[String], operator: Operator) -> Vec<SearchResult> {
        let qualifies = match operator {
            Operator::Or => true,
            Operator::And => tokens.iter().all(|token| self.knows_token(token)),
        };
        if tokens.is_empty() || !qualifies {
            debug!(%operator, tokens = tokens.len(), "query matches nothing");
            return Vec::new();
        }

        let scores = self.score(tokens);
        let candidates = scores.len();
        let results = aggregate::top_k(scores, self.config.top_k);
        debug!(
            %operator,
            tokens = tokens.len(),
            candidates,
            returned = results.len(),
            "search complete"
        );
        results
    }

    /// Get per-field statistics
    pub fn stats(&self) -> Vec<FieldSummary> {
        self.fields
            .iter()
            .map(|field| FieldSummary {
                name: field.name.clone(),
                num_docs: field.stats.n_docs(),
                num_terms: field.index.num_terms(),
                avg_doc_len: field.stats.avg_doc_length(),
                weight: field.weight,
            })
            .collect()
    }
}
