//! Error types for index loading and engine construction

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading fields or building a query engine.
///
/// Searching never fails: unknown tokens and empty queries simply
/// produce empty results.
#[derive(Debug, Error)]
pub enum RankError {
    #[error("malformed index: {0}")]
    MalformedIndex(String),

    #[error("index contains no documents")]
    EmptyIndex,

    #[error("invalid weight {weight} for field `{field}`: must be positive and finite")]
    InvalidWeight { field: String, weight: f64 },

    #[error("at least one field is required")]
    NoFields,

    #[error("invalid BM25 parameters k1={k1}, b={b}: need finite k1 >= 0 and 0 <= b <= 1")]
    InvalidParams { k1: f64, b: f64 },

    #[error("invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("field `{field}`: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<RankError>,
    },
}

impl RankError {
    /// Attach the name of the field whose load failed.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any field context.
    pub fn root(&self) -> &RankError {
        match self {
            Self::Field { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for RankError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedIndex(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RankError>;
