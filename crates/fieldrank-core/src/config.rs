//! Engine and field configuration

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::bm25::BM25Params;
use crate::error::{RankError, Result};

/// Default number of results returned by a search.
pub const DEFAULT_TOP_K: usize = 10;

/// Query-time settings shared by every field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(flatten)]
    pub params: BM25Params,
    pub top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            params: BM25Params::default(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// An index file and the weight of its field in the aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Display name, defaults to the file stem.
    #[serde(default)]
    pub name: Option<String>,
    pub path: PathBuf,
    pub weight: f64,
}

impl FieldSpec {
    pub fn new(path: impl Into<PathBuf>, weight: f64) -> Self {
        Self {
            name: None,
            path: path.into(),
            weight,
        }
    }

    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string())
        })
    }

    /// Parse a `PATH=WEIGHT` pair, as given on the command line.
    pub fn parse_pair(s: &str) -> std::result::Result<Self, String> {
        let (path, weight) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected PATH=WEIGHT, got `{s}`"))?;
        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|_| format!("invalid weight `{weight}`"))?;
        Ok(Self::new(path.trim(), weight))
    }
}

/// Complete ranker setup, loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankerConfig {
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            engine: EngineConfig::default(),
        }
    }
}

/// Page content at weight 1, titles at weight 3.
fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("content_pos_index.json", 1.0),
        FieldSpec::new("title_pos_index.json", 3.0),
    ]
}

impl RankerConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| RankError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}
