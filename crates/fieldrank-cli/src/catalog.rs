//! Document catalog used to present results

use anyhow::{Context, Result};
use fieldrank_core::{DocId, SearchResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const TITLE_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentMeta {
    pub url: String,
    pub title: String,
}

/// Documents indexed by their position in `documents.json`.
#[derive(Debug, Default)]
pub struct Catalog {
    docs: Vec<DocumentMeta>,
}

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let docs = serde_json::from_str(json).context("documents must be a JSON array")?;
        Ok(Self { docs })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn get(&self, doc_id: DocId) -> Option<&DocumentMeta> {
        self.docs.get(doc_id as usize)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// One display line per result: id, url and a title preview.
    pub fn describe(&self, result: &SearchResult, with_score: bool) -> String {
        let mut line = match self.get(result.doc_id) {
            Some(doc) => {
                let title: String = doc.title.chars().take(TITLE_PREVIEW_CHARS).collect();
                format!("Doc n°{} - {} - {}", result.doc_id, doc.url, title)
            }
            None => format!("Doc n°{} - <unknown document>", result.doc_id),
        };
        if with_score {
            line.push_str(&format!(" ({:.4})", result.score));
        }
        line
    }
}
