//! Python bindings for the fieldrank query engine
//!
//! Lets a Python lemmatization pipeline feed normalized tokens straight
//! into the Rust ranking engine.

use fieldrank_core::{
    BM25Params, EngineConfig, FieldSpec, Operator, ParseOperatorError,
    QueryEngine as CoreQueryEngine, RankError, SearchResult as CoreSearchResult, Tokenizer,
};
use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;
use std::collections::HashMap;

fn to_py_err(err: RankError) -> PyErr {
    match err.root() {
        RankError::Io { .. } => PyOSError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// One ranked document. Read-only from Python.
#[pyclass(frozen, name = "Hit")]
pub struct Hit(CoreSearchResult);

#[pymethods]
impl Hit {
    #[getter]
    fn doc_id(&self) -> u32 {
        self.0.doc_id
    }

    #[getter]
    fn score(&self) -> f64 {
        self.0.score
    }

    /// 0-based position in the ranking
    #[getter]
    fn rank(&self) -> usize {
        self.0.rank
    }

    /// `(doc_id, score)` pair, as a lemmatization pipeline consumes it
    fn to_tuple(&self) -> (u32, f64) {
        self.0.hit()
    }

    fn __repr__(&self) -> String {
        format!("Hit(#{} doc {} scored {:.4})", self.0.rank, self.0.doc_id, self.0.score)
    }
}

/// Python-exposed multi-field query engine
#[pyclass(frozen)]
pub struct QueryEngine {
    engine: CoreQueryEngine,
    tokenizer: Tokenizer,
}

#[pymethods]
impl QueryEngine {
    /// Load field indexes
    ///
    /// Args:
    ///     fields: List of (index_path, weight) pairs
    ///     k1: BM25 term frequency saturation (default: 1.5)
    ///     b: BM25 length normalization (default: 0.75)
    ///     top_k: Maximum number of results (default: 10)
    #[new]
    #[pyo3(signature = (fields, k1=1.5, b=0.75, top_k=10))]
    fn new(fields: Vec<(String, f64)>, k1: f64, b: f64, top_k: usize) -> PyResult<Self> {
        let specs: Vec<FieldSpec> = fields
            .into_iter()
            .map(|(path, weight)| FieldSpec::new(path, weight))
            .collect();
        let config = EngineConfig {
            params: BM25Params { k1, b },
            top_k,
        };
        let engine = CoreQueryEngine::load(&specs, config).map_err(to_py_err)?;
        Ok(Self {
            engine,
            tokenizer: Tokenizer::default(),
        })
    }

    /// Rank documents for normalized query tokens
    ///
    /// Args:
    ///     tokens: Lowercase lemmas, stop-words removed
    ///     operator: "AND" or "OR" (default: "OR")
    ///
    /// Returns:
    ///     List of Hit objects, best first
    #[pyo3(signature = (tokens, operator="OR"))]
    fn search(&self, tokens: Vec<String>, operator: &str) -> PyResult<Vec<Hit>> {
        let operator: Operator = operator
            .parse()
            .map_err(|e: ParseOperatorError| PyValueError::new_err(e.to_string()))?;
        Ok(self
            .engine
            .search(&tokens, operator)
            .into_iter()
            .map(Hit)
            .collect())
    }

    /// Built-in normalizer: word split, lowercase, French stop-words, no lemmas
    fn normalize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    /// Get per-field statistics
    ///
    /// Returns:
    ///     List of dictionaries with name, num_docs, num_terms, avg_doc_len, weight
    fn stats(&self) -> Vec<HashMap<String, PyObject>> {
        Python::with_gil(|py| {
            self.engine
                .stats()
                .into_iter()
                .map(|field| {
                    let mut map = HashMap::new();
                    map.insert("name".to_string(), field.name.to_object(py));
                    map.insert("num_docs".to_string(), field.num_docs.to_object(py));
                    map.insert("num_terms".to_string(), field.num_terms.to_object(py));
                    map.insert("avg_doc_len".to_string(), field.avg_doc_len.to_object(py));
                    map.insert("weight".to_string(), field.weight.to_object(py));
                    map
                })
                .collect()
        })
    }

    fn __repr__(&self) -> String {
        let names: Vec<String> = self
            .engine
            .stats()
            .into_iter()
            .map(|field| format!("{}={}", field.name, field.weight))
            .collect();
        format!(
            "QueryEngine(fields=[{}], top_k={})",
            names.join(", "),
            self.engine.config().top_k
        )
    }
}

/// Python module
#[pymodule]
fn fieldrank_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<QueryEngine>()?;
    m.add_class::<Hit>()?;
    Ok(())
}
