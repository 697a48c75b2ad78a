mod catalog;

use anyhow::{Context, Result};
use clap::Parser;
use fieldrank_core::{FieldSpec, Operator, QueryEngine, RankerConfig, Tokenizer};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use crate::catalog::Catalog;

#[derive(Parser, Debug)]
#[command(name = "fieldrank", version, about = "Multi-field BM25 search over precomputed indexes", long_about = None)]
struct Args {
    /// JSON config file with fields and engine settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field index and its weight, replaces the configured fields (repeatable)
    #[arg(long = "field", value_name = "PATH=WEIGHT", value_parser = FieldSpec::parse_pair)]
    fields: Vec<FieldSpec>,

    /// Document catalog, a JSON array indexed by document id
    #[arg(long, default_value = "documents.json")]
    documents: PathBuf,

    /// How query tokens combine: `and` or `or`
    #[arg(long, default_value = "or")]
    operator: Operator,

    /// Number of results per query
    #[arg(long)]
    top_k: Option<usize>,

    /// BM25 term frequency saturation
    #[arg(long)]
    k1: Option<f64>,

    /// BM25 length normalization
    #[arg(long)]
    b: Option<f64>,

    /// Print the aggregate score after each result
    #[arg(long, default_value = "false")]
    scores: bool,
}

impl Args {
    fn ranker_config(&self) -> Result<RankerConfig> {
        let mut config = match &self.config {
            Some(path) => RankerConfig::from_path(path)?,
            None => RankerConfig::default(),
        };
        if !self.fields.is_empty() {
            config.fields = self.fields.clone();
        }
        if let Some(top_k) = self.top_k {
            config.engine.top_k = top_k;
        }
        if let Some(k1) = self.k1 {
            config.engine.params.k1 = k1;
        }
        if let Some(b) = self.b {
            config.engine.params.b = b;
        }
        Ok(config)
    }
}

struct Session<'a> {
    engine: &'a QueryEngine,
    catalog: &'a Catalog,
    tokenizer: Tokenizer,
    operator: Operator,
    scores: bool,
}

impl Session<'_> {
    fn answer(&self, query: &str, out: &mut impl Write) -> io::Result<()> {
        let tokens = self.tokenizer.tokenize(query);
        let results = self.engine.search(&tokens, self.operator);
        if results.is_empty() {
            writeln!(out, "No results.")?;
        }
        for result in &results {
            writeln!(out, "{}", self.catalog.describe(result, self.scores))?;
        }
        Ok(())
    }

    /// Prompt, read a query, answer. Stops on `exit` or end of input.
    fn run(&self, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        let mut lines = input.lines();
        loop {
            write!(out, "Enter a query: ")?;
            out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(out)?;
                return Ok(());
            };
            let line = line?;
            let query = line.trim();
            if query == "exit" {
                return Ok(());
            }
            if !query.is_empty() {
                self.answer(query, out)?;
            }
        }
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let config = args.ranker_config()?;
    let engine = QueryEngine::from_config(&config).context("failed to load field indexes")?;
    let catalog = Catalog::from_path(&args.documents)?;
    tracing::info!(
        fields = engine.fields().len(),
        documents = catalog.len(),
        operator = %args.operator,
        "ready"
    );

    let session = Session {
        engine: &engine,
        catalog: &catalog,
        tokenizer: Tokenizer::default(),
        operator: args.operator,
        scores: args.scores,
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldrank_core::{EngineConfig, Field, InvertedIndex};

    fn engine() -> QueryEngine {
        let content = InvertedIndex::from_json_str(
            r#"{
                "chat":   {"0": {"count": 2}, "1": {"count": 1}},
                "jardin": {"1": {"count": 1}, "2": {"count": 3}},
                "rue":    {"2": {"count": 1}, "3": {"count": 1}},
                "ville":  {"4": {"count": 1}, "5": {"count": 2}}
            }"#,
        )
        .unwrap();
        let title = InvertedIndex::from_json_str(
            r#"{
                "chat":  {"0": {"count": 1}},
                "rue":   {"2": {"count": 1}},
                "ville": {"3": {"count": 1}}
            }"#,
        )
        .unwrap();
        QueryEngine::new(
            vec![
                Field::new("content", content, 1.0).unwrap(),
                Field::new("title", title, 3.0).unwrap(),
            ],
            EngineConfig::default(),
        )
        .unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::from_json_str(
            r#"[
                {"url": "https://example.fr/0", "title": "Chats"},
                {"url": "https://example.fr/1", "title": "Jardins"},
                {"url": "https://example.fr/2", "title": "Rues"},
                {"url": "https://example.fr/3", "title": "Villes"}
            ]"#,
        )
        .unwrap()
    }

    fn run(operator: Operator, input: &str) -> String {
        let engine = engine();
        let catalog = catalog();
        let session = Session {
            engine: &engine,
            catalog: &catalog,
            tokenizer: Tokenizer::default(),
            operator,
            scores: false,
        };
        let mut out = Vec::new();
        session.run(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_session_prints_ranked_documents() {
        let out = run(Operator::Or, "le chat\nexit\n");
        assert!(out.starts_with("Enter a query: Doc n°0 - https://example.fr/0 - Chats\n"));
        assert!(out.contains("Doc n°1 - https://example.fr/1 - Jardins"));
        assert!(!out.contains("Doc n°2"));
    }

    #[test]
    fn test_session_and_with_unknown_word() {
        let out = run(Operator::And, "chat licorne\n");
        assert!(out.contains("No results."));
    }

    #[test]
    fn test_session_ends_on_eof_and_skips_blank_lines() {
        let out = run(Operator::Or, "\n   \n");
        assert_eq!(out.matches("Enter a query: ").count(), 3);
        assert!(!out.contains("No results."));
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "fieldrank",
            "--field",
            "body.json=2",
            "--top-k",
            "5",
            "--k1",
            "1.2",
            "--operator",
            "AND",
        ]);
        let config = args.ranker_config().unwrap();
        assert_eq!(config.fields, vec![FieldSpec::new("body.json", 2.0)]);
        assert_eq!(config.engine.top_k, 5);
        assert_eq!(config.engine.params.k1, 1.2);
        assert_eq!(config.engine.params.b, 0.75);
        assert_eq!(args.operator, Operator::And);
    }

    #[test]
    fn test_default_config_matches_reference_fields() {
        let args = Args::parse_from(["fieldrank"]);
        let config = args.ranker_config().unwrap();
        assert_eq!(config.fields.len(), 2);
        assert_eq!(config.fields[1].weight, 3.0);
        assert_eq!(args.operator, Operator::Or);
    }
}
