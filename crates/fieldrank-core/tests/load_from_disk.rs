use fieldrank_core::{
    EngineConfig, FieldSpec, Operator, QueryEngine, RankError, RankerConfig, Tokenizer,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const CONTENT: &str = r#"{
    "chat":    {"0": {"count": 3, "positions": [0, 7, 19]}, "1": {"count": 1, "positions": [4]}},
    "noir":    {"0": {"count": 1, "positions": [1]}, "2": {"count": 2, "positions": [2, 8]}},
    "maison":  {"1": {"count": 2, "positions": [0, 9]}, "2": {"count": 1, "positions": [5]},
                "3": {"count": 4, "positions": [1, 3, 5, 7]}},
    "jardin":  {"3": {"count": 1, "positions": [2]}, "4": {"count": 3, "positions": [0, 1, 2]}},
    "musique": {"5": {"count": 2, "positions": [3, 6]}}
}"#;

const TITLE: &str = r#"{
    "chat":    {"1": {"count": 1, "positions": [0]}},
    "jardin":  {"4": {"count": 1, "positions": [1]}},
    "musique": {"5": {"count": 1, "positions": [0]}}
}"#;

fn write_fields(dir: &Path) -> Vec<FieldSpec> {
    let content = dir.join("content_pos_index.json");
    let title = dir.join("title_pos_index.json");
    fs::write(&content, CONTENT).unwrap();
    fs::write(&title, TITLE).unwrap();
    vec![FieldSpec::new(content, 1.0), FieldSpec::new(title, 3.0)]
}

#[test]
fn loads_fields_and_ranks_title_matches_first() {
    let dir = tempdir().unwrap();
    let specs = write_fields(dir.path());
    let engine = QueryEngine::load(&specs, EngineConfig::default()).unwrap();

    let stats = engine.stats();
    assert_eq!(stats[0].name, "content_pos_index");
    assert_eq!(stats[0].num_docs, 6);
    assert_eq!(stats[1].name, "title_pos_index");
    assert_eq!(stats[1].num_docs, 3);

    let tokens = Tokenizer::default().tokenize("Un chat dans le jardin");
    assert_eq!(tokens, vec!["chat", "jardin"]);

    let results = engine.search(&tokens, Operator::Or);
    assert!(!results.is_empty());
    assert!(results.len() <= 10);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    // title hits carry three times the weight
    assert!(matches!(results[0].doc_id, 1 | 4));
}

#[test]
fn and_requires_every_token_in_some_vocabulary() {
    let dir = tempdir().unwrap();
    let engine = QueryEngine::load(&write_fields(dir.path()), EngineConfig::default()).unwrap();

    let known: Vec<String> = vec!["chat".into(), "musique".into()];
    assert!(!engine.search(&known, Operator::And).is_empty());

    let with_unknown: Vec<String> = vec!["chat".into(), "licorne".into()];
    assert!(engine.search(&with_unknown, Operator::And).is_empty());
}

#[test]
fn one_bad_field_aborts_the_engine() {
    let dir = tempdir().unwrap();
    let mut specs = write_fields(dir.path());
    let broken = dir.path().join("broken.json");
    fs::write(&broken, r#"{"chat": {"1": {"count": 1.5}}}"#).unwrap();
    specs.push(FieldSpec::new(&broken, 1.0));

    let err = QueryEngine::load(&specs, EngineConfig::default()).unwrap_err();
    assert!(matches!(err, RankError::Field { ref field, .. } if field == "broken"));
    assert!(matches!(err.root(), RankError::MalformedIndex(_)));
}

#[test]
fn empty_field_aborts_the_engine() {
    let dir = tempdir().unwrap();
    let mut specs = write_fields(dir.path());
    let empty = dir.path().join("empty.json");
    fs::write(&empty, "{}").unwrap();
    specs.push(FieldSpec::new(&empty, 2.0));

    let err = QueryEngine::load(&specs, EngineConfig::default()).unwrap_err();
    assert!(matches!(err.root(), RankError::EmptyIndex));
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let dir = tempdir().unwrap();
    let specs = vec![FieldSpec::new(dir.path().join("nope.json"), 1.0)];
    let err = QueryEngine::load(&specs, EngineConfig::default()).unwrap_err();
    assert!(matches!(err.root(), RankError::Io { .. }));
    assert!(err.to_string().contains("nope"));
}

#[test]
fn ranker_config_file_drives_the_engine() {
    let dir = tempdir().unwrap();
    let specs = write_fields(dir.path());
    let config = RankerConfig {
        fields: specs,
        engine: EngineConfig {
            top_k: 1,
            ..EngineConfig::default()
        },
    };
    let config_path = dir.path().join("fieldrank.json");
    fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();

    let loaded = RankerConfig::from_path(&config_path).unwrap();
    assert_eq!(loaded, config);

    let engine = QueryEngine::from_config(&loaded).unwrap();
    let results = engine.search(&["maison".to_string(), "noir".to_string()], Operator::Or);
    assert_eq!(results.len(), 1);
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("fieldrank.json");
    fs::write(&config_path, r#"{"fields": "content.json"}"#).unwrap();
    let err = RankerConfig::from_path(&config_path).unwrap_err();
    assert!(matches!(err, RankError::Config { .. }));
}

#[test]
fn out_of_range_params_in_config_file_are_rejected() {
    let dir = tempdir().unwrap();
    let specs = write_fields(dir.path());
    let config = serde_json::json!({
        "fields": specs,
        "engine": {"k1": 1.5, "b": 2.0}
    });
    let config_path = dir.path().join("fieldrank.json");
    fs::write(&config_path, config.to_string()).unwrap();

    let loaded = RankerConfig::from_path(&config_path).unwrap();
    let err = QueryEngine::from_config(&loaded).unwrap_err();
    assert!(matches!(err, RankError::InvalidParams { .. }));
}
