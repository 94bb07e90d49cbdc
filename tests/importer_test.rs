use std::fs;

use eventgraph::config::ImporterConfig;
use eventgraph::errors::ImportError;
use eventgraph::importer::EventImporter;
use eventgraph::report::TracingSink;
use eventgraph::types::Identifier;
use serde_json::json;
use tempfile::TempDir;

fn payload() -> String {
    json!({
        "sessions": [
            { "id": "1", "title": "Opening", "speakers": ["5f0e8d1c-0000-4000-8000-000000000001"], "categoryItems": [10, 99] }
        ],
        "speakers": [
            { "id": "5f0e8d1c-0000-4000-8000-000000000001", "fullName": "Ann", "sessions": [1] }
        ],
        "categories": [
            { "id": 1, "title": "Track", "items": [ { "id": 10, "name": "Rust", "sort": 0 } ] }
        ]
    })
    .to_string()
}

#[test]
fn test_import_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("event.json");
    fs::write(&path, payload()).unwrap();

    let importer = EventImporter::new(ImporterConfig::default());
    let mut sink: Vec<ImportError> = Vec::new();
    let event = importer.import_from_file(&path, &mut sink).unwrap();

    assert_eq!(event.sessions.len(), 1);
    assert_eq!(event.speakers.len(), 1);
    assert_eq!(event.source.as_deref(), Some(path.display().to_string().as_str()));
    assert_eq!(event.unresolved_count, 1);
    assert_eq!(sink.len(), 1);
    assert_eq!(event.sessions[0].choice_references[0].name, "Rust");
}

#[test]
fn test_import_dispatches_local_paths_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("event.json");
    fs::write(&path, payload()).unwrap();

    let importer = EventImporter::new(ImporterConfig::default());
    let mut sink = TracingSink::new();
    let event = importer.import(&path.to_string_lossy(), &mut sink).unwrap();

    assert_eq!(sink.reported(), 1);
    assert!(event.find_session(Identifier::Numeric(1)).is_some());
}

#[test]
fn test_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let importer = EventImporter::new(ImporterConfig::default());
    let mut sink: Vec<ImportError> = Vec::new();

    let result = importer.import_from_file(&dir.path().join("absent.json"), &mut sink);
    assert!(matches!(result, Err(ImportError::File { .. })));
}

#[test]
fn test_blank_payload_is_parse_failure() {
    let importer = EventImporter::new(ImporterConfig::default());
    let mut sink: Vec<ImportError> = Vec::new();

    let result = importer.import_from_json("   \n", "blank", &mut sink);
    match result {
        Err(ImportError::Parse { source_name, .. }) => assert_eq!(source_name, "blank"),
        other => panic!("expected parse failure, got {:?}", other.map(|e| e.sessions.len())),
    }
    assert!(sink.is_empty());
}

#[test]
fn test_malformed_payload_is_parse_failure() {
    let importer = EventImporter::new(ImporterConfig::default());
    let mut sink: Vec<ImportError> = Vec::new();

    let result = importer.import_from_json(r#"{"sessions": [ {"title": "no id"} ]}"#, "bad", &mut sink);
    assert!(matches!(result, Err(ImportError::Parse { .. })));

    let result = importer.import_from_json("not json", "bad", &mut sink);
    assert!(matches!(result, Err(ImportError::Parse { .. })));
}

#[test]
fn test_configured_unresolved_limit() {
    let config = ImporterConfig {
        max_unresolved: Some(0),
        ..ImporterConfig::default()
    };
    let importer = EventImporter::new(config);
    let mut sink: Vec<ImportError> = Vec::new();

    let result = importer.import_from_json(&payload(), "limited", &mut sink);
    assert!(matches!(
        result,
        Err(ImportError::TooManyUnresolved { count: 1, limit: 0 })
    ));
    assert_eq!(sink.len(), 1, "the unresolved reference is still reported");
}

#[test]
fn test_duplicate_ids_yield_no_event() {
    let json = json!({
        "sessions": [
            { "id": "1", "title": "A" },
            { "id": 1, "title": "B" }
        ]
    })
    .to_string();
    let importer = EventImporter::new(ImporterConfig::default());
    let mut sink: Vec<ImportError> = Vec::new();

    let result = importer.import_from_json(&json, "dup", &mut sink);
    assert!(matches!(result, Err(ImportError::DuplicateIdentifier { .. })));
}
