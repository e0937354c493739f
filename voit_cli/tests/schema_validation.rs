use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use voit_lib::{merge_candidates, ResultRecord};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("CLI crate should be inside workspace")
        .to_path_buf()
}

fn load_fixture(name: &str) -> Value {
    let path = workspace_root()
        .join("vlaanderenkiest_api/tests/fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read fixture {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("fixture is valid JSON")
}

fn load_schema(name: &str) -> Value {
    let path = workspace_root().join("schema").join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read schema {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("schema is valid JSON")
}

fn fixture_records() -> Vec<ResultRecord> {
    let list = load_fixture("candidate_list.json");
    let results = load_fixture("candidate_results.json");
    let candidates = list["lv"]["11001"]["L1"].as_object().cloned().unwrap();
    let kd = results["lv"]["11001"]["L1"]["kd"].as_array().cloned().unwrap();
    merge_candidates(&candidates, &kd, "N-VA")
}

// ---------------------------------------------------------------------------
// Positive validation: crawler output conforms to the schema
// ---------------------------------------------------------------------------

#[test]
fn test_fixture_records_conform_to_schema() {
    let records = fixture_records();
    assert_eq!(records.len(), 2);

    let schema = load_schema("result.schema.json");
    let data = serde_json::to_value(&records).unwrap();

    let validator = jsonschema::draft202012::new(&schema).expect("result schema compiles");
    let result = validator.validate(&data);
    if let Err(e) = &result {
        panic!("records failed validation: {e}");
    }
}

#[test]
fn test_null_fields_conform_to_schema() {
    let records = vec![ResultRecord {
        party: "Groen".to_string(),
        ranking: Value::Null,
        name: Value::Null,
        votes: Value::Null,
    }];
    let schema = load_schema("result.schema.json");
    let data = serde_json::to_value(&records).unwrap();

    let validator = jsonschema::draft202012::new(&schema).expect("result schema compiles");
    assert!(validator.is_valid(&data));
}

// ---------------------------------------------------------------------------
// Negative validation: the schema rejects malformed output
// ---------------------------------------------------------------------------

#[test]
fn test_missing_party_rejected() {
    let schema = load_schema("result.schema.json");
    let data = json!([{"ranking": 1, "name": "Anna", "votes": 10}]);

    let validator = jsonschema::draft202012::new(&schema).expect("result schema compiles");
    assert!(!validator.is_valid(&data));
}

#[test]
fn test_extra_field_rejected() {
    let schema = load_schema("result.schema.json");
    let data = json!([{"party": "N-VA", "ranking": 1, "name": "Anna", "votes": 10, "vk": "1"}]);

    let validator = jsonschema::draft202012::new(&schema).expect("result schema compiles");
    assert!(!validator.is_valid(&data));
}
