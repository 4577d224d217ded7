//! Validates contract fixtures against frozen JSON schemas.

use jsonschema::JSONSchema;
use serde_json::Value;

fn load_json(path: &str) -> Value {
    let raw = std::fs::read_to_string(path).expect("json file should be readable");
    serde_json::from_str(&raw).expect("json file should be valid")
}

fn compile_validator(schema_path: &str) -> JSONSchema {
    let schema = load_json(schema_path);
    JSONSchema::compile(&schema).expect("schema should compile")
}

#[test]
fn files_response_fixture_matches_schema() {
    let validator = compile_validator(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/files-response.schema.json"
    ));
    let fixture = load_json(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/files-response.valid.json"
    ));
    assert!(
        validator.is_valid(&fixture),
        "files-response fixture should validate against schema"
    );
}

#[test]
fn error_response_fixture_matches_schema() {
    let validator = compile_validator(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/error-response.schema.json"
    ));
    let fixture = load_json(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/error-response.valid.json"
    ));
    assert!(
        validator.is_valid(&fixture),
        "error-response fixture should validate against schema"
    );
}

#[test]
fn error_response_schema_rejects_missing_error_field() {
    let validator = compile_validator(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/error-response.schema.json"
    ));
    let invalid = serde_json::json!({ "message": "wrong field" });
    assert!(
        !validator.is_valid(&invalid),
        "schema must require the error field"
    );
}
