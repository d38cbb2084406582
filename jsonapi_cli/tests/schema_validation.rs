use jsonapi_core::types::PaginatedDocument;
use jsonapi_core::{
    deserialize, DeserializeOptions, Document, PaginateOptions, PaginationConfig, Paginator,
    QueryParams,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("CLI crate should be inside workspace")
        .to_path_buf()
}

fn load_fixture(name: &str) -> Value {
    let path = workspace_root()
        .join("jsonapi_core/tests/fixtures")
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

fn paginated(raw_query: &str, input: Value) -> Value {
    let query = QueryParams::parse(raw_query);
    let paginator = Paginator::new(PaginationConfig::default());
    let page = paginator.window_sequence(input, &query, &PaginateOptions::default());
    let data = match page.records() {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    };
    let doc = PaginatedDocument::new(data, page.numbers(), &query, &[] as &[&str]);
    serde_json::to_value(&doc).expect("document serializes")
}

// ---------------------------------------------------------------------------
// Positive validation: generated output conforms to its schema
// ---------------------------------------------------------------------------

#[test]
fn test_paginated_document_conforms_to_schema() {
    let schema = load_schema("paginated_document.schema.json");
    let validator = jsonschema::draft202012::new(&schema).expect("document schema compiles");

    for raw_query in [
        "",
        "page[number]=2&page[size]=1&sort=-created_at",
        "page[number]=5&page[size]=1",
        "page[number]=NaN&page[size]=NaN",
    ] {
        let doc = paginated(raw_query, load_fixture("users.json"));
        if let Err(e) = validator.validate(&doc) {
            panic!("document for {:?} failed validation: {e}", raw_query);
        }
    }
}

#[test]
fn test_non_collection_document_conforms_to_schema() {
    let schema = load_schema("paginated_document.schema.json");
    let validator = jsonschema::draft202012::new(&schema).expect("document schema compiles");

    let doc = paginated("", serde_json::json!({"id": "1"}));
    assert!(doc.get("meta").is_none());
    if let Err(e) = validator.validate(&doc) {
        panic!("non-collection document failed validation: {e}");
    }
}

#[test]
fn test_flat_map_conforms_to_schema() {
    let schema = load_schema("flat_map.schema.json");
    let validator = jsonschema::draft202012::new(&schema).expect("flat map schema compiles");

    let doc = Document::Json(load_fixture("article.json"));
    let options = DeserializeOptions::default().with_polymorphic(["author", "editor"]);
    let flat = Value::Object(deserialize(&doc, &options));
    if let Err(e) = validator.validate(&flat) {
        panic!("flat map failed validation: {e}");
    }
}

// ---------------------------------------------------------------------------
// Negative validation: schemas reject invalid data
// ---------------------------------------------------------------------------

#[test]
fn test_document_schema_rejects_missing_links() {
    let schema = load_schema("paginated_document.schema.json");
    let mut doc = paginated("page[size]=1", load_fixture("users.json"));

    doc.as_object_mut()
        .expect("document is an object")
        .remove("links");

    let validator = jsonschema::draft202012::new(&schema).expect("schema compiles");
    assert!(
        validator.validate(&doc).is_err(),
        "schema should reject document missing links"
    );
}

#[test]
fn test_document_schema_rejects_absolute_link() {
    let schema = load_schema("paginated_document.schema.json");
    let mut doc = paginated("page[size]=1", load_fixture("users.json"));

    doc["links"]["next"] = Value::String("https://example.com/users?page[number]=2".to_string());

    let validator = jsonschema::draft202012::new(&schema).expect("schema compiles");
    assert!(
        validator.validate(&doc).is_err(),
        "schema should reject a link that is not a relative query"
    );
}

#[test]
fn test_document_schema_rejects_zero_total_page() {
    let schema = load_schema("paginated_document.schema.json");
    let mut doc = paginated("", load_fixture("users.json"));

    doc["meta"]["pagination"]["total_page"] = Value::from(0);

    let validator = jsonschema::draft202012::new(&schema).expect("schema compiles");
    assert!(
        validator.validate(&doc).is_err(),
        "schema should reject total_page below 1"
    );
}
