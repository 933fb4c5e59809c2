//! End-to-end change validation against the mini dandiset fixture.

use std::sync::Arc;

use meta_core::validation::keyword;
use meta_core::{DocPath, ValidationResult};
use meta_schema::{PathTypeMap, SchemaRegistry, StaticSchemaSource, ValidationEngine};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const VERSION: &str = "0.6.4";

fn engine() -> ValidationEngine<StaticSchemaSource> {
    let raw: Value = serde_json::from_str(include_str!("../fixtures/mini-dandiset.schema.json"))
        .expect("fixture parses");
    let source = StaticSchemaSource::new()
        .with_schema(VERSION, raw)
        .with_default(VERSION);
    ValidationEngine::new(Arc::new(SchemaRegistry::new(source)), PathTypeMap::builtin())
}

fn valid_document() -> Value {
    json!({
        "name": "Mouse V1 recordings",
        "description": "Two-photon imaging",
        "contributor": [{"name": "A", "schemaKey": "Person"}],
        "license": ["spdx:CC-BY-4.0"],
        "keywords": ["x"]
    })
}

fn path(text: &str) -> DocPath {
    DocPath::parse(text).expect("valid path")
}

#[tokio::test]
async fn renaming_a_person_contributor_is_accepted() {
    let engine = engine();
    let doc = valid_document();

    let result = engine
        .validate_change(Some(VERSION), &path("contributor.0.name"), &json!("B"), &doc)
        .await
        .unwrap();

    assert_eq!(result, ValidationResult::ok());
}

#[tokio::test]
async fn emptying_a_person_name_is_reported_on_the_element() {
    let engine = engine();
    let doc = valid_document();

    let result = engine
        .validate_change(Some(VERSION), &path("contributor.0.name"), &json!(""), &doc)
        .await
        .unwrap();

    assert!(!result.is_valid());
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword, keyword::ONE_OF);
}

#[tokio::test]
async fn organization_contributor_passes_union_without_person_errors() {
    let engine = engine();
    let doc = valid_document();
    let org = json!({"name": "Allen Institute", "schemaKey": "Organization", "url": "https://alleninstitute.org"});

    let result = engine
        .validate_change(Some(VERSION), &path("contributor.1"), &org, &doc)
        .await
        .unwrap();

    assert!(result.is_valid());
    assert!(result.errors().is_empty());
}

#[tokio::test]
async fn unrelated_existing_errors_do_not_leak_into_top_level_change() {
    let engine = engine();
    let mut doc = valid_document();
    doc["license"] = json!(["not-a-license"]);

    let broken = engine.validate_document(Some(VERSION), &doc).await.unwrap();
    assert!(!broken.is_valid());

    let result = engine
        .validate_change(Some(VERSION), &path("keywords"), &json!(["x", "y"]), &doc)
        .await
        .unwrap();
    assert!(result.is_valid());
}

#[tokio::test]
async fn top_level_change_reports_only_its_own_errors() {
    let engine = engine();
    let mut doc = valid_document();
    doc["license"] = json!(["not-a-license"]);

    let result = engine
        .validate_change(Some(VERSION), &path("name"), &json!(42), &doc)
        .await
        .unwrap();

    assert!(!result.is_valid());
    assert!(result.errors().iter().all(|error| error.is_under("/name")));
}

#[test]
fn nothing_cached_means_schema_loading_for_documents() {
    let engine = engine();

    let result = engine.validate_document_now(Some(VERSION), &valid_document());

    assert!(!result.is_valid());
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword, keyword::SCHEMA_LOADING);
    assert_eq!(result.errors()[0].params["version"], json!(VERSION));
}

#[tokio::test]
async fn unknown_sub_schema_is_rejected() {
    let engine = engine();

    let result = engine
        .validate_against_sub_schema(Some(VERSION), "NoSuchType", &json!({}))
        .await
        .unwrap();

    assert!(!result.is_valid());
    assert_eq!(result.errors()[0].keyword, keyword::UNKNOWN);
}

#[tokio::test]
async fn revalidation_is_idempotent() {
    let engine = engine();
    let doc = valid_document();
    let target = path("contributor.0");
    let value = json!({"name": "Lab"});

    let first = engine.validate_change(Some(VERSION), &target, &value, &doc).await.unwrap();
    let second = engine.validate_change(Some(VERSION), &target, &value, &doc).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(doc, valid_document());
}
