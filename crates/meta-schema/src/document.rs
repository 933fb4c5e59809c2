//! Raw schema documents.

use serde_json::{Map, Value};

/// Keys under which named definitions may live, newest dialect first.
const DEFINITION_KEYS: [&str; 2] = ["$defs", "definitions"];

/// A fetched schema: a root shape plus a table of named sub-shapes.
///
/// Immutable once constructed; shared read-only through the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    version: String,
    raw: Value,
}

impl SchemaDocument {
    #[must_use]
    pub fn new(version: impl Into<String>, raw: Value) -> Self {
        Self {
            version: version.into(),
            raw,
        }
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// The named-definitions table and the key it was found under.
    #[must_use]
    pub fn definitions(&self) -> Option<(&'static str, &Map<String, Value>)> {
        DEFINITION_KEYS.iter().find_map(|key| {
            self.raw
                .get(*key)
                .and_then(Value::as_object)
                .map(|table| (*key, table))
        })
    }

    /// Names of all definitions, in table order.
    #[must_use]
    pub fn definition_names(&self) -> Vec<&str> {
        self.definitions()
            .map(|(_, table)| table.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_modern_definitions_table() {
        let doc = SchemaDocument::new("1", json!({"$defs": {"Person": {}}}));
        let (key, table) = doc.definitions().unwrap();
        assert_eq!(key, "$defs");
        assert!(table.contains_key("Person"));
    }

    #[test]
    fn falls_back_to_legacy_definitions() {
        let doc = SchemaDocument::new("1", json!({"definitions": {"Person": {}, "Organization": {}}}));
        assert_eq!(doc.definitions().unwrap().0, "definitions");
        assert_eq!(doc.definition_names().len(), 2);
    }

    #[test]
    fn schema_without_definitions_has_no_names() {
        let doc = SchemaDocument::new("1", json!({"type": "object"}));
        assert!(doc.definitions().is_none());
        assert!(doc.definition_names().is_empty());
    }
}
