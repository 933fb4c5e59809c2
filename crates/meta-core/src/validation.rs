//! Validation outcomes.
//!
//! Validation never fails with an error value: every call returns a
//! [`ValidationResult`], so synchronous UI call sites and change-proposing
//! agents can consume it directly. Agents should branch on `keyword` and
//! `params` only; `message` is prose.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keywords synthesized by the engine rather than reported by a schema rule.
pub mod keyword {
    /// A union-typed value matched none of its alternatives.
    pub const ONE_OF: &str = "oneOf";
    /// The requested named type has no compiled validator.
    pub const UNKNOWN: &str = "unknown";
    /// The schema version is not loaded yet (synchronous entry points only).
    pub const SCHEMA_LOADING: &str = "schema-loading";
    /// An index in the change path lies beyond the end of its sequence.
    pub const OUT_OF_RANGE: &str = "outOfRange";
}

/// A single structured validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationError {
    /// JSON Pointer into the validated value, `/` for the root.
    pub path: String,
    /// Human-readable description. Wording may change between releases.
    pub message: String,
    /// The schema rule that failed (`required`, `enum`, `additionalProperties`, ...).
    pub keyword: String,
    /// Rule-specific context, e.g. the missing property or the allowed values.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ValidationError {
    #[must_use]
    pub fn new(path: impl Into<String>, keyword: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            keyword: keyword.into(),
            params: Map::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Whether this error sits at `pointer` or anywhere beneath it.
    #[must_use]
    pub fn is_under(&self, pointer: &str) -> bool {
        self.path == pointer
            || self
                .path
                .strip_prefix(pointer)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Outcome of one validation call. `errors` is empty exactly when `valid` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// A passing result.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Passing when `errors` is empty, failing otherwise.
    #[must_use]
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// A failing result carrying exactly one error.
    #[must_use]
    pub fn invalid(error: ValidationError) -> Self {
        Self {
            valid: false,
            errors: vec![error],
        }
    }

    /// The requested named type has no validator.
    #[must_use]
    pub fn unknown_type(name: &str) -> Self {
        Self::invalid(
            ValidationError::new("/", keyword::UNKNOWN, format!("Unknown schema type: {name}"))
                .with_param("type", Value::String(name.to_string())),
        )
    }

    /// The schema for `version` has not been loaded yet.
    #[must_use]
    pub fn schema_loading(version: &str) -> Self {
        Self::invalid(
            ValidationError::new(
                "/",
                keyword::SCHEMA_LOADING,
                format!("Schema version '{version}' is still loading"),
            )
            .with_param("version", Value::String(version.to_string())),
        )
    }

    /// The change at `pointer` addresses an index past the end of a sequence.
    #[must_use]
    pub fn index_out_of_range(pointer: &str, index: usize, len: usize) -> Self {
        Self::invalid(
            ValidationError::new(
                pointer,
                keyword::OUT_OF_RANGE,
                format!("Index {index} is past the end of a sequence of length {len}"),
            )
            .with_param("index", Value::from(index))
            .with_param("length", Value::from(len)),
        )
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Keep only the errors accepted by `keep`, re-deriving validity.
    #[must_use]
    pub fn retain(self, keep: impl FnMut(&ValidationError) -> bool) -> Self {
        Self::from_errors(self.errors.into_iter().filter(keep).collect())
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn from_errors_derives_validity() {
        assert!(ValidationResult::from_errors(Vec::new()).is_valid());
        let failing =
            ValidationResult::from_errors(vec![ValidationError::new("/name", "type", "bad")]);
        assert!(!failing.is_valid());
        assert_eq!(failing.errors().len(), 1);
    }

    #[test]
    fn is_under_respects_segment_boundaries() {
        let err = ValidationError::new("/contributor/0/name", "type", "bad");
        assert!(err.is_under("/contributor"));
        assert!(err.is_under("/contributor/0/name"));
        assert!(!err.is_under("/contrib"));
        assert!(!ValidationError::new("/contributors", "type", "bad").is_under("/contributor"));
    }

    #[test]
    fn retain_turns_result_valid_when_nothing_left() {
        let result = ValidationResult::from_errors(vec![
            ValidationError::new("/name", "type", "bad"),
            ValidationError::new("/license", "enum", "bad"),
        ]);
        let filtered = result.retain(|e| e.is_under("/keywords"));
        assert_eq!(filtered, ValidationResult::ok());
    }

    #[test]
    fn synthesized_results_serialize_stable_fields() {
        let value = serde_json::to_value(ValidationResult::schema_loading("0.6.4")).unwrap();
        assert_eq!(
            value,
            json!({
                "valid": false,
                "errors": [{
                    "path": "/",
                    "message": "Schema version '0.6.4' is still loading",
                    "keyword": "schema-loading",
                    "params": {"version": "0.6.4"}
                }]
            })
        );
    }

    #[test]
    fn unknown_type_uses_unknown_keyword() {
        let result = ValidationResult::unknown_type("NoSuchType");
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].keyword, keyword::UNKNOWN);
    }
}
