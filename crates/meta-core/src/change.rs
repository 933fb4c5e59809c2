//! Pending change envelope.
//!
//! Every accepted edit is recorded as a `PendingChange`. The ordered log of
//! pending changes is the hand-off artifact to the archive relay, written as
//! JSONL, one change per line.
//!
//! Absence is distinct from `null`: a missing `old_value` means the path did
//! not exist before, a missing `new_value` means the edit removes it.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::CoreError;
use crate::path::DocPath;

/// Deserialize a present field as `Some`, including an explicit `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// One accepted edit: the value at `path` went from `old_value` to `new_value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PendingChange {
    /// Dotted path (`contributor`, `assetsSummary.numberOfFiles`, `contributor.0.name`).
    pub path: String,

    /// Value before the edit. Absent when the path did not exist.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<Value>")]
    pub old_value: Option<Value>,

    /// Value after the edit. Absent when the edit removes the path.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<Value>")]
    pub new_value: Option<Value>,
}

impl PendingChange {
    #[must_use]
    pub fn new(path: impl Into<String>, old_value: Option<Value>, new_value: Option<Value>) -> Self {
        Self {
            path: path.into(),
            old_value,
            new_value,
        }
    }

    /// Parse `path` into document steps.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPath`] if the stored path is malformed.
    pub fn doc_path(&self) -> Result<DocPath, CoreError> {
        DocPath::parse(&self.path)
    }

    #[must_use]
    pub const fn is_removal(&self) -> bool {
        self.new_value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn explicit_null_survives_roundtrip() {
        let change = PendingChange::new("license", Some(json!(["cc0"])), Some(Value::Null));
        let line = serde_json::to_string(&change).unwrap();
        let recovered: PendingChange = serde_json::from_str(&line).unwrap();
        assert_eq!(recovered, change);
        assert!(!recovered.is_removal());
    }

    #[test]
    fn absent_fields_stay_absent() {
        let removal = PendingChange::new("keywords", Some(json!(["x"])), None);
        let value = serde_json::to_value(&removal).unwrap();
        assert_eq!(value, json!({"path": "keywords", "old_value": ["x"]}));

        let recovered: PendingChange = serde_json::from_value(value).unwrap();
        assert!(recovered.is_removal());
    }

    #[test]
    fn doc_path_parses_dotted_form() {
        let change = PendingChange::new("contributor.0.name", None, Some(json!("B")));
        assert_eq!(change.doc_path().unwrap().len(), 3);
    }
}
