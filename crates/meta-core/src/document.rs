//! Immutable read/update helpers over metadata documents.
//!
//! Documents are plain `serde_json::Value` trees. The update helpers never
//! touch their input; each returns a new tree, so one base element can be
//! reused across several validation attempts without aliasing.

use serde_json::{Map, Value};

use crate::errors::CoreError;
use crate::path::PathStep;

/// Interpret raw edited text as a structured value.
///
/// # Errors
///
/// Returns [`CoreError::Parse`] if `text` is not valid JSON.
pub fn parse_value(text: &str) -> Result<Value, CoreError> {
    serde_json::from_str(text).map_err(|e| CoreError::Parse(e.to_string()))
}

/// Look up the value at `steps`. Index steps on a mapping read the decimal key.
#[must_use]
pub fn get_in<'a>(doc: &'a Value, steps: &[PathStep]) -> Option<&'a Value> {
    let mut current = doc;
    for step in steps {
        current = match (current, step) {
            (Value::Object(map), step) => map.get(&step.as_key())?,
            (Value::Array(items), PathStep::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Return a copy of `doc` with `value` stored at `steps`.
///
/// Absent intermediate members are created: an object when the next step is a
/// key, an array when it is an index. A scalar sitting where a container is
/// needed is replaced. An index may address an existing element or the
/// position just past the end (an append), never further.
///
/// # Errors
///
/// Returns [`CoreError::IndexOutOfRange`] for an index beyond the end of its
/// sequence. Nothing is allocated for such an index.
pub fn with_value(doc: &Value, steps: &[PathStep], value: Value) -> Result<Value, CoreError> {
    let Some((step, rest)) = steps.split_first() else {
        return Ok(value);
    };

    let updated = match (doc, step) {
        (Value::Array(items), PathStep::Index(index)) => {
            let mut items = items.clone();
            let len = items.len();
            match items.get_mut(*index) {
                Some(slot) => *slot = with_value(slot, rest, value)?,
                None if *index == len => items.push(with_value(&Value::Null, rest, value)?),
                None => {
                    return Err(CoreError::IndexOutOfRange {
                        index: *index,
                        len,
                    });
                }
            }
            Value::Array(items)
        }
        (Value::Object(map), step) => {
            let mut map = map.clone();
            let key = step.as_key();
            let child = with_value(map.get(&key).unwrap_or(&Value::Null), rest, value)?;
            map.insert(key, child);
            Value::Object(map)
        }
        (_, PathStep::Index(0)) => Value::Array(vec![with_value(&Value::Null, rest, value)?]),
        (_, PathStep::Index(index)) => {
            return Err(CoreError::IndexOutOfRange { index: *index, len: 0 });
        }
        (_, PathStep::Key(key)) => {
            let mut map = Map::new();
            map.insert(key.clone(), with_value(&Value::Null, rest, value)?);
            Value::Object(map)
        }
    };
    Ok(updated)
}

/// Check that [`with_value`] would accept `steps` on `doc`, without building
/// the updated document.
///
/// # Errors
///
/// Returns [`CoreError::IndexOutOfRange`] for the first index step beyond the
/// end of its sequence.
pub fn check_indices(doc: &Value, steps: &[PathStep]) -> Result<(), CoreError> {
    let mut current = Some(doc);
    for step in steps {
        current = match (current, step) {
            (Some(Value::Object(map)), step) => map.get(&step.as_key()),
            (Some(Value::Array(items)), PathStep::Index(index)) if *index <= items.len() => items.get(*index),
            (Some(Value::Array(items)), PathStep::Index(index)) => {
                return Err(CoreError::IndexOutOfRange {
                    index: *index,
                    len: items.len(),
                });
            }
            (_, PathStep::Index(index)) if *index > 0 => {
                return Err(CoreError::IndexOutOfRange { index: *index, len: 0 });
            }
            _ => None,
        };
    }
    Ok(())
}

/// Return a copy of `doc` with the member at `steps` removed.
///
/// Removing an array element shifts the following elements down. A path that
/// does not exist leaves the copy unchanged; removing the root yields `null`.
#[must_use]
pub fn without_value(doc: &Value, steps: &[PathStep]) -> Value {
    let Some((step, rest)) = steps.split_first() else {
        return Value::Null;
    };

    match (doc, step) {
        (Value::Object(map), step) => {
            let key = step.as_key();
            let mut map = map.clone();
            if rest.is_empty() {
                map.remove(&key);
            } else if let Some(child) = map.get(&key) {
                let child = without_value(child, rest);
                map.insert(key, child);
            }
            Value::Object(map)
        }
        (Value::Array(items), PathStep::Index(index)) if *index < items.len() => {
            let mut items = items.clone();
            if rest.is_empty() {
                items.remove(*index);
            } else {
                let child = without_value(&items[*index], rest);
                items[*index] = child;
            }
            Value::Array(items)
        }
        _ => doc.clone(),
    }
}

/// Whether `value` is a mapping or a sequence.
#[must_use]
pub const fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::DocPath;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn steps(path: &str) -> Vec<PathStep> {
        DocPath::parse(path).unwrap().steps().to_vec()
    }

    #[test]
    fn get_in_walks_objects_and_arrays() {
        let doc = json!({"contributor": [{"name": "A"}]});
        assert_eq!(
            get_in(&doc, &steps("contributor.0.name")),
            Some(&json!("A"))
        );
        assert_eq!(get_in(&doc, &steps("contributor.1.name")), None);
        assert_eq!(get_in(&doc, &steps("")), Some(&doc));
    }

    #[test]
    fn index_step_reads_numeric_object_key() {
        let doc = json!({"counts": {"0": 5}});
        assert_eq!(get_in(&doc, &steps("counts.0")), Some(&json!(5)));
    }

    #[test]
    fn with_value_leaves_input_untouched() {
        let doc = json!({"contributor": [{"name": "A", "schemaKey": "Person"}]});
        let updated = with_value(&doc, &steps("contributor.0.name"), json!("B")).unwrap();
        assert_eq!(
            updated,
            json!({"contributor": [{"name": "B", "schemaKey": "Person"}]})
        );
        assert_eq!(doc["contributor"][0]["name"], "A");
    }

    #[test]
    fn with_value_creates_intermediates() {
        let updated = with_value(&json!({}), &steps("contributor.0.affiliation.0.name"), json!("X")).unwrap();
        assert_eq!(
            updated,
            json!({"contributor": [{"affiliation": [{"name": "X"}]}]})
        );
    }

    #[test]
    fn with_value_appends_at_length() {
        let doc = json!({"keywords": ["a"]});
        assert_eq!(
            with_value(&doc, &steps("keywords.1"), json!("b")).unwrap(),
            json!({"keywords": ["a", "b"]})
        );
    }

    #[test]
    fn with_value_refuses_index_past_the_end() {
        let doc = json!({"contributor": [{"name": "A"}]});
        assert!(matches!(
            with_value(&doc, &steps("contributor.2"), json!({})),
            Err(CoreError::IndexOutOfRange { index: 2, len: 1 })
        ));
        assert!(matches!(
            with_value(&doc, &steps("contributor.18446744073709551615"), json!({})),
            Err(CoreError::IndexOutOfRange { index: usize::MAX, len: 1 })
        ));
        assert!(matches!(
            with_value(&json!({}), &steps("keywords.3"), json!("x")),
            Err(CoreError::IndexOutOfRange { index: 3, len: 0 })
        ));
    }

    #[test]
    fn check_indices_agrees_with_with_value() {
        let doc = json!({"contributor": [{"name": "A", "affiliation": []}]});
        for path in [
            "contributor.0.name",
            "contributor.1",
            "contributor.0.affiliation.0.name",
            "contributor.0.affiliation.1",
            "contributor.5.name",
            "missing.0",
            "missing.1",
        ] {
            assert_eq!(
                check_indices(&doc, &steps(path)).is_ok(),
                with_value(&doc, &steps(path), json!("v")).is_ok(),
                "{path}"
            );
        }
    }

    #[test]
    fn with_value_at_root_replaces_document() {
        assert_eq!(with_value(&json!({"a": 1}), &[], json!([1])).unwrap(), json!([1]));
    }

    #[test]
    fn without_value_removes_members() {
        let doc = json!({"a": {"b": 1, "c": 2}, "list": [1, 2, 3]});
        assert_eq!(
            without_value(&doc, &steps("a.b")),
            json!({"a": {"c": 2}, "list": [1, 2, 3]})
        );
        assert_eq!(
            without_value(&doc, &steps("list.1")),
            json!({"a": {"b": 1, "c": 2}, "list": [1, 3]})
        );
        assert_eq!(without_value(&doc, &steps("missing.deep")), doc);
    }

    #[test]
    fn parse_value_reports_parse_error() {
        assert!(matches!(parse_value("{not json"), Err(CoreError::Parse(_))));
        assert_eq!(parse_value("[1, 2]").unwrap(), json!([1, 2]));
    }
}
