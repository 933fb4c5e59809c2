//! Structural diff between two documents.
//!
//! The diff is anchored one level below the root: for object documents every
//! emitted path is `field` or `field.subfield`. Arrays are compared as a whole,
//! because element identity is positional (moving one contributor shifts every
//! index after it) and per-index entries would misrepresent the edit.

use meta_core::{CoreError, DocPath, PendingChange};
use serde_json::{Map, Value};

/// Deepest path length at which objects are still split into members.
const MAX_DEPTH: usize = 2;

/// Changes that turn `old` into `new`.
///
/// Keys present in `old` come first in map iteration order, followed by keys
/// only present in `new`. An absent side is `None`; an explicit `null` is
/// `Some(Value::Null)`. Two object documents are always split into per-field
/// entries; any other pair of roots becomes one entry at the root path.
///
/// # Errors
///
/// Returns [`CoreError::InvalidPath`] if a changed top-level key cannot be
/// written as a dotted path (it contains `.`, is empty, or is a zero-padded
/// number). Below the top level such keys make their parent field be emitted
/// whole instead.
pub fn diff(old: &Value, new: &Value) -> Result<Vec<PendingChange>, CoreError> {
    let mut changes = Vec::new();
    match (old, new) {
        (Value::Object(old_map), Value::Object(new_map)) => {
            for (key, old_value, new_value) in members(old_map, new_map) {
                if old_value == new_value {
                    continue;
                }
                if !addressable(key) {
                    return Err(CoreError::InvalidPath {
                        path: key.to_string(),
                        reason: "top-level key cannot be addressed by a dotted path".to_string(),
                    });
                }
                diff_at(&DocPath::root().child(key), old_value, new_value, &mut changes);
            }
        }
        _ => diff_at(&DocPath::root(), Some(old), Some(new), &mut changes),
    }
    Ok(changes)
}

fn diff_at(path: &DocPath, old: Option<&Value>, new: Option<&Value>, out: &mut Vec<PendingChange>) {
    if old == new {
        return;
    }

    match (old, new) {
        (Some(Value::Object(old_map)), Some(Value::Object(new_map)))
            if path.len() < MAX_DEPTH && old_map.keys().chain(new_map.keys()).all(|key| addressable(key)) =>
        {
            for (key, old_value, new_value) in members(old_map, new_map) {
                diff_at(&path.child(key), old_value, new_value, out);
            }
        }
        _ => out.push(PendingChange::new(path.to_string(), old.cloned(), new.cloned())),
    }
}

/// Members of both maps: keys of `old` first, then keys only in `new`.
fn members<'a>(
    old: &'a Map<String, Value>,
    new: &'a Map<String, Value>,
) -> impl Iterator<Item = (&'a str, Option<&'a Value>, Option<&'a Value>)> {
    old.iter()
        .map(move |(key, value)| (key.as_str(), Some(value), new.get(key)))
        .chain(
            new.iter()
                .filter(move |(key, _)| !old.contains_key(*key))
                .map(|(key, value)| (key.as_str(), None, Some(value))),
        )
}

/// Whether `key` survives a round trip through a dotted path.
///
/// Keys containing `.`, empty keys, and numeric keys with a leading zero
/// cannot be addressed.
fn addressable(key: &str) -> bool {
    DocPath::parse(key).is_ok_and(|path| match path.steps() {
        [step] => step.as_key() == key,
        _ => false,
    })
}
