//! Top-level field -> element type table.
//!
//! This is configuration, not logic: each array-valued top-level field of a
//! dataset description maps to the named definition(s) its elements follow,
//! as stated in the schema's own field descriptions. Fields that are absent
//! here are only checked through whole-document validation.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// Field inside an element that names the definition it follows.
pub const DISCRIMINATOR: &str = "schemaKey";

/// Built-in table for dataset description documents.
const BUILTIN: &[(&str, &str)] = &[
    ("contributor", "Person|Organization"),
    ("about", "Disorder|Anatomy|GenericType"),
    ("relatedResource", "Resource"),
    ("ethicsApproval", "EthicsApproval"),
    ("wasGeneratedBy", "Project"),
];

/// One named type, or a union written as `A|B|C`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    alternatives: Vec<String>,
}

impl TypeDescriptor {
    /// Parse `Name` or `A|B`. Blank members are dropped.
    #[must_use]
    pub fn parse(descriptor: &str) -> Self {
        Self {
            alternatives: descriptor
                .split('|')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }

    #[must_use]
    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    #[must_use]
    pub fn is_union(&self) -> bool {
        self.alternatives.len() > 1
    }

    /// Order in which union members are tried for `value`.
    ///
    /// The member named by the value's discriminator goes first; the rest keep
    /// their listed order.
    #[must_use]
    pub fn trial_order(&self, value: &Value) -> Vec<&str> {
        let hint = value.get(DISCRIMINATOR).and_then(Value::as_str);
        let mut order: Vec<&str> = self.alternatives.iter().map(String::as_str).collect();
        if let Some(pos) = hint.and_then(|hint| order.iter().position(|name| *name == hint)) {
            let preferred = order.remove(pos);
            order.insert(0, preferred);
        }
        order
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.alternatives.join("|"))
    }
}

/// Static mapping from top-level field names to element types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTypeMap {
    entries: BTreeMap<String, TypeDescriptor>,
}

impl PathTypeMap {
    /// A map with no entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        let mut map = Self::empty();
        for (field, descriptor) in BUILTIN {
            map.insert(*field, descriptor);
        }
        map
    }

    /// The built-in table with `overrides` merged on top.
    #[must_use]
    pub fn with_overrides<'a>(overrides: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut map = Self::builtin();
        for (field, descriptor) in overrides {
            map.insert(field, descriptor);
        }
        map
    }

    /// Map `field` to `descriptor`. An empty descriptor removes the mapping.
    pub fn insert(&mut self, field: impl Into<String>, descriptor: &str) {
        let field = field.into();
        let descriptor = TypeDescriptor::parse(descriptor);
        if descriptor.alternatives().is_empty() {
            self.entries.remove(&field);
        } else {
            self.entries.insert(field, descriptor);
        }
    }

    #[must_use]
    pub fn type_for(&self, root_field: &str) -> Option<&TypeDescriptor> {
        self.entries.get(root_field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PathTypeMap {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn contributor_is_person_or_organization() {
        let map = PathTypeMap::builtin();
        let ty = map.type_for("contributor").unwrap();
        assert!(ty.is_union());
        assert_eq!(ty.alternatives(), ["Person", "Organization"]);
        assert_eq!(ty.to_string(), "Person|Organization");
    }

    #[test]
    fn unmapped_field_has_no_type() {
        assert!(PathTypeMap::builtin().type_for("keywords").is_none());
    }

    #[test]
    fn parse_trims_and_drops_blank_members() {
        let ty = TypeDescriptor::parse(" Person | | Organization ");
        assert_eq!(ty.alternatives(), ["Person", "Organization"]);
        assert!(!TypeDescriptor::parse("Resource").is_union());
    }

    #[test]
    fn discriminator_moves_matching_member_first() {
        let ty = TypeDescriptor::parse("Person|Organization");
        assert_eq!(
            ty.trial_order(&json!({"schemaKey": "Organization"})),
            ["Organization", "Person"]
        );
        assert_eq!(
            ty.trial_order(&json!({"schemaKey": "Robot"})),
            ["Person", "Organization"]
        );
        assert_eq!(ty.trial_order(&json!("scalar")), ["Person", "Organization"]);
    }

    #[test]
    fn overrides_replace_add_and_remove() {
        let map = PathTypeMap::with_overrides([
            ("contributor", "Person"),
            ("sponsor", "Organization"),
            ("about", ""),
        ]);
        assert!(!map.type_for("contributor").unwrap().is_union());
        assert!(map.type_for("sponsor").is_some());
        assert!(map.type_for("about").is_none());
    }
}
