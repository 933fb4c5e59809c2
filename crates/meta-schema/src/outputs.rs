//! JSON Schemas of the values metaedit hands to callers.
//!
//! Change-proposing agents and editor tooling consume `ValidationResult` and
//! `PendingChange` as JSON; this catalog lets them fetch the exact shapes.
//! Built from meta-core types with [`schemars::schema_for!`].

use std::collections::HashMap;

use schemars::schema_for;

use crate::error::SchemaError;

/// Catalog of output schemas, keyed by name.
pub struct OutputSchemas {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`. Panics if `serde_json::to_value` fails (should be
/// infallible for valid `schemars` output).
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl OutputSchemas {
    /// Build the catalog.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on a `schemars`-generated
    /// schema, which `schemars` output never does in practice.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        register!(schemas, "validation_result", meta_core::ValidationResult);
        register!(schemas, "validation_error", meta_core::ValidationError);
        register!(schemas, "pending_change", meta_core::PendingChange);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Get a schema by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotFound`] if the name is unknown.
    pub fn require(&self, name: &str) -> Result<&serde_json::Value, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))
    }

    /// List all registered schema names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for OutputSchemas {
    fn default() -> Self {
        Self::new()
    }
}
