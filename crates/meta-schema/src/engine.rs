//! Synchronous and asynchronous validation entry points.
//!
//! Schema acquisition is the only suspending operation. Call sites that must
//! not wait (a text-change handler) use the `*_now` methods, which only look at
//! the cache; call sites that need a definitive answer use the async methods,
//! which fetch the schema first. Both share one registry.

use std::sync::Arc;

use meta_core::document::check_indices;
use meta_core::{DocPath, ValidationResult};
use serde_json::Value;

use crate::error::SchemaError;
use crate::registry::{SchemaRegistry, cache_key};
use crate::source::SchemaSource;
use crate::type_map::PathTypeMap;
use crate::validator::{PathValidator, out_of_range};

/// Outcome of a cache-only change check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeCheck {
    /// The schema was cached and the change was validated.
    Checked(ValidationResult),
    /// The schema was not loaded yet. The change is accepted but has not been
    /// validated and should be checked again once the schema arrives.
    Unvalidated,
}

impl ChangeCheck {
    /// Whether the change may be recorded.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        match self {
            Self::Checked(result) => result.is_valid(),
            Self::Unvalidated => true,
        }
    }

    #[must_use]
    pub const fn is_checked(&self) -> bool {
        matches!(self, Self::Checked(_))
    }

    /// The validation result, with a passing result standing in for an
    /// unvalidated change.
    #[must_use]
    pub fn into_result(self) -> ValidationResult {
        match self {
            Self::Checked(result) => result,
            Self::Unvalidated => ValidationResult::ok(),
        }
    }
}

/// A shared registry plus the path type table used for change validation.
pub struct ValidationEngine<S> {
    registry: Arc<SchemaRegistry<S>>,
    types: PathTypeMap,
}

impl<S: SchemaSource> ValidationEngine<S> {
    #[must_use]
    pub const fn new(registry: Arc<SchemaRegistry<S>>, types: PathTypeMap) -> Self {
        Self { registry, types }
    }

    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry<S> {
        &self.registry
    }

    #[must_use]
    pub const fn types(&self) -> &PathTypeMap {
        &self.types
    }

    /// Validate a full document using only the cache.
    ///
    /// An uncached version yields a failing result with keyword `schema-loading`.
    #[must_use]
    pub fn validate_document_now(&self, version: Option<&str>, document: &Value) -> ValidationResult {
        self.registry.get_cached(version).map_or_else(
            || ValidationResult::schema_loading(cache_key(version)),
            |schema| PathValidator::new(&schema, &self.types).validate_document(document),
        )
    }

    /// Validate a named type or union using only the cache.
    ///
    /// An uncached version yields a failing result with keyword `schema-loading`.
    #[must_use]
    pub fn validate_against_sub_schema_now(
        &self,
        version: Option<&str>,
        schema_type: &str,
        value: &Value,
    ) -> ValidationResult {
        self.registry.get_cached(version).map_or_else(
            || ValidationResult::schema_loading(cache_key(version)),
            |schema| PathValidator::new(&schema, &self.types).validate_against_sub_schema(schema_type, value),
        )
    }

    /// Validate a single change using only the cache.
    ///
    /// An uncached version yields [`ChangeCheck::Unvalidated`]: the edit is
    /// accepted rather than blocked, and the caller knows to check it again.
    /// Indices past the end of a sequence are refused either way, since that
    /// check needs no schema.
    #[must_use]
    pub fn validate_change_now(
        &self,
        version: Option<&str>,
        path: &DocPath,
        new_value: &Value,
        current: &Value,
    ) -> ChangeCheck {
        let Some(schema) = self.registry.get_cached(version) else {
            if let Err(error) = check_indices(current, path.steps()) {
                return ChangeCheck::Checked(out_of_range(path, &error));
            }
            tracing::debug!(
                version = cache_key(version),
                %path,
                "schema not loaded; accepting change unvalidated"
            );
            return ChangeCheck::Unvalidated;
        };
        ChangeCheck::Checked(PathValidator::new(&schema, &self.types).validate_change(path, new_value, current))
    }

    /// Validate a full document, fetching the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the schema cannot be fetched or compiled.
    pub async fn validate_document(
        &self,
        version: Option<&str>,
        document: &Value,
    ) -> Result<ValidationResult, SchemaError> {
        let schema = self.registry.get_or_fetch(version).await?;
        Ok(PathValidator::new(&schema, &self.types).validate_document(document))
    }

    /// Validate a named type or union, fetching the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the schema cannot be fetched or compiled.
    pub async fn validate_against_sub_schema(
        &self,
        version: Option<&str>,
        schema_type: &str,
        value: &Value,
    ) -> Result<ValidationResult, SchemaError> {
        let schema = self.registry.get_or_fetch(version).await?;
        Ok(PathValidator::new(&schema, &self.types).validate_against_sub_schema(schema_type, value))
    }

    /// Validate a single change, fetching the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the schema cannot be fetched or compiled.
    pub async fn validate_change(
        &self,
        version: Option<&str>,
        path: &DocPath,
        new_value: &Value,
        current: &Value,
    ) -> Result<ValidationResult, SchemaError> {
        let schema = self.registry.get_or_fetch(version).await?;
        Ok(PathValidator::new(&schema, &self.types).validate_change(path, new_value, current))
    }
}
