//! Per-version schema registry.
//!
//! The `SchemaRegistry` owns compiled schemas for the lifetime of an editing
//! session. Versions are fetched through a [`SchemaSource`] on first use,
//! compiled once, and kept until the registry is dropped; the version set is
//! small and externally bounded, so there is no eviction.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::document::SchemaDocument;
use crate::error::SchemaError;
use crate::resolver::{CompiledSchema, compile};
use crate::source::SchemaSource;

/// Cache slot used when a caller does not name a version.
pub const DEFAULT_VERSION_KEY: &str = "default";

/// Cache key for an optional version.
#[must_use]
pub fn cache_key(version: Option<&str>) -> &str {
    version.unwrap_or(DEFAULT_VERSION_KEY)
}

/// Compiled schemas keyed by version, backed by a fetch-by-version source.
///
/// Construct one per session and pass it explicitly to whoever validates.
/// Once a version is cached its `Arc` is never replaced.
pub struct SchemaRegistry<S> {
    source: S,
    cache: RwLock<HashMap<String, Arc<CompiledSchema>>>,
}

impl<S: SchemaSource> SchemaRegistry<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The cached schema for `version`. Never performs I/O.
    #[must_use]
    pub fn get_cached(&self, version: Option<&str>) -> Option<Arc<CompiledSchema>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(cache_key(version))
            .cloned()
    }

    /// The schema for `version`, fetching and compiling it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Unavailable`] if the version is not cached and the
    /// source fails, or [`SchemaError::Compile`] if the fetched document's root
    /// shape does not compile.
    pub async fn get_or_fetch(&self, version: Option<&str>) -> Result<Arc<CompiledSchema>, SchemaError> {
        let key = cache_key(version);
        if let Some(hit) = self.get_cached(version) {
            tracing::debug!(version = key, "schema cache hit");
            return Ok(hit);
        }

        let raw = self.source.fetch(version).await.map_err(|error| {
            tracing::warn!(version = key, %error, "schema fetch failed");
            SchemaError::Unavailable {
                version: key.to_string(),
                reason: error.to_string(),
            }
        })?;

        let compiled = compile(&SchemaDocument::new(key, raw))?;
        Ok(self.store(key, compiled))
    }

    /// Compile and cache a schema obtained out of band (local file, tests).
    ///
    /// If the version is already cached, the cached schema is kept and returned.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if the root shape does not compile.
    pub fn insert(&self, document: &SchemaDocument) -> Result<Arc<CompiledSchema>, SchemaError> {
        if let Some(existing) = self.get_cached(Some(document.version())) {
            return Ok(existing);
        }
        let compiled = compile(document)?;
        Ok(self.store(document.version(), compiled))
    }

    /// Cached version keys. Semantic versions come first in version order,
    /// other keys after them, sorted lexically.
    #[must_use]
    pub fn versions(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort_by(|a, b| {
            match (semver::Version::parse(a), semver::Version::parse(b)) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            }
        });
        keys
    }

    fn store(&self, key: &str, compiled: CompiledSchema) -> Arc<CompiledSchema> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            cache
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(compiled)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSchemaSource;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn fixture() -> Value {
        serde_json::from_str(include_str!("../fixtures/mini-dandiset.schema.json"))
            .expect("fixture parses")
    }

    fn registry() -> SchemaRegistry<StaticSchemaSource> {
        SchemaRegistry::new(
            StaticSchemaSource::new()
                .with_schema("0.6.4", fixture())
                .with_default("0.6.4"),
        )
    }

    #[tokio::test]
    async fn fetch_populates_cache() {
        let reg = registry();
        assert!(reg.get_cached(Some("0.6.4")).is_none());

        let schema = reg.get_or_fetch(Some("0.6.4")).await.unwrap();
        assert_eq!(schema.version(), "0.6.4");
        assert!(reg.get_cached(Some("0.6.4")).is_some());
    }

    #[tokio::test]
    async fn cached_schema_is_referentially_stable() {
        let reg = registry();
        let first = reg.get_or_fetch(Some("0.6.4")).await.unwrap();
        let second = reg.get_or_fetch(Some("0.6.4")).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let reinserted = reg
            .insert(&SchemaDocument::new("0.6.4", json!({"type": "object"})))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &reinserted));
    }

    #[tokio::test]
    async fn absent_version_uses_default_slot() {
        let reg = registry();
        let schema = reg.get_or_fetch(None).await.unwrap();
        assert_eq!(schema.version(), DEFAULT_VERSION_KEY);
        assert!(reg.get_cached(None).is_some());
        assert!(reg.get_cached(Some("0.6.4")).is_none());
    }

    #[tokio::test]
    async fn fetch_failure_without_cache_is_unavailable() {
        let reg = registry();
        let err = reg.get_or_fetch(Some("9.9.9")).await.unwrap_err();
        assert!(matches!(err, SchemaError::Unavailable { version, .. } if version == "9.9.9"));
        assert!(reg.get_cached(Some("9.9.9")).is_none());
    }

    #[tokio::test]
    async fn malformed_schema_is_compile_error() {
        let reg = SchemaRegistry::new(StaticSchemaSource::new().with_schema("bad", json!({"type": 3})));
        assert!(matches!(
            reg.get_or_fetch(Some("bad")).await,
            Err(SchemaError::Compile { .. })
        ));
    }

    #[test]
    fn insert_makes_version_available_synchronously() {
        let reg = SchemaRegistry::new(StaticSchemaSource::new());
        reg.insert(&SchemaDocument::new("local", fixture())).unwrap();
        assert!(reg.get_cached(Some("local")).is_some());
    }

    #[test]
    fn versions_sort_semver_first() {
        let reg = SchemaRegistry::new(StaticSchemaSource::new());
        for version in ["0.10.0", "default", "0.6.4", "0.9.1"] {
            reg.insert(&SchemaDocument::new(version, json!({}))).unwrap();
        }
        assert_eq!(reg.versions(), ["0.6.4", "0.9.1", "0.10.0", "default"]);
    }
}
