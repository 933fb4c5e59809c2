//! Schema sources: where raw schema documents come from.
//!
//! The registry never performs I/O itself; it asks a `SchemaSource` for the
//! raw document of a version and caches the compiled result. HTTP fetching
//! lives in `meta-remote`.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::SourceError;

/// Fetches raw schema documents by version.
///
/// `None` asks for the source's default version.
pub trait SchemaSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch(&self, version: Option<&str>)
    -> impl Future<Output = Result<Value, Self::Error>> + Send;
}

/// In-memory schemas keyed by version.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaSource {
    schemas: HashMap<String, Value>,
    default_version: Option<String>,
}

impl StaticSchemaSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_schema(mut self, version: impl Into<String>, raw: Value) -> Self {
        self.schemas.insert(version.into(), raw);
        self
    }

    /// Version served when a caller does not name one.
    #[must_use]
    pub fn with_default(mut self, version: impl Into<String>) -> Self {
        self.default_version = Some(version.into());
        self
    }
}

impl SchemaSource for StaticSchemaSource {
    type Error = SourceError;

    async fn fetch(&self, version: Option<&str>) -> Result<Value, SourceError> {
        let version = version
            .or(self.default_version.as_deref())
            .ok_or_else(|| SourceError::NotFound(crate::DEFAULT_VERSION_KEY.to_string()))?;
        self.schemas
            .get(version)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(version.to_string()))
    }
}

/// Schemas stored as `{dir}/{version}.json`.
#[derive(Debug, Clone)]
pub struct DirSchemaSource {
    dir: PathBuf,
    default_version: String,
}

impl DirSchemaSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, default_version: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            default_version: default_version.into(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, version: &str) -> Result<PathBuf, SourceError> {
        if version.is_empty()
            || version.contains(['/', '\\'])
            || version.split('.').any(|part| part.is_empty())
        {
            return Err(SourceError::InvalidVersion(version.to_string()));
        }
        Ok(self.dir.join(format!("{version}.json")))
    }
}

impl SchemaSource for DirSchemaSource {
    type Error = SourceError;

    async fn fetch(&self, version: Option<&str>) -> Result<Value, SourceError> {
        let version = version.unwrap_or(&self.default_version);
        let path = self.path_for(version)?;
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(version.to_string()));
            }
            Err(source) => return Err(SourceError::Io { path, source }),
        };
        tracing::debug!(version, path = %path.display(), "read schema file");
        Ok(serde_json::from_str(&text)?)
    }
}
