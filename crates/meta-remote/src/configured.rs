//! Source selection from the `[schema]` configuration section.

use meta_config::SchemaConfig;
use meta_schema::{DirSchemaSource, SchemaSource};
use serde_json::Value;

use crate::HttpSchemaSource;
use crate::error::RemoteError;

/// The schema source named by configuration: a local directory when
/// `schema.local_dir` is set, the URL template otherwise.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Dir(DirSchemaSource),
    Http(HttpSchemaSource),
}

impl ConfiguredSource {
    /// # Errors
    ///
    /// Returns [`RemoteError`] if the HTTP source cannot be built.
    pub fn from_config(config: &SchemaConfig) -> Result<Self, RemoteError> {
        if config.has_local_dir() {
            tracing::debug!(dir = %config.local_dir, "using local schema directory");
            return Ok(Self::Dir(DirSchemaSource::new(
                &config.local_dir,
                config.default_version.clone(),
            )));
        }
        Ok(Self::Http(HttpSchemaSource::from_config(config)?))
    }
}

impl SchemaSource for ConfiguredSource {
    type Error = RemoteError;

    async fn fetch(&self, version: Option<&str>) -> Result<Value, RemoteError> {
        match self {
            Self::Dir(source) => Ok(source.fetch(version).await?),
            Self::Http(source) => source.fetch(version).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_config_uses_http() {
        let source = ConfiguredSource::from_config(&SchemaConfig::default()).unwrap();
        assert!(matches!(source, ConfiguredSource::Http(_)));
    }

    #[tokio::test]
    async fn local_dir_takes_precedence() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("0.6.4.json"), r#"{"type": "object"}"#).unwrap();

        let config = SchemaConfig {
            local_dir: dir.path().to_string_lossy().into_owned(),
            ..SchemaConfig::default()
        };
        let source = ConfiguredSource::from_config(&config).unwrap();

        assert!(matches!(source, ConfiguredSource::Dir(_)));
        assert_eq!(source.fetch(None).await.unwrap(), json!({"type": "object"}));
        assert!(matches!(
            source.fetch(Some("9.9.9")).await,
            Err(RemoteError::Local(meta_schema::SourceError::NotFound(_)))
        ));
    }
}
