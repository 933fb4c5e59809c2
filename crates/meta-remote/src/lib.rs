//! # meta-remote
//!
//! Fetches published schema documents over HTTP.
//!
//! [`HttpSchemaSource`] implements `meta_schema::SchemaSource` by expanding a
//! URL template such as
//! `https://raw.githubusercontent.com/dandi/schema/master/releases/{version}/dandiset.json`
//! and downloading the JSON document. Caching is the registry's job; every
//! call here goes to the network.

mod configured;
mod error;
mod http;

pub use configured::ConfiguredSource;
pub use error::RemoteError;

use std::time::Duration;

use meta_config::{SchemaConfig, VERSION_PLACEHOLDER};
use meta_schema::SchemaSource;
use serde_json::Value;

use crate::http::check_response;

/// Schema source backed by a versioned URL template.
#[derive(Debug, Clone)]
pub struct HttpSchemaSource {
    http: reqwest::Client,
    url_template: String,
    default_version: String,
}

impl HttpSchemaSource {
    /// Create a source for `url_template`, which must contain `{version}`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::InvalidTemplate`] if the template has no
    /// placeholder, or [`RemoteError::Http`] if the client fails to build.
    pub fn new(
        url_template: impl Into<String>,
        default_version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let url_template = url_template.into();
        if !url_template.contains(VERSION_PLACEHOLDER) {
            return Err(RemoteError::InvalidTemplate(url_template));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("metaedit/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            url_template,
            default_version: default_version.into(),
        })
    }

    /// Create a source from the `[schema]` configuration section.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_config(config: &SchemaConfig) -> Result<Self, RemoteError> {
        Self::new(
            config.url_template.clone(),
            config.default_version.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    #[must_use]
    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    /// URL of the schema document for `version`.
    #[must_use]
    pub fn url_for(&self, version: &str) -> String {
        self.url_template
            .replace(VERSION_PLACEHOLDER, &urlencoding::encode(version))
    }

    async fn get(&self, version: &str) -> Result<Value, RemoteError> {
        let url = self.url_for(version);
        tracing::debug!(version, %url, "fetching schema");
        let resp = check_response(self.http.get(&url).send().await?).await?;
        resp.json::<Value>()
            .await
            .map_err(|e| RemoteError::Parse(format!("{url}: {e}")))
    }
}

impl SchemaSource for HttpSchemaSource {
    type Error = RemoteError;

    async fn fetch(&self, version: Option<&str>) -> Result<Value, RemoteError> {
        let version = version.unwrap_or(&self.default_version);
        self.get(version).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source() -> HttpSchemaSource {
        HttpSchemaSource::from_config(&SchemaConfig::default()).unwrap()
    }

    #[test]
    fn url_for_substitutes_version() {
        assert_eq!(
            source().url_for("0.6.4"),
            "https://raw.githubusercontent.com/dandi/schema/master/releases/0.6.4/dandiset.json"
        );
    }

    #[test]
    fn url_for_encodes_version() {
        let source = HttpSchemaSource::new("https://schemas.example.org/{version}.json", "1.0", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            source.url_for("../draft 2"),
            "https://schemas.example.org/..%2Fdraft%202.json"
        );
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let err = HttpSchemaSource::new("https://example.org/schema.json", "1.0", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, RemoteError::InvalidTemplate(_)));
    }

    #[test]
    fn default_version_comes_from_config() {
        assert_eq!(source().default_version(), "0.6.4");
    }
}
