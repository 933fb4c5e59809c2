//! Schema source configuration.

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the schema version in `url_template`.
pub const VERSION_PLACEHOLDER: &str = "{version}";

fn default_url_template() -> String {
    "https://raw.githubusercontent.com/dandi/schema/master/releases/{version}/dandiset.json"
        .to_string()
}

fn default_version() -> String {
    "0.6.4".to_string()
}

/// Default fetch timeout in seconds.
const fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemaConfig {
    /// Where to fetch schema documents from. Must contain `{version}`.
    #[serde(default = "default_url_template")]
    pub url_template: String,

    /// Version fetched when a caller does not name one.
    #[serde(default = "default_version")]
    pub default_version: String,

    /// HTTP timeout for schema fetches, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory of `{version}.json` schema files used instead of HTTP when set.
    #[serde(default)]
    pub local_dir: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            default_version: default_version(),
            timeout_secs: default_timeout_secs(),
            local_dir: String::new(),
        }
    }
}

impl SchemaConfig {
    /// Whether schemas should be read from a local directory.
    pub fn has_local_dir(&self) -> bool {
        !self.local_dir.is_empty()
    }

    /// Whether the URL template can produce per-version URLs.
    pub fn has_valid_template(&self) -> bool {
        self.url_template.contains(VERSION_PLACEHOLDER)
    }
}
