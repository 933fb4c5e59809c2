//! # meta-config
//!
//! Layered configuration loading for metaedit using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`METAEDIT_*` prefix, `__` as separator)
//! 2. Project-level `.metaedit/config.toml`
//! 3. User-level `~/.config/metaedit/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `METAEDIT_SCHEMA__DEFAULT_VERSION` -> `schema.default_version`,
//! `METAEDIT_TYPE_MAP__CONTRIBUTOR` -> `type_map.contributor`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use meta_config::MetaConfig;
//!
//! let config = MetaConfig::load_with_dotenv().expect("config");
//! println!("default schema version: {}", config.schema.default_version);
//! ```

mod error;
mod general;
mod schema;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use schema::{SchemaConfig, VERSION_PLACEHOLDER};

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetaConfig {
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Top-level field -> element type overrides (`contributor = "Person|Organization"`).
    /// Merged over the built-in path type table.
    #[serde(default)]
    pub type_map: BTreeMap<String, String>,

    #[serde(default)]
    pub general: GeneralConfig,
}

impl MetaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if a loaded value is unusable.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".metaedit/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("METAEDIT_").split("__"))
    }

    /// Reject values that would only fail later, at fetch time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn check(&self) -> Result<(), ConfigError> {
        if !self.schema.has_valid_template() && !self.schema.has_local_dir() {
            return Err(ConfigError::InvalidValue {
                field: "schema.url_template".to_string(),
                reason: format!("must contain the '{VERSION_PLACEHOLDER}' placeholder"),
            });
        }
        if self.schema.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "schema.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Some((field, _)) = self
            .type_map
            .iter()
            .find(|(_, descriptor)| descriptor.split('|').any(|name| name.trim().is_empty()))
        {
            return Err(ConfigError::InvalidValue {
                field: format!("type_map.{field}"),
                reason: "type names must be non-empty".to_string(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("metaedit").join("config.toml"))
    }

    /// Project `.env` file, if one sits next to the project config.
    fn project_dotenv_path() -> Option<PathBuf> {
        let path = PathBuf::from(".metaedit/.env");
        path.exists().then_some(path)
    }

    /// Load `.metaedit/.env`, then the nearest `.env` from the current
    /// directory upwards. Variables already set are never overridden, so the
    /// project file wins. Missing files are ignored.
    fn load_dotenv_from_workspace() {
        if let Some(path) = Self::project_dotenv_path() {
            if let Err(error) = dotenvy::from_path(&path) {
                tracing::warn!(path = %path.display(), %error, "failed to read .env file");
            }
        }
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_check() {
        let config = MetaConfig::default();
        assert!(config.check().is_ok());
        assert!(config.type_map.is_empty());
        assert!(config.general.pretty);
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = MetaConfig::figment();
        let config: MetaConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.schema.timeout_secs, 10);
    }

    #[test]
    fn project_dotenv_is_found_under_metaedit_dir() {
        figment::Jail::expect_with(|jail| {
            assert_eq!(MetaConfig::project_dotenv_path(), None);
            std::fs::create_dir(".metaedit").map_err(|e| e.to_string())?;
            jail.create_file(".metaedit/.env", "METAEDIT_GENERAL__PRETTY=false\n")?;
            assert_eq!(
                MetaConfig::project_dotenv_path(),
                Some(PathBuf::from(".metaedit/.env"))
            );
            Ok(())
        });
    }

    #[test]
    fn empty_union_member_is_rejected() {
        let mut config = MetaConfig::default();
        config
            .type_map
            .insert("contributor".into(), "Person||Organization".into());
        assert!(matches!(
            config.check(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "type_map.contributor"
        ));
    }
}
