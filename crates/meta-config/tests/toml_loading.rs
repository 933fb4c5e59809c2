//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use meta_config::{ConfigError, MetaConfig};

#[test]
fn loads_schema_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[schema]
url_template = "https://schemas.example.org/{version}/dandiset.json"
default_version = "0.7.0"
timeout_secs = 3
"#,
        )?;

        let config: MetaConfig = Figment::from(Serialized::defaults(MetaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(
            config.schema.url_template,
            "https://schemas.example.org/{version}/dandiset.json"
        );
        assert_eq!(config.schema.default_version, "0.7.0");
        assert_eq!(config.schema.timeout_secs, 3);
        assert!(!config.schema.has_local_dir());
        Ok(())
    });
}

#[test]
fn loads_type_map_overrides_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[type_map]
contributor = "Person|Organization"
sponsor = "Organization"
"#,
        )?;

        let config: MetaConfig = Figment::from(Serialized::defaults(MetaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.type_map.len(), 2);
        assert_eq!(config.type_map["sponsor"], "Organization");
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".metaedit")?;
        jail.create_file(
            ".metaedit/config.toml",
            r#"
[schema]
local_dir = "./schemas"

[general]
pretty = false
"#,
        )?;

        let config = MetaConfig::load().expect("config loads");
        assert_eq!(config.schema.local_dir, "./schemas");
        assert!(!config.general.pretty);
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[schema]
default_version = "0.6.0"
"#,
        )?;
        jail.set_env("METAEDIT_SCHEMA__DEFAULT_VERSION", "0.6.9");

        let config: MetaConfig = Figment::from(Serialized::defaults(MetaConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("METAEDIT_").split("__"))
            .extract()?;

        assert_eq!(config.schema.default_version, "0.6.9");
        Ok(())
    });
}

#[test]
fn load_rejects_zero_timeout() {
    Jail::expect_with(|jail| {
        jail.set_env("METAEDIT_SCHEMA__TIMEOUT_SECS", "0");

        let result = MetaConfig::load();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field, .. }) if field == "schema.timeout_secs"
        ));
        Ok(())
    });
}
