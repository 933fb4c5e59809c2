use std::sync::Arc;

use anyhow::Context;
use meta_config::MetaConfig;
use meta_remote::ConfiguredSource;
use meta_schema::{DEFAULT_VERSION_KEY, PathTypeMap, SchemaDocument, SchemaRegistry, ValidationEngine};

use crate::cli::GlobalFlags;
use crate::documents;

/// Everything a schema-aware command needs, built once per invocation.
pub struct AppContext {
    pub engine: Arc<ValidationEngine<ConfiguredSource>>,
    pub version: Option<String>,
}

impl AppContext {
    pub fn init(config: &MetaConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let source =
            ConfiguredSource::from_config(&config.schema).context("failed to set up schema source")?;
        let registry = SchemaRegistry::new(source);

        if let Some(path) = &flags.schema_file {
            let key = flags.schema_version.as_deref().unwrap_or(DEFAULT_VERSION_KEY);
            let raw = documents::read(path)?;
            registry
                .insert(&SchemaDocument::new(key, raw))
                .with_context(|| format!("schema file {} is unusable", path.display()))?;
        }

        let types = PathTypeMap::with_overrides(
            config
                .type_map
                .iter()
                .map(|(field, descriptor)| (field.as_str(), descriptor.as_str())),
        );

        Ok(Self {
            engine: Arc::new(ValidationEngine::new(Arc::new(registry), types)),
            version: flags.schema_version.clone(),
        })
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}
