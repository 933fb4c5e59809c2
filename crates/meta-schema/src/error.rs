//! Schema infrastructure error types.
//!
//! These are "the schema could not be used" errors. A document that fails
//! validation is not an error; see `meta_core::ValidationResult`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the schema registry and compiler.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The fetch failed and no copy of this version is cached.
    #[error("Schema version '{version}' unavailable: {reason}")]
    Unavailable { version: String, reason: String },

    /// The whole-document shape did not compile. Not retryable without a
    /// corrected schema document.
    #[error("Schema version '{version}' failed to compile: {reason}")]
    Compile { version: String, reason: String },

    /// Requested output schema name was not found.
    #[error("Output schema not found: {0}")]
    NotFound(String),
}

/// Errors raised by the bundled schema sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No schema is known for the requested version.
    #[error("no schema for version '{0}'")]
    NotFound(String),

    /// The version string cannot be used to locate a schema.
    #[error("invalid schema version '{0}'")]
    InvalidVersion(String),

    /// Reading a schema file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A schema file is not valid JSON.
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}
