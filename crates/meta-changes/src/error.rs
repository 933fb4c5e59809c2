//! Error types for meta-changes.

use std::path::PathBuf;

use meta_core::CoreError;
use meta_schema::SchemaError;
use thiserror::Error;

/// Errors from change tracking and edit sessions.
///
/// A rejected edit is not an error: it comes back as a failing
/// `ValidationResult`.
#[derive(Debug, Error)]
pub enum ChangeError {
    /// A change path could not be parsed.
    #[error(transparent)]
    Path(#[from] CoreError),

    /// The schema needed to validate the change was unavailable or malformed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Reading or writing a JSONL change log failed.
    #[error("Change log {}: {source}", path.display())]
    Jsonl {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
