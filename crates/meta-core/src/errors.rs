//! Cross-cutting error types for metaedit.
//!
//! Domain-specific errors (e.g., `SchemaError`, `ChangeError`) are defined in
//! their respective crates. A unified error is deferred to `meta-cli` where
//! all crate errors converge.

use thiserror::Error;

/// Errors that can be raised by any metaedit crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A dotted path string could not be turned into document steps.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// An index step points past the end of its sequence. Writing at the
    /// current length appends; anything further is refused.
    #[error("Index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Raw edited text could not be interpreted as structured data.
    ///
    /// Kept apart from schema validation failures: the document was never
    /// handed to a validator.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
