//! # meta-core
//!
//! Core types and error types shared by every metaedit crate.
//!
//! This crate provides:
//! - `DocPath`: field-name and array-index steps locating a position in a document
//! - Immutable nested read/update helpers over `serde_json::Value` documents
//! - `PendingChange`: the `(path, old_value, new_value)` triple recorded per accepted edit
//! - `ValidationError` / `ValidationResult`: validation outcomes returned as data
//! - Cross-cutting error types

pub mod change;
pub mod document;
pub mod errors;
pub mod path;
pub mod validation;

pub use change::PendingChange;
pub use errors::CoreError;
pub use path::{DocPath, PathStep};
pub use validation::{ValidationError, ValidationResult};
