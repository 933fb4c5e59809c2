//! # meta-schema
//!
//! Schema-aware validation for metadata documents.
//!
//! This crate provides:
//! - `SchemaRegistry`: per-version cache of compiled schemas over a pluggable `SchemaSource`
//! - `compile`: one validator for the whole document plus one per named definition
//! - `PathTypeMap`: which named definition(s) govern elements of each top-level field
//! - `PathValidator`: validation of a single proposed change at an arbitrary path
//! - `ValidationEngine`: synchronous (cache-only) and asynchronous (fetching) entry points
//! - `OutputSchemas`: JSON Schemas of the result types, for agents and editor tooling
//!
//! ## Architecture
//!
//! Schema documents are external data: fetched by version, never known at
//! compile time. Validation failures are returned as `ValidationResult` values;
//! only schema infrastructure problems (fetch, compile) surface as `SchemaError`.

pub mod document;
pub mod engine;
pub mod error;
pub mod outputs;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod type_map;
pub mod validator;

pub use document::SchemaDocument;
pub use engine::{ChangeCheck, ValidationEngine};
pub use error::{SchemaError, SourceError};
pub use outputs::OutputSchemas;
pub use registry::{DEFAULT_VERSION_KEY, SchemaRegistry};
pub use resolver::{CompileWarning, CompiledSchema, compile};
pub use source::{DirSchemaSource, SchemaSource, StaticSchemaSource};
pub use type_map::{PathTypeMap, TypeDescriptor};
pub use validator::PathValidator;
