//! Sub-schema resolution and compilation.
//!
//! A schema version compiles into one validator for the whole document plus
//! one per named definition. Each named shape is made self-contained by
//! embedding the full definitions table, so `#/$defs/...` references inside
//! it resolve exactly as they do from the root.

use std::collections::HashMap;
use std::fmt;

use jsonschema::Validator;
use jsonschema::error::ValidationErrorKind;
use meta_core::{ValidationError, ValidationResult};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::document::SchemaDocument;
use crate::error::SchemaError;

/// A named definition that was skipped because it failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileWarning {
    pub definition: String,
    pub reason: String,
}

/// Validators for one schema version. Never mutated after compilation.
pub struct CompiledSchema {
    document: SchemaDocument,
    whole: Validator,
    named: HashMap<String, Validator>,
    warnings: Vec<CompileWarning>,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("version", &self.document.version())
            .field("named", &self.named.len())
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}

impl CompiledSchema {
    #[must_use]
    pub const fn document(&self) -> &SchemaDocument {
        &self.document
    }

    #[must_use]
    pub fn version(&self) -> &str {
        self.document.version()
    }

    /// Definitions skipped at compile time.
    #[must_use]
    pub fn warnings(&self) -> &[CompileWarning] {
        &self.warnings
    }

    /// Whether a validator exists for the named definition.
    #[must_use]
    pub fn has_named(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Names with a compiled validator, sorted.
    #[must_use]
    pub fn named_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.named.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Validate a full document.
    #[must_use]
    pub fn validate_whole(&self, instance: &Value) -> ValidationResult {
        run(&self.whole, instance)
    }

    /// Validate against a named definition, `None` if it has no validator.
    #[must_use]
    pub fn validate_named(&self, name: &str, instance: &Value) -> Option<ValidationResult> {
        self.named.get(name).map(|validator| run(validator, instance))
    }
}

/// Compile a schema document.
///
/// Per-definition failures are logged, recorded as [`CompileWarning`]s, and
/// leave that name without a validator.
///
/// # Errors
///
/// Returns [`SchemaError::Compile`] if the whole-document shape does not
/// compile; nothing can be validated without it.
pub fn compile(document: &SchemaDocument) -> Result<CompiledSchema, SchemaError> {
    let version = document.version();
    let whole = jsonschema::validator_for(document.raw()).map_err(|e| SchemaError::Compile {
        version: version.to_string(),
        reason: e.to_string(),
    })?;

    let mut named = HashMap::new();
    let mut warnings = Vec::new();

    if let Some((defs_key, table)) = document.definitions() {
        for (name, definition) in table {
            let shape = standalone_shape(document.raw(), defs_key, table, definition);
            match jsonschema::validator_for(&shape) {
                Ok(validator) => {
                    named.insert(name.clone(), validator);
                }
                Err(error) => {
                    tracing::warn!(
                        version,
                        definition = %name,
                        %error,
                        "skipping schema definition that failed to compile"
                    );
                    warnings.push(CompileWarning {
                        definition: name.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }
    }

    tracing::debug!(
        version,
        named = named.len(),
        skipped = warnings.len(),
        "compiled schema"
    );

    Ok(CompiledSchema {
        document: document.clone(),
        whole,
        named,
        warnings,
    })
}

/// Build a shape for one definition that carries the whole definitions table
/// and the root dialect.
fn standalone_shape(
    root: &Value,
    defs_key: &str,
    table: &Map<String, Value>,
    definition: &Value,
) -> Value {
    let mut shape = match definition {
        Value::Object(map) => map.clone(),
        other => {
            let mut map = Map::new();
            map.insert("allOf".to_string(), json!([other]));
            map
        }
    };
    shape.insert(defs_key.to_string(), Value::Object(table.clone()));
    if let Some(dialect) = root.get("$schema") {
        shape
            .entry("$schema".to_string())
            .or_insert_with(|| dialect.clone());
    }
    Value::Object(shape)
}

fn run(validator: &Validator, instance: &Value) -> ValidationResult {
    ValidationResult::from_errors(
        validator
            .iter_errors(instance)
            .map(|e| convert_error(&e))
            .collect(),
    )
}

/// Map a validator error onto the stable error shape.
///
/// The keyword is the last named segment of the schema path
/// (`/properties/name/minLength` -> `minLength`).
fn convert_error(error: &jsonschema::ValidationError<'_>) -> ValidationError {
    let path = error.instance_path.to_string();
    let path = if path.is_empty() { String::from("/") } else { path };
    let schema_path = error.schema_path.to_string();
    let keyword = schema_path
        .rsplit('/')
        .find(|segment| !segment.is_empty() && !segment.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or("schema");

    ValidationError {
        path,
        message: error.to_string(),
        keyword: keyword.to_string(),
        params: params_for(&error.kind),
    }
}

fn params_for(kind: &ValidationErrorKind) -> Map<String, Value> {
    let mut params = Map::new();
    match kind {
        ValidationErrorKind::Required { property } => {
            params.insert("missingProperty".to_string(), property.clone());
        }
        ValidationErrorKind::Enum { options } => {
            params.insert("allowedValues".to_string(), options.clone());
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            params.insert("additionalProperties".to_string(), json!(unexpected));
        }
        ValidationErrorKind::Format { format } => {
            params.insert("format".to_string(), json!(format));
        }
        ValidationErrorKind::Pattern { pattern } => {
            params.insert("pattern".to_string(), json!(pattern));
        }
        ValidationErrorKind::MinLength { limit } | ValidationErrorKind::MaxLength { limit } => {
            params.insert("limit".to_string(), json!(limit));
        }
        _ => {}
    }
    params
}
