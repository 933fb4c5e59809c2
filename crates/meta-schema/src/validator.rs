//! Path-aware validation of a single proposed change.
//!
//! Given `(path, new_value, current_document)`, the validator picks the
//! narrowest strategy it can reason about:
//!
//! 1. `field.N` with a structured value: validate the value against the
//!    element type of `field`.
//! 2. `field.N.rest...`: rebuild element `N` with the change applied and
//!    validate the whole element, so `required` and cross-field rules see the
//!    complete element rather than the touched leaf.
//! 3. `field`: validate the full document with `field` replaced, keeping only
//!    errors at or below `/field`. Errors elsewhere existed before the change.
//! 4. The root (empty path): validate the replacement as a full document.
//! 5. Anything else is accepted unchecked. An edit the engine cannot reason
//!    about is never blocked.
//!
//! Before any of these, every index step must land on an existing element or
//! just past the end of its sequence. A change that could not be replayed is
//! refused whatever the strategy.

use meta_core::document::{check_indices, get_in, is_structured, with_value};
use meta_core::validation::keyword;
use meta_core::{CoreError, DocPath, PathStep, ValidationError, ValidationResult};
use serde_json::{Map, Value, json};

use crate::resolver::CompiledSchema;
use crate::type_map::{PathTypeMap, TypeDescriptor};

/// Strategy chosen for a change. Exposed for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ArrayElement,
    NestedInElement,
    TopLevel,
    Document,
    Unchecked,
}

/// Validates documents, sub-schema values, and single-path changes against
/// one compiled schema version.
#[derive(Debug, Clone, Copy)]
pub struct PathValidator<'a> {
    schema: &'a CompiledSchema,
    types: &'a PathTypeMap,
}

impl<'a> PathValidator<'a> {
    #[must_use]
    pub const fn new(schema: &'a CompiledSchema, types: &'a PathTypeMap) -> Self {
        Self { schema, types }
    }

    /// Validate a full document against the root shape.
    #[must_use]
    pub fn validate_document(&self, document: &Value) -> ValidationResult {
        self.schema.validate_whole(document)
    }

    /// Validate `value` against a named type or a `A|B` union.
    #[must_use]
    pub fn validate_against_sub_schema(&self, schema_type: &str, value: &Value) -> ValidationResult {
        self.validate_against_type(&TypeDescriptor::parse(schema_type), value)
    }

    /// Validate `value` against a parsed type descriptor.
    #[must_use]
    pub fn validate_against_type(&self, ty: &TypeDescriptor, value: &Value) -> ValidationResult {
        match ty.alternatives() {
            [] => ValidationResult::unknown_type(""),
            [single] => self
                .schema
                .validate_named(single, value)
                .unwrap_or_else(|| ValidationResult::unknown_type(single)),
            _ => self.validate_union(ty, value),
        }
    }

    /// Try each member in turn; the first success is returned as is.
    ///
    /// When every member fails, the per-member errors are dropped in favour of
    /// one `oneOf` error naming the alternatives.
    fn validate_union(&self, ty: &TypeDescriptor, value: &Value) -> ValidationResult {
        for name in ty.trial_order(value) {
            match self.schema.validate_named(name, value) {
                Some(result) if result.is_valid() => return result,
                Some(result) => {
                    tracing::debug!(
                        alternative = name,
                        errors = result.errors().len(),
                        "union alternative rejected value"
                    );
                }
                None => tracing::debug!(alternative = name, "union alternative has no validator"),
            }
        }

        let alternatives = ty.alternatives();
        ValidationResult::invalid(
            ValidationError::new(
                "/",
                keyword::ONE_OF,
                format!("Value must match one of: {}", alternatives.join(", ")),
            )
            .with_param("alternatives", json!(alternatives)),
        )
    }

    /// Strategy that [`Self::validate_change`] will use.
    #[must_use]
    pub fn strategy_for(&self, path: &DocPath, new_value: &Value) -> Strategy {
        if path.is_empty() {
            return Strategy::Document;
        }
        if path.len() == 1 {
            return Strategy::TopLevel;
        }
        let Some(root) = path.root_field() else {
            return Strategy::Unchecked;
        };
        let mapped = self.types.type_for(root).is_some();
        let element_step = matches!(path.steps().get(1), Some(PathStep::Index(_)));

        match path.len() {
            2 if element_step && mapped && is_structured(new_value) => Strategy::ArrayElement,
            n if n > 2 && element_step && mapped => Strategy::NestedInElement,
            _ => Strategy::Unchecked,
        }
    }

    /// Validate setting `path` to `new_value` in `current`.
    ///
    /// `current` is never modified; candidates are built as new values.
    #[must_use]
    pub fn validate_change(&self, path: &DocPath, new_value: &Value, current: &Value) -> ValidationResult {
        if let Err(error) = check_indices(current, path.steps()) {
            tracing::debug!(%path, %error, "change addresses a missing element");
            return out_of_range(path, &error);
        }

        let strategy = self.strategy_for(path, new_value);
        tracing::debug!(%path, ?strategy, "validating change");

        let root = path.root_field().unwrap_or_default();
        match strategy {
            Strategy::ArrayElement => self.element_type(root).map_or_else(ValidationResult::ok, |ty| {
                self.validate_against_type(ty, new_value)
            }),
            Strategy::NestedInElement => self.element_type(root).map_or_else(ValidationResult::ok, |ty| {
                let steps = path.steps();
                let element = match get_in(current, &steps[..2]) {
                    Some(element) if !element.is_null() => element.clone(),
                    _ => Value::Object(Map::new()),
                };
                match with_value(&element, &steps[2..], new_value.clone()) {
                    Ok(candidate) => self.validate_against_type(ty, &candidate),
                    Err(error) => out_of_range(path, &error),
                }
            }),
            Strategy::TopLevel => {
                let field = path.steps().first().map(PathStep::as_key).unwrap_or_default();
                self.validate_top_level(&field, new_value, current)
            }
            Strategy::Document => self.validate_document(new_value),
            Strategy::Unchecked => ValidationResult::ok(),
        }
    }

    fn element_type(&self, root: &str) -> Option<&'a TypeDescriptor> {
        self.types.type_for(root)
    }

    fn validate_top_level(&self, field: &str, new_value: &Value, current: &Value) -> ValidationResult {
        let mut candidate = match current {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        candidate.insert(field.to_string(), new_value.clone());

        let pointer = DocPath::root().child(field).to_pointer();
        self.validate_document(&Value::Object(candidate))
            .retain(|error| error.is_under(&pointer))
    }
}

pub(crate) fn out_of_range(path: &DocPath, error: &CoreError) -> ValidationResult {
    match error {
        CoreError::IndexOutOfRange { index, len } => {
            ValidationResult::index_out_of_range(&path.to_pointer(), *index, *len)
        }
        other => ValidationResult::invalid(ValidationError::new(
            path.to_pointer(),
            keyword::OUT_OF_RANGE,
            other.to_string(),
        )),
    }
}
