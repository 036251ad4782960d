//! Deserializer engine.
//!
//! Validates untrusted input mappings against a schema, fail-slow:
//! every field is checked regardless of earlier failures and all
//! failures accumulate into one error tree before the result is
//! surfaced.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use super::coerce::{check_bounds, coerce_input};
use super::errors::{ErrorNode, ErrorTree, ValidationError, NON_FIELD_ERRORS};
use crate::schema::{ConfigError, FieldKind, FieldSpec, Schema, SchemaResult};

/// Common access protocol over validation.
///
/// `construct` returns a per-call [`Validation`] instance; `clean` is
/// the one-shot variant failing with the full error tree.
pub trait Deserializer {
    /// Build a validation instance over `data`
    fn construct(&self, data: Value) -> Validation;

    /// Validate and return cleaned data, or the accumulated errors
    fn clean(&self, data: Value) -> Result<Value, ValidationError> {
        self.construct(data).into_result()
    }
}

/// Schema-backed deserializer.
pub struct SchemaDeserializer {
    schema: Arc<Schema>,
}

impl SchemaDeserializer {
    /// Create a deserializer over a built schema.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for field kinds without deserialization
    /// semantics: constant and method fields are output-only, and
    /// nested `many` fields have no error-tree shape.
    pub fn new(schema: Arc<Schema>) -> SchemaResult<Self> {
        check_deserializable(&schema)?;
        Ok(Self { schema })
    }
}

impl Deserializer for SchemaDeserializer {
    fn construct(&self, data: Value) -> Validation {
        Validation {
            data,
            plan: Plan::Schema(Arc::clone(&self.schema)),
            outcome: None,
        }
    }
}

/// Deserializer that accepts any given data.
///
/// `clean` always returns the input unchanged; used as the default when
/// no schema is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPassDeserializer;

impl Deserializer for AllPassDeserializer {
    fn construct(&self, data: Value) -> Validation {
        Validation {
            data,
            plan: Plan::AllPass,
            outcome: None,
        }
    }
}

enum Plan {
    Schema(Arc<Schema>),
    AllPass,
}

enum Outcome {
    Valid(Value),
    Invalid(ErrorTree),
}

/// Per-call validation instance.
///
/// State machine: unvalidated until the first accessor call, then
/// terminally valid or invalid; repeated calls return the memoized
/// outcome without re-running field logic.
pub struct Validation {
    data: Value,
    plan: Plan,
    outcome: Option<Outcome>,
}

impl Validation {
    fn run(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let outcome = match &self.plan {
            Plan::Schema(schema) => match validate_object(schema, &self.data) {
                Ok(cleaned) => Outcome::Valid(cleaned),
                Err(errors) => {
                    debug!(fields = errors.len(), "validation failed");
                    Outcome::Invalid(errors)
                }
            },
            Plan::AllPass => Outcome::Valid(self.data.clone()),
        };
        self.outcome = Some(outcome);
    }

    /// Returns true if validation succeeded; memoized
    pub fn is_valid(&mut self) -> bool {
        self.run();
        matches!(self.outcome, Some(Outcome::Valid(_)))
    }

    /// Cleaned data, if validation succeeded
    pub fn cleaned(&mut self) -> Option<&Value> {
        self.run();
        match &self.outcome {
            Some(Outcome::Valid(cleaned)) => Some(cleaned),
            _ => None,
        }
    }

    /// Accumulated errors, if validation failed
    pub fn errors(&mut self) -> Option<&ErrorTree> {
        self.run();
        match &self.outcome {
            Some(Outcome::Invalid(errors)) => Some(errors),
            _ => None,
        }
    }

    /// Consume the instance into cleaned data or a validation error
    pub fn into_result(mut self) -> Result<Value, ValidationError> {
        self.run();
        match self.outcome {
            Some(Outcome::Valid(cleaned)) => Ok(cleaned),
            Some(Outcome::Invalid(errors)) => Err(ValidationError { errors }),
            None => unreachable!("validation ran above"),
        }
    }
}

fn check_deserializable(schema: &Schema) -> SchemaResult<()> {
    for spec in schema.fields() {
        match spec.kind() {
            FieldKind::Constant(_) | FieldKind::Method { .. } => {
                return Err(ConfigError::UnsupportedKind {
                    field: spec.name().to_string(),
                    kind: spec.kind().kind_name(),
                });
            }
            FieldKind::Nested { many: true, .. } => {
                return Err(ConfigError::UnsupportedKind {
                    field: spec.name().to_string(),
                    kind: "nested many",
                });
            }
            FieldKind::Nested { child, many: false } => check_deserializable(child)?,
            FieldKind::Primitive(_) | FieldKind::List(_) => {}
        }
    }
    Ok(())
}

/// Validate one object level; fail-slow over all fields.
fn validate_object(schema: &Schema, data: &Value) -> Result<Value, ErrorTree> {
    let Some(object) = data.as_object() else {
        let mut errors = ErrorTree::new();
        errors.push_message(NON_FIELD_ERRORS, "expected an object");
        return Err(errors);
    };

    let mut cleaned = Map::new();
    let mut errors = ErrorTree::new();
    for spec in schema.fields() {
        match object.get(spec.output_key()) {
            None => {
                if spec.is_required() {
                    errors.push_message(spec.output_key(), "required");
                }
                // Optional and absent: key omitted from cleaned data.
            }
            Some(raw) => match validate_field(schema, spec, raw) {
                // Cleaned data keeps the same key the value was read
                // under, so cleaned output re-cleans unchanged.
                Ok(value) => {
                    cleaned.insert(spec.output_key().to_string(), value);
                }
                Err(node) if spec.is_required() => errors.insert(spec.output_key(), node),
                // Optional field failure: swallowed, key omitted.
                Err(_) => {}
            },
        }
    }

    if errors.is_empty() {
        Ok(Value::Object(cleaned))
    } else {
        Err(errors)
    }
}

/// Validate a single present field: kind coercion, bounds, custom
/// validators, then the post-clean hook. The hook runs only when
/// everything before it succeeded.
fn validate_field(schema: &Schema, spec: &FieldSpec, raw: &Value) -> Result<Value, ErrorNode> {
    let cleaned = clean_kind(spec, raw)?;

    let mut messages = check_bounds(spec, &cleaned);
    for validator in spec.validators() {
        if let Err(message) = validator(&cleaned) {
            messages.push(message);
        }
    }
    if !messages.is_empty() {
        return Err(ErrorNode::Messages(messages));
    }

    match schema.post_clean_hook(spec.name()) {
        Some(hook) => hook(cleaned).map_err(|message| ErrorNode::Messages(vec![message])),
        None => Ok(cleaned),
    }
}

fn clean_kind(spec: &FieldSpec, raw: &Value) -> Result<Value, ErrorNode> {
    match spec.kind() {
        FieldKind::Primitive(primitive) => coerce_input(*primitive, raw)
            .map_err(|message| ErrorNode::Messages(vec![message])),
        FieldKind::List(element) => {
            let Some(items) = raw.as_array() else {
                return Err(ErrorNode::Messages(vec!["expected a list".into()]));
            };
            let mut cleaned = Vec::with_capacity(items.len());
            let mut messages = Vec::new();
            for (index, item) in items.iter().enumerate() {
                match coerce_input(*element, item) {
                    Ok(value) => cleaned.push(value),
                    Err(message) => messages.push(format!("element {}: {}", index, message)),
                }
            }
            if messages.is_empty() {
                Ok(Value::Array(cleaned))
            } else {
                Err(ErrorNode::Messages(messages))
            }
        }
        FieldKind::Nested { child, .. } => match validate_object(child, raw) {
            Ok(value) => Ok(value),
            Err(errors) => match errors.messages(NON_FIELD_ERRORS) {
                // The value itself was not an object: report a leaf
                // message, matching the shape of other type errors.
                Some(messages) if errors.len() == 1 => {
                    Err(ErrorNode::Messages(messages.to_vec()))
                }
                _ => Err(ErrorNode::Nested(errors)),
            },
        },
        // Rejected by SchemaDeserializer::new; kept total to avoid panics.
        FieldKind::Constant(_) | FieldKind::Method { .. } => {
            Err(ErrorNode::Messages(vec!["unsupported field kind".into()]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, Primitive, SchemaBuilder};
    use serde_json::json;

    fn simple_deserializer() -> SchemaDeserializer {
        let schema = SchemaBuilder::new()
            .field(FieldSpec::integer("foo").min(0.0))
            .field(FieldSpec::float("bar").optional())
            .build()
            .unwrap();
        SchemaDeserializer::new(schema).unwrap()
    }

    #[test]
    fn test_valid_payload_is_cleaned() {
        let mut validation = simple_deserializer().construct(json!({"foo": "3", "bar": "3.44"}));
        assert!(validation.is_valid());
        assert_eq!(validation.cleaned(), Some(&json!({"foo": 3, "bar": 3.44})));
        assert!(validation.errors().is_none());
    }

    #[test]
    fn test_is_valid_is_memoized() {
        let mut validation = simple_deserializer().construct(json!({"foo": "3"}));
        assert!(validation.is_valid());
        assert!(validation.is_valid());
        assert_eq!(validation.cleaned(), Some(&json!({"foo": 3})));
    }

    #[test]
    fn test_required_missing_records_required() {
        let result = simple_deserializer().clean(json!({}));
        let err = result.unwrap_err();
        assert_eq!(err.errors.to_value(), json!({"foo": ["required"]}));
    }

    #[test]
    fn test_optional_invalid_value_is_swallowed() {
        let cleaned = simple_deserializer()
            .clean(json!({"foo": "3", "bar": "invalid value"}))
            .unwrap();
        assert_eq!(cleaned, json!({"foo": 3}));
    }

    #[test]
    fn test_independent_failures_all_reported() {
        let schema = SchemaBuilder::new()
            .field(FieldSpec::integer("foo"))
            .field(FieldSpec::float("bar"))
            .build()
            .unwrap();
        let deserializer = SchemaDeserializer::new(schema).unwrap();

        let err = deserializer
            .clean(json!({"foo": "x", "bar": "y"}))
            .unwrap_err();
        assert_eq!(
            err.errors.to_value(),
            json!({"foo": ["expected an integer"], "bar": ["expected a number"]})
        );
    }

    #[test]
    fn test_min_bound_recorded() {
        let err = simple_deserializer().clean(json!({"foo": -2})).unwrap_err();
        assert_eq!(err.errors.to_value(), json!({"foo": ["must be at least 0"]}));
    }

    #[test]
    fn test_custom_validator_messages_accumulate() {
        let schema = SchemaBuilder::new()
            .field(
                FieldSpec::integer("n").max(5.0).validator(|value| {
                    if value.as_i64().map(|n| n % 2 == 0).unwrap_or(false) {
                        Ok(())
                    } else {
                        Err("must be even".into())
                    }
                }),
            )
            .build()
            .unwrap();
        let deserializer = SchemaDeserializer::new(schema).unwrap();

        let err = deserializer.clean(json!({"n": 7})).unwrap_err();
        assert_eq!(
            err.errors.to_value(),
            json!({"n": ["must be at most 5", "must be even"]})
        );
    }

    #[test]
    fn test_post_clean_transforms_value() {
        let schema = SchemaBuilder::new()
            .field(FieldSpec::float("bar"))
            .post_clean("bar", |value| {
                let doubled = value.as_f64().ok_or("expected a number")? * 2.0;
                Ok(json!(doubled))
            })
            .build()
            .unwrap();
        let deserializer = SchemaDeserializer::new(schema).unwrap();

        let cleaned = deserializer.clean(json!({"bar": "3.44"})).unwrap();
        assert_eq!(cleaned, json!({"bar": 6.88}));
    }

    #[test]
    fn test_nested_errors_stay_nested() {
        let child = SchemaBuilder::new()
            .field(FieldSpec::float("foo"))
            .build()
            .unwrap();
        let schema = SchemaBuilder::new()
            .field(FieldSpec::integer("pk"))
            .field(FieldSpec::nested("bar", child))
            .build()
            .unwrap();
        let deserializer = SchemaDeserializer::new(schema).unwrap();

        let err = deserializer
            .clean(json!({"pk": "3", "bar": {"foo": "invalid value"}}))
            .unwrap_err();
        assert_eq!(
            err.errors.to_value(),
            json!({"bar": {"foo": ["expected a number"]}})
        );
    }

    #[test]
    fn test_nested_non_object_is_a_leaf_error() {
        let child = SchemaBuilder::new()
            .field(FieldSpec::float("foo"))
            .build()
            .unwrap();
        let schema = SchemaBuilder::new()
            .field(FieldSpec::nested("bar", child))
            .build()
            .unwrap();
        let deserializer = SchemaDeserializer::new(schema).unwrap();

        let err = deserializer.clean(json!({"bar": 3})).unwrap_err();
        assert_eq!(err.errors.to_value(), json!({"bar": ["expected an object"]}));
    }

    #[test]
    fn test_top_level_non_object_payload() {
        let err = simple_deserializer().clean(json!(3)).unwrap_err();
        assert_eq!(err.errors.to_value(), json!({"__all__": ["expected an object"]}));
    }

    #[test]
    fn test_labeled_field_cleans_under_its_label() {
        let schema = SchemaBuilder::new()
            .field(FieldSpec::integer("status").label("allowed_status"))
            .build()
            .unwrap();
        let deserializer = SchemaDeserializer::new(schema).unwrap();

        let cleaned = deserializer.clean(json!({"allowed_status": "3"})).unwrap();
        assert_eq!(cleaned, json!({"allowed_status": 3}));

        let err = deserializer.clean(json!({"status": 3})).unwrap_err();
        assert_eq!(err.errors.to_value(), json!({"allowed_status": ["required"]}));
    }

    #[test]
    fn test_undeclared_keys_are_ignored() {
        let cleaned = simple_deserializer()
            .clean(json!({"foo": 1, "extra": "ignored"}))
            .unwrap();
        assert_eq!(cleaned, json!({"foo": 1}));
    }

    #[test]
    fn test_list_field_coerces_elementwise() {
        let schema = SchemaBuilder::new()
            .field(FieldSpec::list("values", Primitive::Integer))
            .build()
            .unwrap();
        let deserializer = SchemaDeserializer::new(schema).unwrap();

        let cleaned = deserializer.clean(json!({"values": ["1", 2, "3"]})).unwrap();
        assert_eq!(cleaned, json!({"values": [1, 2, 3]}));

        let err = deserializer
            .clean(json!({"values": [1, "x", null]}))
            .unwrap_err();
        assert_eq!(
            err.errors.to_value(),
            json!({"values": [
                "element 1: expected an integer",
                "element 2: expected an integer"
            ]})
        );
    }

    #[test]
    fn test_constant_field_rejected_at_construction() {
        let schema = SchemaBuilder::new()
            .field(FieldSpec::constant("tax_rate", json!(20)))
            .build()
            .unwrap();
        assert!(matches!(
            SchemaDeserializer::new(schema),
            Err(ConfigError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn test_all_pass_returns_input_unchanged() {
        let data = json!({"anything": {"deeply": ["nested", 1, null]}});
        let mut validation = AllPassDeserializer.construct(data.clone());
        assert!(validation.is_valid());
        assert_eq!(AllPassDeserializer.clean(data.clone()).unwrap(), data);
        assert_eq!(AllPassDeserializer.clean(json!({})).unwrap(), json!({}));
    }
}
