//! Serializer engine.
//!
//! Walks a schema in definition order against a source instance and
//! produces a JSON-primitive-compatible structure. Required-field
//! failures abort the whole structure (fail-fast); optional-field
//! failures silently omit the key.

use serde_json::{Map, Value};
use tracing::debug;

use super::errors::{SerializeError, SerializeResult};
use super::source::{Source, ValueSource};
use crate::schema::{FieldKind, FieldSpec, Primitive, Schema};

/// Serializer over a fixed schema.
///
/// The schema is shared read-only; one serializer may serve concurrent
/// calls from multiple request-handling threads.
pub struct Serializer<'a> {
    schema: &'a Schema,
}

impl<'a> Serializer<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Serialize a single source instance.
    ///
    /// Output keys are each field's label (or name) in schema definition
    /// order.
    pub fn serialize(&self, source: &dyn Source) -> SerializeResult<Value> {
        serialize_object(self.schema, source)
    }

    /// Serialize an iterable of source instances into an array.
    ///
    /// Materialization is eager: a failure in any element aborts the
    /// whole call.
    pub fn serialize_many(&self, sources: &[&dyn Source]) -> SerializeResult<Value> {
        let mut out = Vec::with_capacity(sources.len());
        for source in sources {
            out.push(self.serialize(*source)?);
        }
        Ok(Value::Array(out))
    }

    /// Serialize a JSON mapping via the [`ValueSource`] adapter.
    pub fn serialize_value(&self, value: &Value) -> SerializeResult<Value> {
        self.serialize(&ValueSource::new(value))
    }

    /// Serialize a slice of JSON mappings into an array, eagerly.
    pub fn serialize_values(&self, values: &[Value]) -> SerializeResult<Value> {
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            out.push(self.serialize_value(value)?);
        }
        Ok(Value::Array(out))
    }
}

fn serialize_object(schema: &Schema, source: &dyn Source) -> SerializeResult<Value> {
    let mut out = Map::new();
    for spec in schema.fields() {
        match resolve_field(schema, spec, source) {
            Ok(value) => {
                out.insert(spec.output_key().to_string(), value);
            }
            Err(err) if spec.is_required() => {
                debug!(field = spec.name(), error = %err, "serialization aborted");
                return Err(err);
            }
            // Optional field failure: omit the key.
            Err(_) => {}
        }
    }
    Ok(Value::Object(out))
}

fn resolve_field(schema: &Schema, spec: &FieldSpec, source: &dyn Source) -> SerializeResult<Value> {
    match spec.kind() {
        FieldKind::Constant(value) => Ok(value.clone()),
        FieldKind::Method { .. } => {
            let hook = schema.method_hook(spec.name()).ok_or_else(|| SerializeError::Hook {
                field: spec.name().to_string(),
                message: "no hook bound".into(),
            })?;
            hook(source).map_err(|message| SerializeError::Hook {
                field: spec.name().to_string(),
                message,
            })
        }
        FieldKind::Primitive(primitive) => {
            let raw = lookup(spec, source)?;
            if raw.is_null() && !spec.is_required() {
                return Ok(Value::Null);
            }
            coerce(spec, *primitive, &raw)
        }
        FieldKind::List(element) => {
            let raw = lookup(spec, source)?;
            if raw.is_null() && !spec.is_required() {
                return Ok(Value::Null);
            }
            let items = raw
                .as_array()
                .ok_or_else(|| SerializeError::NotIterable(spec.name().to_string()))?;
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(coerce(spec, *element, item)?);
            }
            Ok(Value::Array(out))
        }
        FieldKind::Nested { child, many } => {
            let raw = lookup(spec, source)?;
            if raw.is_null() && !spec.is_required() {
                return Ok(Value::Null);
            }
            if *many {
                let items = raw
                    .as_array()
                    .ok_or_else(|| SerializeError::NotIterable(spec.name().to_string()))?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(serialize_nested(child, spec, item)?);
                }
                Ok(Value::Array(out))
            } else {
                serialize_nested(child, spec, &raw)
            }
        }
    }
}

fn serialize_nested(child: &Schema, spec: &FieldSpec, raw: &Value) -> SerializeResult<Value> {
    if !raw.is_object() {
        return Err(SerializeError::NotAnObject(spec.name().to_string()));
    }
    serialize_object(child, &ValueSource::new(raw))
}

fn lookup(spec: &FieldSpec, source: &dyn Source) -> SerializeResult<Value> {
    if spec.is_call() {
        source
            .invoke(spec.lookup_key())
            .ok_or_else(|| SerializeError::Invoke(spec.name().to_string()))
    } else {
        source
            .field(spec.lookup_key())
            .ok_or_else(|| SerializeError::Missing(spec.name().to_string()))
    }
}

/// Coerce a resolved value to the target primitive.
///
/// Conversions follow loose output semantics: numbers and booleans
/// render as strings, numeric strings parse, floats truncate to
/// integers, and boolean coercion is truthiness over the JSON value.
fn coerce(spec: &FieldSpec, primitive: Primitive, value: &Value) -> SerializeResult<Value> {
    let mismatch = || SerializeError::Coerce {
        field: spec.name().to_string(),
        expected: primitive.type_name(),
        actual: json_type_name(value),
    };
    match primitive {
        Primitive::Char => match value {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(mismatch()),
        },
        Primitive::Integer => match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::from(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Value::from(u))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::from(f.trunc() as i64))
                } else {
                    Err(mismatch())
                }
            }
            Value::String(s) => s.trim().parse::<i64>().map(Value::from).map_err(|_| mismatch()),
            Value::Bool(b) => Ok(Value::from(*b as i64)),
            _ => Err(mismatch()),
        },
        Primitive::Float => match value {
            Value::Number(n) => {
                let f = n.as_f64().ok_or_else(|| mismatch())?;
                serde_json::Number::from_f64(f).map(Value::Number).ok_or_else(|| mismatch())
            }
            Value::String(s) => {
                let f = s.trim().parse::<f64>().map_err(|_| mismatch())?;
                serde_json::Number::from_f64(f).map(Value::Number).ok_or_else(|| mismatch())
            }
            Value::Bool(b) => Ok(Value::from(*b as i64 as f64)),
            _ => Err(mismatch()),
        },
        Primitive::Boolean => Ok(Value::Bool(truthy(value))),
    }
}

/// Truthiness of a JSON value: false for `false`, `0`, `""`, `[]`,
/// `{}` and `null`; true otherwise.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
