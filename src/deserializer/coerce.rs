//! Input coercion for untrusted payload values.
//!
//! Deserializer coercion is stricter than serializer coercion but stays
//! form-data friendly: numeric and boolean strings parse, everything
//! else is a type error.

use serde_json::Value;

use crate::schema::{FieldSpec, Primitive};

/// Coerce a raw input value to the target primitive.
pub(crate) fn coerce_input(primitive: Primitive, value: &Value) -> Result<Value, String> {
    match primitive {
        Primitive::Char => match value {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err("expected a string".into()),
        },
        Primitive::Integer => match value {
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Ok(value.clone())
                } else {
                    // Reject non-integral and out-of-range floats rather
                    // than truncating or saturating input.
                    match n.as_f64() {
                        Some(f)
                            if f.fract() == 0.0
                                && f >= i64::MIN as f64
                                && f < i64::MAX as f64 =>
                        {
                            Ok(Value::from(f as i64))
                        }
                        _ => Err("expected an integer".into()),
                    }
                }
            }
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| "expected an integer".into()),
            _ => Err("expected an integer".into()),
        },
        Primitive::Float => match value {
            Value::Number(n) => n
                .as_f64()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| "expected a number".into()),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| "expected a number".into()),
            _ => Err("expected a number".into()),
        },
        Primitive::Boolean => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err("expected a boolean".into()),
            },
            Value::Number(n) => match n.as_i64() {
                Some(1) => Ok(Value::Bool(true)),
                Some(0) => Ok(Value::Bool(false)),
                _ => Err("expected a boolean".into()),
            },
            _ => Err("expected a boolean".into()),
        },
    }
}

/// Check declared numeric bounds against a coerced value.
pub(crate) fn check_bounds(spec: &FieldSpec, value: &Value) -> Vec<String> {
    let mut messages = Vec::new();
    let Some(number) = value.as_f64() else {
        return messages;
    };
    if let Some(min) = spec.min_value {
        if number < min {
            messages.push(format!("must be at least {}", min));
        }
    }
    if let Some(max) = spec.max_value {
        if number > max {
            messages.push(format!("must be at most {}", max));
        }
    }
    messages
}
