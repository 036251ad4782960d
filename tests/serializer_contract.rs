//! Serializer Contract Tests
//!
//! End-to-end properties of the serializer engine:
//! - Output keys follow schema definition order
//! - Required failures are fail-fast with no partial output
//! - Optional failures silently omit the key
//! - Eager `many` serialization aborts the whole call

use restform::schema::{FieldSpec, Primitive, SchemaBuilder};
use restform::serializer::{SerializeError, Serializer, Source};
use serde_json::{json, Value};

// =============================================================================
// Helper Sources
// =============================================================================

/// Attribute-bearing host object with an invokable accessor.
struct Product {
    name: String,
    price: f64,
}

impl Source for Product {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(json!(self.name)),
            _ => None,
        }
    }

    fn invoke(&self, name: &str) -> Option<Value> {
        match name {
            "price" => Some(json!(self.price)),
            _ => None,
        }
    }
}

// =============================================================================
// End-to-End Shape
// =============================================================================

/// Float + method + constant fields produce the documented structure.
#[test]
fn test_price_schema_end_to_end() {
    let schema = SchemaBuilder::new()
        .field(FieldSpec::float("initial_price"))
        .field(FieldSpec::method("final_price"))
        .field(FieldSpec::constant("tax_rate", json!(20)))
        .hook("get_final_price", |source| {
            let price = source
                .field("initial_price")
                .and_then(|v| v.as_f64())
                .ok_or("missing initial_price")?;
            Ok(json!(price * 1.2))
        })
        .build()
        .unwrap();

    let out = Serializer::new(&schema)
        .serialize_value(&json!({"initial_price": 200}))
        .unwrap();
    assert_eq!(
        out,
        json!({"initial_price": 200.0, "final_price": 240.0, "tax_rate": 20})
    );
}

/// Output keys appear in schema definition order, labels included.
#[test]
fn test_output_keys_follow_definition_order() {
    let schema = SchemaBuilder::new()
        .field(FieldSpec::char("zulu"))
        .field(FieldSpec::integer("alpha").label("renamed_alpha"))
        .field(FieldSpec::boolean("mike"))
        .build()
        .unwrap();

    let out = Serializer::new(&schema)
        .serialize_value(&json!({"mike": true, "alpha": 1, "zulu": "z"}))
        .unwrap();
    let keys: Vec<&str> = out.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["zulu", "renamed_alpha", "mike"]);
}

// =============================================================================
// Failure Policy
// =============================================================================

/// A required coercion failure yields an error and no partial structure.
#[test]
fn test_required_failure_yields_no_partial_output() {
    let schema = SchemaBuilder::new()
        .field(FieldSpec::char("name"))
        .field(FieldSpec::integer("age"))
        .build()
        .unwrap();

    let result = Serializer::new(&schema)
        .serialize_value(&json!({"name": "Alice", "age": {"nested": true}}));
    match result {
        Err(SerializeError::Coerce { field, .. }) => assert_eq!(field, "age"),
        other => panic!("expected coercion failure, got {:?}", other),
    }
}

/// An optional failing field is absent; remaining fields still serialize.
#[test]
fn test_optional_failure_is_absent_from_output() {
    let schema = SchemaBuilder::new()
        .field(FieldSpec::integer("age").optional())
        .field(FieldSpec::char("name"))
        .build()
        .unwrap();

    let out = Serializer::new(&schema)
        .serialize_value(&json!({"name": "Alice", "age": []}))
        .unwrap();
    assert_eq!(out, json!({"name": "Alice"}));
}

/// Eager `many` serialization aborts the whole call on one bad element.
#[test]
fn test_many_is_eager_and_aborts_whole_call() {
    let schema = SchemaBuilder::new()
        .field(FieldSpec::integer("n"))
        .build()
        .unwrap();
    let serializer = Serializer::new(&schema);

    let ok = serializer
        .serialize_values(&[json!({"n": 1}), json!({"n": 2})])
        .unwrap();
    assert_eq!(ok, json!([{"n": 1}, {"n": 2}]));

    let result = serializer.serialize_values(&[json!({"n": 1}), json!({}), json!({"n": 3})]);
    assert!(matches!(result, Err(SerializeError::Missing(ref f)) if f == "n"));
}

// =============================================================================
// Host Objects
// =============================================================================

/// Attribute access and accessor invocation through a custom source.
#[test]
fn test_custom_source_with_call_field() {
    let schema = SchemaBuilder::new()
        .field(FieldSpec::char("name"))
        .field(FieldSpec::float("price").call())
        .build()
        .unwrap();

    let product = Product {
        name: "widget".into(),
        price: 9.5,
    };
    let out = Serializer::new(&schema).serialize(&product).unwrap();
    assert_eq!(out, json!({"name": "widget", "price": 9.5}));
}

/// A `call` field over a source without accessor support fails.
#[test]
fn test_call_field_requires_invocation_support() {
    let schema = SchemaBuilder::new()
        .field(FieldSpec::float("price").call())
        .build()
        .unwrap();

    let result = Serializer::new(&schema).serialize_value(&json!({"price": 9.5}));
    assert!(matches!(result, Err(SerializeError::Invoke(ref f)) if f == "price"));
}

// =============================================================================
// Nesting
// =============================================================================

/// Nested schemas recurse; `many` nested fields map over sub-arrays.
#[test]
fn test_nested_and_nested_many() {
    let driver = SchemaBuilder::new()
        .field(FieldSpec::char("first_name"))
        .field(FieldSpec::char("last_name"))
        .build()
        .unwrap();
    let wheel = SchemaBuilder::new()
        .field(FieldSpec::integer("size"))
        .build()
        .unwrap();
    let schema = SchemaBuilder::new()
        .field(FieldSpec::char("model"))
        .field(FieldSpec::nested("driver", driver))
        .field(FieldSpec::nested_many("wheels", wheel))
        .build()
        .unwrap();

    let out = Serializer::new(&schema)
        .serialize_value(&json!({
            "model": "coupe",
            "driver": {"first_name": "Ada", "last_name": "Lovelace"},
            "wheels": [{"size": 17}, {"size": 17}, {"size": 18}, {"size": 18}]
        }))
        .unwrap();
    assert_eq!(
        out,
        json!({
            "model": "coupe",
            "driver": {"first_name": "Ada", "last_name": "Lovelace"},
            "wheels": [{"size": 17}, {"size": 17}, {"size": 18}, {"size": 18}]
        })
    );
}

/// A required nested failure propagates out of the parent structure.
#[test]
fn test_nested_required_failure_propagates() {
    let driver = SchemaBuilder::new()
        .field(FieldSpec::char("first_name"))
        .build()
        .unwrap();
    let schema = SchemaBuilder::new()
        .field(FieldSpec::nested("driver", driver))
        .build()
        .unwrap();

    let result = Serializer::new(&schema).serialize_value(&json!({"driver": {}}));
    assert!(matches!(result, Err(SerializeError::Missing(ref f)) if f == "first_name"));
}
