//! Field descriptor types.
//!
//! Supported field kinds:
//! - primitive leaves: boolean, char (string), integer, float
//! - constant: literal JSON value injected into every output
//! - method: schema-bound hook invoked with the whole source instance
//! - list: homogeneous list of a primitive leaf
//! - nested: child schema, optionally serialized as a list

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::serializer::Source;

/// Coercion target for primitive leaf fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Boolean
    Boolean,
    /// UTF-8 string
    Char,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
}

impl Primitive {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Char => "string",
            Primitive::Integer => "integer",
            Primitive::Float => "number",
        }
    }
}

/// Hook bound to a `Method` field; receives the whole source instance.
pub type MethodHook = Arc<dyn Fn(&dyn Source) -> Result<Value, String> + Send + Sync>;

/// Hook applied to a field's cleaned value after its own validation succeeded.
pub type PostCleanHook = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// Custom predicate validator; returns a message on failure.
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Behavior variant of a field.
///
/// `List` wraps a [`Primitive`] by type, so wrapping a nested or list
/// field cannot be expressed. `Nested` holds an already-built child
/// schema behind an `Arc`, so a schema cannot nest itself directly or
/// transitively.
#[derive(Clone)]
pub enum FieldKind {
    /// Coerce the looked-up value to a primitive leaf type
    Primitive(Primitive),
    /// Emit the stored literal unconditionally
    Constant(Value),
    /// Invoke a schema-bound hook; `hook` overrides the derived
    /// `get_<field name>` default
    Method { hook: Option<String> },
    /// Apply a primitive coercion elementwise over an iterable
    List(Primitive),
    /// Recurse into a child schema
    Nested {
        /// Child schema describing the sub-structure
        child: Arc<Schema>,
        /// Serialize the sub-value as a list of structures
        many: bool,
    },
}

impl FieldKind {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Primitive(p) => p.type_name(),
            FieldKind::Constant(_) => "constant",
            FieldKind::Method { .. } => "method",
            FieldKind::List(_) => "list",
            FieldKind::Nested { .. } => "nested",
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Primitive(p) => write!(f, "Primitive({:?})", p),
            FieldKind::Constant(v) => write!(f, "Constant({})", v),
            FieldKind::Method { hook } => write!(f, "Method({:?})", hook),
            FieldKind::List(p) => write!(f, "List({:?})", p),
            FieldKind::Nested { many, .. } => write!(f, "Nested {{ many: {} }}", many),
        }
    }
}

/// Immutable field descriptor.
///
/// `label` overrides the output/input key, `attr_name` overrides the
/// source lookup key; both default to `name`. Fields are required
/// unless marked [`FieldSpec::optional`].
#[derive(Clone)]
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) label: Option<String>,
    pub(crate) attr_name: Option<String>,
    pub(crate) required: bool,
    pub(crate) call: bool,
    pub(crate) kind: FieldKind,
    pub(crate) min_value: Option<f64>,
    pub(crate) max_value: Option<f64>,
    pub(crate) validators: Vec<Validator>,
}

impl FieldSpec {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            attr_name: None,
            required: true,
            call: false,
            kind,
            min_value: None,
            max_value: None,
            validators: Vec::new(),
        }
    }

    /// Create a boolean field
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(Primitive::Boolean))
    }

    /// Create a string field
    pub fn char(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(Primitive::Char))
    }

    /// Create an integer field
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(Primitive::Integer))
    }

    /// Create a float field
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Primitive(Primitive::Float))
    }

    /// Create a constant field emitting `value` in every output
    pub fn constant(name: impl Into<String>, value: Value) -> Self {
        Self::new(name, FieldKind::Constant(value))
    }

    /// Create a method field bound to the derived `get_<name>` hook
    pub fn method(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Method { hook: None })
    }

    /// Create a method field bound to an explicitly named hook
    pub fn method_named(name: impl Into<String>, hook: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Method {
                hook: Some(hook.into()),
            },
        )
    }

    /// Create a list field over a primitive element type
    pub fn list(name: impl Into<String>, element: Primitive) -> Self {
        Self::new(name, FieldKind::List(element))
    }

    /// Create a nested field over a child schema
    pub fn nested(name: impl Into<String>, child: Arc<Schema>) -> Self {
        Self::new(name, FieldKind::Nested { child, many: false })
    }

    /// Create a nested field serialized as a list of structures
    pub fn nested_many(name: impl Into<String>, child: Arc<Schema>) -> Self {
        Self::new(name, FieldKind::Nested { child, many: true })
    }

    /// Override the output/input key
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Override the source lookup key
    pub fn attr(mut self, attr_name: impl Into<String>) -> Self {
        self.attr_name = Some(attr_name.into());
        self
    }

    /// Mark the field optional: failures are swallowed and the key omitted
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Invoke the source accessor instead of reading a stored value
    pub fn call(mut self) -> Self {
        self.call = true;
        self
    }

    /// Lower bound for numeric deserializer fields
    pub fn min(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    /// Upper bound for numeric deserializer fields
    pub fn max(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }

    /// Attach a custom predicate validator
    pub fn validator(
        mut self,
        validate: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(Arc::new(validate));
        self
    }

    /// Returns the schema key of this field
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the output/input key: `label` if set, else `name`
    pub fn output_key(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Returns the source lookup key: `attr_name` if set, else `name`
    pub fn lookup_key(&self) -> &str {
        self.attr_name.as_deref().unwrap_or(&self.name)
    }

    /// Returns whether the field is required
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns whether the source accessor is invoked
    pub fn is_call(&self) -> bool {
        self.call
    }

    /// Returns the behavior variant
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns the custom validators
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("attr_name", &self.attr_name)
            .field("required", &self.required)
            .field("call", &self.call)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Ordered, immutable field schema.
///
/// Built once via [`crate::schema::SchemaBuilder`] and shared read-only
/// across all subsequent serialize/deserialize calls. Definition order
/// is the canonical output and validation order.
pub struct Schema {
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) methods: HashMap<String, MethodHook>,
    pub(crate) post_clean: HashMap<String, PostCleanHook>,
}

impl Schema {
    /// Iterate over fields in definition order
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Look up a field by schema key
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the resolved method hook for a field, if any
    pub(crate) fn method_hook(&self, field_name: &str) -> Option<&MethodHook> {
        self.methods.get(field_name)
    }

    /// Returns the post-clean hook for a field, if any
    pub(crate) fn post_clean_hook(&self, field_name: &str) -> Option<&PostCleanHook> {
        self.post_clean.get(field_name)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema").field("fields", &self.fields).finish()
    }
}
