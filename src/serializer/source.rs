//! Source lookup capability.
//!
//! Any value exposing "get a field by name", and optionally "invoke an
//! accessor by name", can be serialized. Hosts implement [`Source`] for
//! attribute-bearing objects; [`ValueSource`] adapts a JSON mapping.

use serde_json::Value;

/// Narrow lookup interface over the instance being serialized.
pub trait Source {
    /// Look up a value by key or attribute name
    fn field(&self, name: &str) -> Option<Value>;

    /// Invoke a zero-argument accessor by name.
    ///
    /// The default implementation supports no accessors; sources backing
    /// fields declared with [`crate::schema::FieldSpec::call`] override it.
    fn invoke(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }
}

/// Adapter exposing key access over a `serde_json::Value` mapping.
pub struct ValueSource<'a> {
    value: &'a Value,
}

impl<'a> ValueSource<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }
}

impl Source for ValueSource<'_> {
    fn field(&self, name: &str) -> Option<Value> {
        self.value.get(name).cloned()
    }
}
