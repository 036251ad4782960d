//! Schema builder.
//!
//! A schema is an explicit ordered list of field descriptors assembled
//! by composition. Method and post-clean hooks are held in registration
//! tables and resolved against the declared fields once, at `build()`
//! time; evaluation never performs name lookups.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use super::errors::{ConfigError, SchemaResult};
use super::types::{FieldKind, FieldSpec, MethodHook, PostCleanHook, Schema};
use crate::serializer::Source;

/// Builder assembling an ordered field schema.
#[derive(Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
    hooks: HashMap<String, MethodHook>,
    post_clean: HashMap<String, PostCleanHook>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; definition order is preserved in every output
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Register a method hook under `name`.
    ///
    /// A method field resolves its explicit hook name, or the derived
    /// `get_<field name>` default, against this registry.
    pub fn hook(
        mut self,
        name: impl Into<String>,
        hook: impl Fn(&dyn Source) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.insert(name.into(), Arc::new(hook));
        self
    }

    /// Register a post-clean hook for the named field.
    ///
    /// The hook receives the field's cleaned value after its own
    /// validation succeeded and returns the replacement value.
    pub fn post_clean(
        mut self,
        field: impl Into<String>,
        hook: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.post_clean.insert(field.into(), Arc::new(hook));
        self
    }

    /// Resolve hooks and freeze the schema.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a field name or output key is
    /// duplicated, a method field's hook is not registered, or a
    /// post-clean hook names an undeclared field.
    pub fn build(self) -> SchemaResult<Arc<Schema>> {
        let mut seen = HashSet::new();
        let mut seen_keys = HashSet::new();
        for spec in &self.fields {
            if !seen.insert(spec.name.clone()) {
                return Err(ConfigError::DuplicateField(spec.name.clone()));
            }
            // Labels share the output key space with unlabeled names.
            if !seen_keys.insert(spec.output_key().to_string()) {
                return Err(ConfigError::DuplicateOutputKey(spec.output_key().to_string()));
            }
        }

        let mut methods = HashMap::new();
        for spec in &self.fields {
            if let FieldKind::Method { hook } = &spec.kind {
                let hook_name = match hook {
                    Some(name) => name.clone(),
                    None => format!("get_{}", spec.name),
                };
                let resolved = self.hooks.get(&hook_name).ok_or_else(|| {
                    ConfigError::UnknownHook {
                        field: spec.name.clone(),
                        hook: hook_name.clone(),
                    }
                })?;
                methods.insert(spec.name.clone(), Arc::clone(resolved));
            }
        }

        for field in self.post_clean.keys() {
            if !seen.contains(field) {
                return Err(ConfigError::UnknownHookField(field.clone()));
            }
        }

        Ok(Arc::new(Schema {
            fields: self.fields,
            methods,
            post_clean: self.post_clean,
        }))
    }
}
