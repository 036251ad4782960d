//! # Schema Configuration Errors
//!
//! Errors detected at schema-definition time, before any engine runs.

use thiserror::Error;

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, ConfigError>;

/// Configuration errors surfaced by [`crate::schema::SchemaBuilder::build`]
/// and [`crate::deserializer::SchemaDeserializer::new`]
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Two fields declared under the same schema key
    #[error("duplicate field '{0}' in schema")]
    DuplicateField(String),

    /// Two fields resolve to the same output key via labels
    #[error("duplicate output key '{0}' in schema")]
    DuplicateOutputKey(String),

    /// A method field references a hook that was never registered
    #[error("field '{field}': no hook named '{hook}' registered")]
    UnknownHook {
        /// Field whose hook failed to resolve
        field: String,
        /// Hook name looked up in the registry
        hook: String,
    },

    /// A post-clean hook was registered for a field the schema does not declare
    #[error("post-clean hook registered for unknown field '{0}'")]
    UnknownHookField(String),

    /// A field kind has no deserialization semantics
    #[error("field '{field}': {kind} fields cannot be deserialized")]
    UnsupportedKind {
        /// Offending field
        field: String,
        /// Kind name
        kind: &'static str,
    },
}
