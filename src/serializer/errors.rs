//! # Serialization Errors
//!
//! Raised when a required field cannot be resolved, invoked, or coerced.
//! Serialization is fail-fast: the first required-field failure aborts
//! the whole structure and no partial output is returned.

use thiserror::Error;

/// Result type for serialization
pub type SerializeResult<T> = Result<T, SerializeError>;

/// Serialization failure for a single field
#[derive(Debug, Clone, Error)]
pub enum SerializeError {
    /// Source has no value under the field's lookup key
    #[error("field '{0}': no value found on source")]
    Missing(String),

    /// Source does not support invocation for a `call` field
    #[error("field '{0}': source does not support invocation")]
    Invoke(String),

    /// Resolved value cannot be coerced to the target primitive
    #[error("field '{field}': expected {expected}, got {actual}")]
    Coerce {
        /// Failing field name
        field: String,
        /// Target type name
        expected: &'static str,
        /// JSON type name of the resolved value
        actual: &'static str,
    },

    /// List field resolved to a non-array value
    #[error("field '{0}': expected an array value")]
    NotIterable(String),

    /// Nested field resolved to a non-object value
    #[error("field '{0}': expected an object value")]
    NotAnObject(String),

    /// Method hook reported a failure
    #[error("field '{field}': hook failed: {message}")]
    Hook {
        /// Failing field name
        field: String,
        /// Message produced by the hook
        message: String,
    },
}

impl SerializeError {
    /// Returns the name of the failing field
    pub fn field(&self) -> &str {
        match self {
            SerializeError::Missing(f)
            | SerializeError::Invoke(f)
            | SerializeError::NotIterable(f)
            | SerializeError::NotAnObject(f) => f,
            SerializeError::Coerce { field, .. } | SerializeError::Hook { field, .. } => field,
        }
    }
}
