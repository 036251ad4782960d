//! Deserializer Engine for restform
//!
//! Validates and converts untrusted input mappings into typed, cleaned
//! data.
//!
//! # Design Principles
//!
//! - Fail-slow: every field is checked, all failures accumulate
//! - Error trees mirror the schema's nesting shape exactly
//! - Post-clean hooks run only after a field's own validation succeeded
//! - Validation outcome is memoized per instance, never shared

mod coerce;
mod engine;
mod errors;

pub use engine::{AllPassDeserializer, Deserializer, SchemaDeserializer, Validation};
pub use errors::{ErrorNode, ErrorTree, ValidationError, NON_FIELD_ERRORS};
