//! Serializer Engine for restform
//!
//! Projects source instances into ordered, JSON-primitive-compatible
//! structures by walking a schema in definition order.
//!
//! # Design Principles
//!
//! - Fail-fast: the first required-field failure aborts the structure
//! - Optional-field failures are swallowed; the key is omitted
//! - Output preserves schema definition order
//! - The engine performs no I/O and never mutates the schema

mod engine;
mod errors;
mod source;

pub use engine::Serializer;
pub use errors::{SerializeError, SerializeResult};
pub use source::{Source, ValueSource};
