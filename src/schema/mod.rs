//! Field Descriptor Model for restform
//!
//! Schemas are ordered sequences of immutable field descriptors, built
//! once at definition time and shared read-only across every
//! serialize/deserialize call.
//!
//! # Design Principles
//!
//! - Field names unique per schema; definition order is canonical
//! - Hooks resolved against registration tables at `build()` time
//! - List fields wrap primitive leaves by type
//! - Nesting cannot form cycles: children are built before parents
//! - No mutation after construction

mod builder;
mod errors;
mod types;

pub use builder::SchemaBuilder;
pub use errors::{ConfigError, SchemaResult};
pub use types::{FieldKind, FieldSpec, MethodHook, PostCleanHook, Primitive, Schema, Validator};
