//! Permission Expression Algebra for restform
//!
//! Boolean predicate trees composed from atomic capability checks and
//! evaluated against a per-request access context. A `false` result
//! tells the host to produce an access-denied response before invoking
//! any view logic.
//!
//! # Design Principles
//!
//! - Composition is explicit tree construction, not evaluation
//! - `And`/`Or` short-circuit; `Xor` evaluates both operands
//! - Trees are immutable and safe for concurrent evaluation

mod builtin;
mod context;
mod expr;

pub use builtin::{
    allow_any, is_admin, is_authenticated, is_authenticated_or_read_only, is_read_only, is_staff,
};
pub use context::{AccessContext, Operation};
pub use expr::{and_, atomic, not_, or_, xor_, PermissionNode, PermissionPredicate};
