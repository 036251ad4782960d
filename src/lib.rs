//! restform - declarative data-shape engines for REST payloads
//!
//! Three engines share one shape: an immutable descriptor tree built at
//! definition time and evaluated against per-call values. The serializer
//! projects source instances into ordered JSON structures (fail-fast);
//! the deserializer validates untrusted mappings into cleaned data
//! (fail-slow, accumulating an error tree); the permission algebra
//! evaluates boolean predicate trees against an access context. The
//! engines never perform I/O.

pub mod deserializer;
pub mod permissions;
pub mod schema;
pub mod serializer;
