//! wrapkit descriptors - the shared input model
//!
//! Classes, methods, parameters, and value types as reported by the native
//! header parser, plus source spans for hierarchy records. Everything here
//! is plain data and round-trips through serde so descriptors can be fed in
//! as JSON.

mod class;
mod method;
mod span;
mod types;

pub use class::*;
pub use method::*;
pub use span::*;
pub use types::*;
