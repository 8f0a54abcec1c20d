//! wrapkit - binding planner for multiply-inherited, templated native object models
//!
//! This is the root workspace crate that hosts end-to-end tests.
//! The implementation lives in the workspace member crates.

pub use wrapkit_ast as ast;
pub use wrapkit_hierarchy as hierarchy;
pub use wrapkit_overload as overload;
pub use wrapkit_properties as properties;
