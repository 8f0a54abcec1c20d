//! wrapkit-hierarchy: class hierarchy database
//!
//! Loads flat, line-oriented descriptions of classes, typedefs, and enums
//! into a name-sorted, read-only [`Database`] and answers:
//! - `find_entry`: lookup by name, ignoring template arguments
//! - `is_type_of`: ancestry through templates and typedef aliases, with
//!   per-superclass memoization that is safe to share across threads
//! - `expand_typedef`: alias expansion in class scope
//!
//! # Example
//!
//! ```
//! use wrapkit_hierarchy::DatabaseBuilder;
//!
//! let mut builder = DatabaseBuilder::new();
//! builder
//!     .load_str(
//!         "core.txt",
//!         "Base<class T> ; Base.h ; Core\nDerived<class T> : Base<T> ; Derived.h ; Core\n",
//!     )
//!     .unwrap();
//! let db = builder.build();
//!
//! let derived = db.find_entry("Derived").unwrap();
//! assert_eq!(db.is_type_of(derived, "Base", "Derived<int>").as_deref(), Some("Base<int>"));
//! ```

mod ancestry;
mod cycle;
mod database;
mod entity;
mod error;
pub mod names;
mod record;
mod typedef;

pub use database::{Database, DatabaseBuilder, DatabaseSummary, LoadReport, HIERARCHY_EXTENSION};
pub use entity::{Entity, EntityKind, Flag, SuperClass, TemplateParam};
pub use error::{HierarchyError, HierarchyWarning, RecordError};
pub use record::{parse_record, parse_type};
