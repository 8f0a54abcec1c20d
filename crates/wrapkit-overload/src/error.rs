//! Errors: why a method cannot be wrapped, and runtime dispatch failures

use serde::Serialize;
use thiserror::Error;

/// Reason a method is left out of dispatch planning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Unwrappable {
    #[error("operators are not wrapped")]
    Operator,

    #[error("method is not public")]
    NotPublic,

    #[error("destructors are not wrapped")]
    Destructor,

    /// `New` and `Delete` are managed by the object model itself
    #[error("`{name}` is reserved for object lifetime management")]
    Lifecycle { name: String },

    #[error("constructors are not wrapped with the current settings")]
    Constructor,

    #[error("{} has an unknown type", describe(*param))]
    UnknownType { param: Option<usize> },

    #[error("{} is a pointer of unknown length", describe(Some(*param)))]
    UncountedPointer { param: usize },

    #[error("{} has more than one level of indirection", describe(*param))]
    MultiLevelIndirection { param: Option<usize> },

    #[error("{} is a function pointer", describe(Some(*param)))]
    FunctionPointer { param: usize },

    #[error("objects returned by value are not wrapped")]
    ObjectByValueReturn,

    #[error("pointer return value has no size hint")]
    UnhintedPointerReturn,

    #[error("legacy methods are not wrapped with the current settings")]
    Legacy,

    #[error("type `{class}` is excluded from wrapping")]
    Excluded { class: String },

    #[error("{} is a pointer or array of enum values", describe(Some(*param)))]
    EnumIndirection { param: usize },

    #[error("{} is an array of objects", describe(Some(*param)))]
    ObjectArray { param: usize },
}

fn describe(param: Option<usize>) -> String {
    match param {
        Some(i) => format!("parameter {}", i + 1),
        None => "the return value".to_string(),
    }
}

impl Unwrappable {
    pub fn code(&self) -> &'static str {
        match self {
            Unwrappable::Operator => "S-OVL-001",
            Unwrappable::NotPublic => "S-OVL-002",
            Unwrappable::Destructor => "S-OVL-003",
            Unwrappable::Lifecycle { .. } => "S-OVL-004",
            Unwrappable::Constructor => "S-OVL-005",
            Unwrappable::UnknownType { .. } => "S-OVL-006",
            Unwrappable::UncountedPointer { .. } => "S-OVL-007",
            Unwrappable::MultiLevelIndirection { .. } => "S-OVL-008",
            Unwrappable::FunctionPointer { .. } => "S-OVL-009",
            Unwrappable::ObjectByValueReturn => "S-OVL-010",
            Unwrappable::UnhintedPointerReturn => "S-OVL-011",
            Unwrappable::Legacy => "S-OVL-012",
            Unwrappable::Excluded { .. } => "S-OVL-013",
            Unwrappable::EnumIndirection { .. } => "S-OVL-014",
            Unwrappable::ObjectArray { .. } => "S-OVL-015",
        }
    }
}

/// A dynamic call the dispatch plan cannot route
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// E-DISPATCH-001
    #[error("{function}() takes {expected} arguments ({received} given)")]
    Arity {
        function: String,
        expected: String,
        received: usize,
    },

    /// E-DISPATCH-002
    #[error("no overloads of {function}() take arguments of the given types ({received} given)")]
    NoMatch { function: String, received: usize },
}

impl DispatchError {
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::Arity { .. } => "E-DISPATCH-001",
            DispatchError::NoMatch { .. } => "E-DISPATCH-002",
        }
    }
}
