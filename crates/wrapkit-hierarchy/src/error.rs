//! Error types for hierarchy loading and lookup

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use wrapkit_ast::Span;
use wrapkit_lexer::TokenKind;

/// A malformed hierarchy record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// E-HIER-001
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    /// E-HIER-002
    #[error("record has no {field} field")]
    MissingField { field: &'static str, span: Span },

    /// E-HIER-003
    #[error("invalid flag `{flag}`")]
    InvalidFlag { flag: String, span: Span },

    /// E-HIER-004
    #[error("unbalanced template brackets")]
    UnbalancedTemplate { span: Span },
}

impl RecordError {
    pub fn span(&self) -> Span {
        match self {
            RecordError::UnexpectedToken { span, .. } => *span,
            RecordError::MissingField { span, .. } => *span,
            RecordError::InvalidFlag { span, .. } => *span,
            RecordError::UnbalancedTemplate { span } => *span,
        }
    }

    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            RecordError::UnexpectedToken { .. } => "E-HIER-001",
            RecordError::MissingField { .. } => "E-HIER-002",
            RecordError::InvalidFlag { .. } => "E-HIER-003",
            RecordError::UnbalancedTemplate { .. } => "E-HIER-004",
        }
    }

    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        RecordError::UnexpectedToken {
            expected: expected.into(),
            found: found.describe().to_string(),
            span,
        }
    }
}

/// Errors that abort loading one hierarchy source
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("{source_name}:{line}: {error}")]
    Record {
        source_name: String,
        /// 1-based line of the offending record
        line: usize,
        error: RecordError,
    },

    #[error("cannot read {}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("cannot walk hierarchy directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("typedef `{name}` expands to itself")]
    TypedefCycle { name: String },
}

impl HierarchyError {
    pub fn code(&self) -> &'static str {
        match self {
            HierarchyError::Record { error, .. } => error.code(),
            HierarchyError::Io { .. } => "E-HIER-010",
            HierarchyError::Walk(_) => "E-HIER-011",
            HierarchyError::TypedefCycle { .. } => "E-HIER-012",
        }
    }
}

/// Problems that never block loading or queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HierarchyWarning {
    /// W-HIER-001: a later source redefines an entity; the first one is kept
    #[error("duplicate entity `{name}` in {source_name} ignored")]
    DuplicateEntity { name: String, source_name: String },

    /// W-HIER-002: superclasses that lead back to the class itself
    #[error("inheritance cycle: {cycle}")]
    InheritanceCycle { cycle: String },

    /// W-HIER-003: superclass not present in the database (external type)
    #[error("superclass `{superclass}` of `{entity}` is not in the hierarchy")]
    UnresolvedSuperclass { entity: String, superclass: String },
}

impl HierarchyWarning {
    pub fn code(&self) -> &'static str {
        match self {
            HierarchyWarning::DuplicateEntity { .. } => "W-HIER-001",
            HierarchyWarning::InheritanceCycle { .. } => "W-HIER-002",
            HierarchyWarning::UnresolvedSuperclass { .. } => "W-HIER-003",
        }
    }
}
