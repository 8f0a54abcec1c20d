//! Entities: one class, typedef, or enum record of the hierarchy

use std::path::Path;
use std::sync::OnceLock;

use serde::Serialize;
use wrapkit_ast::{Span, TypeDesc};

/// A template parameter of a class entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParam {
    pub name: String,
    /// Declared kind, e.g. `class`, `typename`, or `int` for value parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl TemplateParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            default: None,
        }
    }
}

/// A superclass reference, by name, with a memoized database position
#[derive(Debug, Clone, Serialize)]
pub struct SuperClass {
    /// Superclass name as written, possibly mentioning template parameters
    pub name: String,
    /// Position of the resolved entry in the sorted database.
    /// Purely derived: set at most once, by whichever reader resolves it first.
    #[serde(skip)]
    index: OnceLock<usize>,
}

impl SuperClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: OnceLock::new(),
        }
    }

    /// The memoized index, if a non-instantiation-dependent lookup stored one
    pub fn cached_index(&self) -> Option<usize> {
        self.index.get().copied()
    }

    /// Store a resolved index; a concurrent writer that got there first wins
    pub(crate) fn remember(&self, index: usize) {
        let _ = self.index.set(index);
    }
}

impl PartialEq for SuperClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for SuperClass {}

/// What kind of record an entity is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    Class {
        template_params: Vec<TemplateParam>,
        superclasses: Vec<SuperClass>,
    },
    Typedef {
        target: TypeDesc,
    },
    Enum,
}

/// A free-form `name[=value]` tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// One record of the hierarchy database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    /// Scope-qualified name without template arguments, e.g. `vtkFoo::Mode`
    pub name: String,
    #[serde(flatten)]
    pub kind: EntityKind,
    pub header: String,
    pub module: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<Flag>,
    /// Location of the record in its source
    #[serde(skip)]
    pub span: Span,
}

impl Entity {
    pub fn is_class(&self) -> bool {
        matches!(self.kind, EntityKind::Class { .. })
    }

    pub fn is_typedef(&self) -> bool {
        matches!(self.kind, EntityKind::Typedef { .. })
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, EntityKind::Enum)
    }

    pub fn template_params(&self) -> &[TemplateParam] {
        match &self.kind {
            EntityKind::Class {
                template_params, ..
            } => template_params,
            _ => &[],
        }
    }

    pub fn is_templated(&self) -> bool {
        !self.template_params().is_empty()
    }

    pub fn superclasses(&self) -> &[SuperClass] {
        match &self.kind {
            EntityKind::Class { superclasses, .. } => superclasses,
            _ => &[],
        }
    }

    pub fn typedef_target(&self) -> Option<&TypeDesc> {
        match &self.kind {
            EntityKind::Typedef { target } => Some(target),
            _ => None,
        }
    }

    /// Look up a flag: `None` if absent, `Some(None)` if present without a value
    pub fn flag(&self, name: &str) -> Option<Option<&str>> {
        self.flags
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_deref())
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flag(name).is_some()
    }

    /// Whether this entity is the one its header file is named after
    pub fn is_primary(&self) -> bool {
        let stem = Path::new(&self.header)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        !stem.is_empty() && stem == self.name
    }
}
