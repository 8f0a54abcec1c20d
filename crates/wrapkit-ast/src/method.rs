//! Method descriptors, as produced by the external header parser

use crate::{ParamDesc, TypeDesc};
use serde::{Deserialize, Serialize};

/// Access level of a class member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// One declared method (or constructor) of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_pure_virtual: bool,
    #[serde(default)]
    pub is_legacy: bool,
    /// `const` member function
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_operator: bool,
    #[serde(default = "TypeDesc::void", rename = "returns")]
    pub return_type: TypeDesc,
    #[serde(default)]
    pub params: Vec<ParamDesc>,
    /// Native declaration text, used for docstrings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl MethodDescriptor {
    /// A public, non-static method returning void with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            is_virtual: false,
            is_pure_virtual: false,
            is_legacy: false,
            is_const: false,
            is_operator: false,
            return_type: TypeDesc::void(),
            params: Vec::new(),
            signature: None,
            comment: None,
        }
    }

    pub fn param(mut self, ty: TypeDesc) -> Self {
        self.params.push(ParamDesc::new(ty));
        self
    }

    pub fn param_desc(mut self, param: ParamDesc) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: TypeDesc) -> Self {
        self.return_type = ty;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn legacy(mut self) -> Self {
        self.is_legacy = true;
        self
    }

    pub fn const_method(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn with_signature(mut self, text: impl Into<String>) -> Self {
        self.signature = Some(text.into());
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }

    pub fn is_destructor(&self) -> bool {
        self.name.starts_with('~')
    }

    /// Parameters that must be supplied: those before the first default
    pub fn required_args(&self) -> usize {
        self.params
            .iter()
            .position(ParamDesc::has_default)
            .unwrap_or(self.params.len())
    }

    pub fn max_args(&self) -> usize {
        self.params.len()
    }
}
