//! Per-class structural descriptions

use crate::MethodDescriptor;
use serde::{Deserialize, Serialize};

/// Everything the header parser reports about one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    #[serde(default)]
    pub superclasses: Vec<String>,
    #[serde(default)]
    pub template_params: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default)]
    pub is_abstract: bool,
    /// Methods in declaration order
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclasses: Vec::new(),
            template_params: Vec::new(),
            module: None,
            is_abstract: false,
            methods: Vec::new(),
        }
    }

    pub fn superclass(mut self, name: impl Into<String>) -> Self {
        self.superclasses.push(name.into());
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Whether a method is one of this class's constructors
    pub fn is_constructor(&self, method: &MethodDescriptor) -> bool {
        method.name == self.name
    }
}
