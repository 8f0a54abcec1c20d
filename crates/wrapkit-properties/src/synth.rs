//! Property synthesis for one class

use serde::{Deserialize, Serialize};
use wrapkit_ast::{ClassDescriptor, MethodDescriptor, Visibility};
use wrapkit_hierarchy::Database;

use crate::group::Grouper;
use crate::precedence::resolve_repeats;
use crate::{classify_method, MethodInfo, MethodShape, ValueType};

/// A synthesized property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Unified value type, taken from the first typed method attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueType>,
    pub public_methods: MethodShape,
    pub protected_methods: MethodShape,
    pub private_methods: MethodShape,
    /// Shapes contributed by legacy methods
    pub legacy_methods: MethodShape,
    /// Literals of `SetXToLiteral` setters, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Every attached method is static
    pub is_static: bool,
    /// Indices of the attached methods
    pub methods: Vec<usize>,
    #[serde(skip)]
    pub(crate) static_count: usize,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            public_methods: MethodShape::empty(),
            protected_methods: MethodShape::empty(),
            private_methods: MethodShape::empty(),
            legacy_methods: MethodShape::empty(),
            enum_values: Vec::new(),
            is_static: false,
            methods: Vec::new(),
            static_count: 0,
        }
    }

    /// Shapes of every attached method regardless of visibility
    pub fn shapes(&self) -> MethodShape {
        self.public_methods | self.protected_methods | self.private_methods
    }

    pub fn has(&self, shape: MethodShape) -> bool {
        self.shapes().contains(shape)
    }

    pub(crate) fn finish(&mut self) {
        if self.value.is_none() && self.shapes().intersects(MethodShape::ANY_BOOL) {
            self.value = Some(ValueType::bool());
        }
        self.is_static = !self.methods.is_empty() && self.static_count == self.methods.len();
    }
}

/// How each input method was treated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodReport {
    pub name: String,
    #[serde(flatten)]
    pub info: MethodInfo,
    /// Index of the property the method belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<usize>,
    /// Set when the method was dropped in favor of an equivalent one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_of: Option<usize>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ambiguous: bool,
}

/// Non-fatal findings of a synthesis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDiagnostic {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<usize>,
}

/// Everything synthesized for one class
#[derive(Debug, Clone, Serialize)]
pub struct ClassProperties {
    pub class_name: String,
    pub properties: Vec<PropertyDescriptor>,
    /// One entry per input method, in declaration order
    pub methods: Vec<MethodReport>,
    /// Eligible methods that joined no property
    pub unclassified: Vec<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<PropertyDiagnostic>,
}

impl ClassProperties {
    pub fn find(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyOptions {
    /// Let protected methods contribute to properties
    pub include_protected: bool,
}

/// Groups a class's accessors into properties. Holds no per-class state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertySynthesizer<'a> {
    db: Option<&'a Database>,
    include_protected: bool,
}

impl<'a> PropertySynthesizer<'a> {
    pub fn new(options: &PropertyOptions) -> Self {
        Self {
            db: None,
            include_protected: options.include_protected,
        }
    }

    /// Expand typedefs and unify object types through this hierarchy
    pub fn with_database(mut self, db: &'a Database) -> Self {
        self.db = Some(db);
        self
    }

    fn eligible(&self, method: &MethodDescriptor) -> bool {
        match method.visibility {
            Visibility::Public => true,
            Visibility::Protected => self.include_protected,
            Visibility::Private => false,
        }
    }

    pub fn synthesize(&self, class: &ClassDescriptor) -> ClassProperties {
        let mut diagnostics = Vec::new();
        let methods = self.expanded_methods(class, &mut diagnostics);
        let infos: Vec<MethodInfo> = methods.iter().map(classify_method).collect();

        let candidates: Vec<usize> = (0..methods.len())
            .filter(|&i| self.eligible(&methods[i]) && infos[i].is_recognized())
            .collect();

        let repeats = resolve_repeats(&methods, &infos, &candidates);
        for (i, ambiguous) in repeats.ambiguous.iter().enumerate() {
            if *ambiguous {
                diagnostics.push(PropertyDiagnostic {
                    code: "W-PROP-001",
                    message: format!(
                        "cannot choose between overloads of `{}`; keeping both",
                        methods[i].name
                    ),
                    method: Some(i),
                });
            }
        }

        let survivors: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&i| repeats.repeat_of[i].is_none())
            .collect();
        let grouper = Grouper {
            methods: &methods,
            infos: &infos,
            shapes: &repeats.merged,
            db: self.db,
        };
        let (properties, owner) = grouper.group(&survivors);

        let reports: Vec<MethodReport> = methods
            .iter()
            .zip(infos)
            .enumerate()
            .map(|(i, (method, info))| {
                let repeat_of = repeats.repeat_of[i];
                MethodReport {
                    name: method.name.clone(),
                    info,
                    property: owner[repeat_of.unwrap_or(i)],
                    repeat_of,
                    ambiguous: repeats.ambiguous[i],
                }
            })
            .collect();

        let unclassified: Vec<usize> = (0..methods.len())
            .filter(|&i| {
                self.eligible(&methods[i])
                    && !class.is_constructor(&methods[i])
                    && !methods[i].is_destructor()
                    && reports[i].property.is_none()
            })
            .collect();

        tracing::debug!(
            class = %class.name,
            properties = properties.len(),
            unclassified = unclassified.len(),
            "synthesized properties"
        );

        ClassProperties {
            class_name: class.name.clone(),
            properties,
            methods: reports,
            unclassified,
            diagnostics,
        }
    }

    fn expanded_methods(
        &self,
        class: &ClassDescriptor,
        diagnostics: &mut Vec<PropertyDiagnostic>,
    ) -> Vec<MethodDescriptor> {
        let mut methods = class.methods.clone();
        let Some(db) = self.db else {
            return methods;
        };
        for (i, method) in methods.iter_mut().enumerate() {
            if let Err(err) = db.expand_typedefs_in_method(method, Some(&class.name)) {
                diagnostics.push(PropertyDiagnostic {
                    code: "W-PROP-002",
                    message: err.to_string(),
                    method: Some(i),
                });
            }
        }
        methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapkit_ast::{BaseType, TypeDesc};

    fn int() -> TypeDesc {
        TypeDesc::scalar(BaseType::Int)
    }

    fn make_class(methods: Vec<MethodDescriptor>) -> ClassDescriptor {
        methods
            .into_iter()
            .fold(ClassDescriptor::new("vtkThing"), |c, m| c.method(m))
    }

    fn synthesize(class: &ClassDescriptor) -> ClassProperties {
        PropertySynthesizer::new(&PropertyOptions::default()).synthesize(class)
    }

    #[test]
    fn test_get_set_pair() {
        let class = make_class(vec![
            MethodDescriptor::new("GetX").returns(int()),
            MethodDescriptor::new("SetX").param(int()),
        ]);
        let result = synthesize(&class);
        assert_eq!(result.properties.len(), 1);
        let x = &result.properties[0];
        assert_eq!(x.name, "X");
        assert_eq!(x.public_methods, MethodShape::GET | MethodShape::SET);
        assert!(result.unclassified.is_empty());
    }

    #[test]
    fn test_boolean_pair() {
        let class = make_class(vec![MethodDescriptor::new("ValueOn"), MethodDescriptor::new("ValueOff")]);
        let result = synthesize(&class);
        assert_eq!(result.properties.len(), 1);
        let value = &result.properties[0];
        assert_eq!(value.name, "Value");
        assert_eq!(value.value, Some(ValueType::bool()));
        assert_eq!(value.public_methods, MethodShape::BOOL_ON | MethodShape::BOOL_OFF);
    }

    #[test]
    fn test_setter_seeds_before_getter() {
        // The getter is declared first, but the setter's pass runs first
        let class = make_class(vec![
            MethodDescriptor::new("GetScale").returns(TypeDesc::scalar(BaseType::Float)),
            MethodDescriptor::new("SetScale").param(TypeDesc::scalar(BaseType::Double)),
        ]);
        let result = synthesize(&class);
        assert_eq!(result.properties.len(), 1);
        assert_eq!(result.properties[0].value.as_ref().map(|v| v.base), Some(BaseType::Double));
        assert_eq!(result.properties[0].methods, vec![1, 0]);
    }

    #[test]
    fn test_full_family() {
        let class = make_class(vec![
            MethodDescriptor::new("SetColorMode").param(int()),
            MethodDescriptor::new("GetColorMode").returns(int()),
            MethodDescriptor::new("SetColorModeToRGB"),
            MethodDescriptor::new("SetColorModeToLuminance"),
            MethodDescriptor::new("GetColorModeAsString").returns(TypeDesc::c_string()),
            MethodDescriptor::new("GetColorModeMinValue").returns(int()),
            MethodDescriptor::new("GetColorModeMaxValue").returns(int()),
            MethodDescriptor::new("Update"),
        ]);
        let result = synthesize(&class);
        assert_eq!(result.properties.len(), 1);
        let mode = &result.properties[0];
        assert_eq!(mode.enum_values, vec!["RGB", "Luminance"]);
        assert!(mode.has(MethodShape::ENUM_SET | MethodShape::GET_AS_STRING | MethodShape::GET_MAX_VALUE));
        assert_eq!(result.unclassified, vec![7]);
    }

    #[test]
    fn test_incompatible_types_stay_apart() {
        let class = make_class(vec![
            MethodDescriptor::new("SetMode").param(int()),
            MethodDescriptor::new("GetMode").returns(TypeDesc::c_string()),
        ]);
        let result = synthesize(&class);
        assert_eq!(result.properties.len(), 2);
        assert!(result.properties.iter().all(|p| p.name == "Mode"));
    }

    #[test]
    fn test_protected_excluded_by_default() {
        let class = make_class(vec![
            MethodDescriptor::new("SetX").param(int()).visibility(Visibility::Protected),
            MethodDescriptor::new("GetX").returns(int()),
        ]);
        let result = synthesize(&class);
        assert_eq!(result.properties[0].protected_methods, MethodShape::empty());

        let options = PropertyOptions { include_protected: true };
        let result = PropertySynthesizer::new(&options).synthesize(&class);
        assert_eq!(result.properties[0].protected_methods, MethodShape::SET);
        assert_eq!(result.properties[0].public_methods, MethodShape::GET);
    }

    #[test]
    fn test_repeat_reported() {
        let class = make_class(vec![
            MethodDescriptor::new("SetValue").param(TypeDesc::scalar(BaseType::Float)),
            MethodDescriptor::new("SetValue").param(TypeDesc::scalar(BaseType::Double)),
        ]);
        let result = synthesize(&class);
        assert_eq!(result.methods[0].repeat_of, Some(1));
        assert_eq!(result.methods[0].property, Some(0));
        assert_eq!(result.properties[0].methods, vec![1]);
    }

    #[test]
    fn test_static_and_legacy() {
        let class = make_class(vec![
            MethodDescriptor::new("SetGlobalWarningDisplay").param(int()).static_method(),
            MethodDescriptor::new("GetGlobalWarningDisplay").returns(int()).static_method().legacy(),
        ]);
        let result = synthesize(&class);
        let p = &result.properties[0];
        assert!(p.is_static);
        assert_eq!(p.legacy_methods, MethodShape::GET);
    }
}
