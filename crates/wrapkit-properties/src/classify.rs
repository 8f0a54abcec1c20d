//! Method shape classification from names and signatures alone

use serde::Serialize;
use wrapkit_ast::{BaseType, MethodDescriptor, TypeDesc};

use crate::{MethodShape, ValueType};

/// What a single method contributes to a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodInfo {
    /// Exactly one bit, or empty when the method is not a property accessor
    pub shape: MethodShape,
    /// Property name with the accessor prefix and suffix removed
    pub property: String,
    /// The value read or written; `None` for shapes that carry no value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueType>,
    /// For enumerated setters, the literal in `SetXToLiteral`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_literal: Option<String>,
}

impl MethodInfo {
    pub fn unrecognized() -> Self {
        Self {
            shape: MethodShape::empty(),
            property: String::new(),
            value: None,
            enum_literal: None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !self.shape.is_empty()
    }

    fn new(shape: MethodShape, property: &str, value: Option<ValueType>) -> Self {
        Self {
            shape,
            property: property.to_string(),
            value,
            enum_literal: None,
        }
    }
}

/// Strip `prefix` when the remaining name starts with an upper-case letter,
/// so `SetRadius` matches `Set` but `Setup` does not
fn accessor_name<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = name.strip_prefix(prefix)?;
    rest.starts_with(|c: char| c.is_ascii_uppercase()).then_some(rest)
}

/// `NumberOfPoints` → `Point`
fn count_name(rest: &str) -> Option<&str> {
    let plural = rest.strip_prefix("NumberOf")?;
    let name = plural.strip_suffix('s')?;
    (!name.is_empty()).then_some(name)
}

/// `ColorModeToRGB` → (`ColorMode`, `RGB`)
fn enum_setter_name(rest: &str) -> Option<(&str, &str)> {
    let mut search = rest.len();
    while let Some(at) = rest[..search].rfind("To") {
        let literal = &rest[at + 2..];
        let property = &rest[..at];
        let literal_ok = literal.starts_with(|c: char| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !property.is_empty() && literal_ok {
            return Some((property, literal));
        }
        search = at;
    }
    None
}

/// Leading integral index plus one value, or a lone index with a result
fn is_indexed(method: &MethodDescriptor) -> bool {
    let params = &method.params;
    let Some(first) = params.first() else {
        return false;
    };
    if !first.ty.is_integral_scalar() || first.ty.is_reference {
        return false;
    }
    if method.returns_void() {
        params.len() == 2 && !first.ty.eq_ignoring_const(&params[1].ty)
    } else {
        params.len() == 1
    }
}

/// Two or more parameters of one type
fn all_same_type(params: &[&TypeDesc]) -> bool {
    params.len() >= 2 && params.iter().all(|p| p.eq_ignoring_const(params[0]))
}

fn has_function_pointer(method: &MethodDescriptor) -> bool {
    method.return_type.base == BaseType::Function
        || method.params.iter().any(|p| p.ty.base == BaseType::Function)
}

/// Classify one method. Operators, destructors, and callbacks are never
/// property accessors.
pub fn classify_method(method: &MethodDescriptor) -> MethodInfo {
    if method.is_operator || method.is_destructor() || has_function_pointer(method) {
        return MethodInfo::unrecognized();
    }

    let name = method.name.as_str();
    let info = if let Some(rest) = accessor_name(name, "Set") {
        classify_setter(method, rest)
    } else if let Some(rest) = accessor_name(name, "Get") {
        classify_getter(method, rest)
    } else if let Some(rest) = accessor_name(name, "RemoveAll") {
        classify_remove_all(method, rest)
    } else if let Some(rest) = accessor_name(name, "Add") {
        classify_add(method, rest)
    } else if let Some(rest) = accessor_name(name, "Remove") {
        classify_remove(method, rest)
    } else {
        None
    };

    info.or_else(|| classify_toggle(method))
        .unwrap_or_else(MethodInfo::unrecognized)
}

fn classify_setter(method: &MethodDescriptor, rest: &str) -> Option<MethodInfo> {
    if !method.returns_void() {
        return None;
    }
    let params: Vec<&TypeDesc> = method.params.iter().map(|p| &p.ty).collect();

    if params.is_empty() {
        let (property, literal) = enum_setter_name(rest)?;
        let mut info = MethodInfo::new(MethodShape::ENUM_SET, property, None);
        info.enum_literal = Some(literal.to_string());
        return Some(info);
    }
    if let Some(property) = count_name(rest) {
        if params.len() == 1 && params[0].is_integral_scalar() {
            return Some(MethodInfo::new(MethodShape::SET_NUM, property, None));
        }
    }
    if is_indexed(method) {
        let value = Some(ValueType::of(params[1]));
        return Some(match accessor_name(rest, "Nth") {
            Some(property) => MethodInfo::new(MethodShape::SET_NTH, property, value),
            None => MethodInfo::new(MethodShape::SET_IDX, rest, value),
        });
    }
    if params.len() == 1 {
        return Some(MethodInfo::new(MethodShape::SET, rest, Some(ValueType::of(params[0]))));
    }
    if all_same_type(&params) && params[0].is_scalar() {
        let value = ValueType::repeated(params[0], params.len());
        return Some(MethodInfo::new(MethodShape::SET_MULTI, rest, Some(value)));
    }
    None
}

fn classify_getter(method: &MethodDescriptor, rest: &str) -> Option<MethodInfo> {
    let params: Vec<&TypeDesc> = method.params.iter().map(|p| &p.ty).collect();
    let returns = &method.return_type;

    if params.is_empty() && !method.returns_void() {
        if let Some(property) = rest.strip_suffix("AsString").filter(|p| !p.is_empty()) {
            if returns.is_char_pointer() || returns.is_string() {
                return Some(MethodInfo::new(MethodShape::GET_AS_STRING, property, None));
            }
        }
        let value = Some(ValueType::of(returns));
        if let Some(property) = rest.strip_suffix("MinValue").filter(|p| !p.is_empty()) {
            return Some(MethodInfo::new(MethodShape::GET_MIN_VALUE, property, value));
        }
        if let Some(property) = rest.strip_suffix("MaxValue").filter(|p| !p.is_empty()) {
            return Some(MethodInfo::new(MethodShape::GET_MAX_VALUE, property, value));
        }
        if let Some(property) = count_name(rest) {
            if returns.is_integral_scalar() {
                return Some(MethodInfo::new(MethodShape::GET_NUM, property, None));
            }
        }
        return Some(MethodInfo::new(MethodShape::GET, rest, value));
    }

    if is_indexed(method) && !method.returns_void() {
        let value = Some(ValueType::of(returns));
        return Some(match accessor_name(rest, "Nth") {
            Some(property) => MethodInfo::new(MethodShape::GET_NTH, property, value),
            None => MethodInfo::new(MethodShape::GET_IDX, rest, value),
        });
    }

    if !method.returns_void() {
        return None;
    }
    if params.len() == 1 && params[0].is_out_parameter() {
        let value = Some(ValueType::of(params[0]));
        return Some(MethodInfo::new(MethodShape::GET_RHS, rest, value));
    }
    if all_same_type(&params) && params.iter().all(|p| p.is_out_parameter()) {
        let value = ValueType::repeated(params[0], params.len());
        return Some(MethodInfo::new(MethodShape::GET_MULTI, rest, Some(value)));
    }
    None
}

fn classify_add(method: &MethodDescriptor, rest: &str) -> Option<MethodInfo> {
    let params: Vec<&TypeDesc> = method.params.iter().map(|p| &p.ty).collect();
    if is_indexed(method) && method.returns_void() {
        let value = Some(ValueType::of(params[1]));
        return Some(MethodInfo::new(MethodShape::ADD_IDX, rest, value));
    }
    if params.len() == 1 {
        let shape = if method.returns_void() {
            MethodShape::ADD
        } else {
            MethodShape::ADD_NODISCARD
        };
        return Some(MethodInfo::new(shape, rest, Some(ValueType::of(params[0]))));
    }
    if all_same_type(&params) && params[0].is_scalar() && method.returns_void() {
        let value = ValueType::repeated(params[0], params.len());
        return Some(MethodInfo::new(MethodShape::ADD_MULTI, rest, Some(value)));
    }
    None
}

fn classify_remove(method: &MethodDescriptor, rest: &str) -> Option<MethodInfo> {
    let [param] = method.params.as_slice() else {
        return None;
    };
    if param.ty.is_integral_scalar() && method.returns_void() {
        return Some(MethodInfo::new(MethodShape::REMOVE_IDX, rest, None));
    }
    let shape = if method.returns_void() {
        MethodShape::REMOVE
    } else {
        MethodShape::REMOVE_NODISCARD
    };
    Some(MethodInfo::new(shape, rest, Some(ValueType::of(&param.ty))))
}

fn classify_remove_all(method: &MethodDescriptor, rest: &str) -> Option<MethodInfo> {
    if !method.params.is_empty() {
        return None;
    }
    let property = rest.strip_suffix('s').filter(|p| !p.is_empty())?;
    Some(MethodInfo::new(MethodShape::REMOVE_ALL, property, None))
}

/// `XOn()` / `XOff()`
fn classify_toggle(method: &MethodDescriptor) -> Option<MethodInfo> {
    if !method.params.is_empty() || !method.returns_void() {
        return None;
    }
    let name = method.name.as_str();
    let (property, shape) = if let Some(p) = name.strip_suffix("Off") {
        (p, MethodShape::BOOL_OFF)
    } else if let Some(p) = name.strip_suffix("On") {
        (p, MethodShape::BOOL_ON)
    } else {
        return None;
    };
    let valid = property.starts_with(|c: char| c.is_ascii_uppercase());
    valid.then(|| MethodInfo::new(shape, property, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapkit_ast::ParamDesc;

    fn int() -> TypeDesc {
        TypeDesc::scalar(BaseType::Int)
    }

    fn double() -> TypeDesc {
        TypeDesc::scalar(BaseType::Double)
    }

    fn make_method(name: &str, params: Vec<TypeDesc>, returns: TypeDesc) -> MethodDescriptor {
        params
            .into_iter()
            .fold(MethodDescriptor::new(name).returns(returns), |m, p| m.param(p))
    }

    fn shape_of(name: &str, params: Vec<TypeDesc>, returns: TypeDesc) -> (MethodShape, String) {
        let info = classify_method(&make_method(name, params, returns));
        (info.shape, info.property)
    }

    #[test]
    fn test_plain_accessors() {
        assert_eq!(shape_of("GetRadius", vec![], double()), (MethodShape::GET, "Radius".into()));
        assert_eq!(
            shape_of("SetRadius", vec![double()], TypeDesc::void()),
            (MethodShape::SET, "Radius".into())
        );
    }

    #[test]
    fn test_prefix_needs_upper_case() {
        assert!(!classify_method(&make_method("Setup", vec![int()], TypeDesc::void())).is_recognized());
        assert!(!classify_method(&make_method("Getaway", vec![], int())).is_recognized());
    }

    #[test]
    fn test_indexed_and_nth() {
        assert_eq!(
            shape_of("SetPoint", vec![int(), double().array("3")], TypeDesc::void()).0,
            MethodShape::SET_IDX
        );
        assert_eq!(shape_of("GetPoint", vec![int()], double().pointer()).0, MethodShape::GET_IDX);
        assert_eq!(
            shape_of("GetNthInput", vec![int()], TypeDesc::object("vtkDataObject").pointer()),
            (MethodShape::GET_NTH, "Input".into())
        );
        // Same-typed pair is a multi-value setter, not an indexed one
        assert_eq!(shape_of("SetRange", vec![int(), int()], TypeDesc::void()).0, MethodShape::SET_MULTI);
    }

    #[test]
    fn test_multi_and_rhs() {
        let info = classify_method(&make_method(
            "SetOrigin",
            vec![double(), double(), double()],
            TypeDesc::void(),
        ));
        assert_eq!(info.shape, MethodShape::SET_MULTI);
        assert_eq!(info.value.unwrap().count, Some(3));

        assert_eq!(
            shape_of("GetOrigin", vec![double().array("3")], TypeDesc::void()).0,
            MethodShape::GET_RHS
        );
        assert_eq!(
            shape_of("GetOrigin", vec![double().reference(); 3], TypeDesc::void()).0,
            MethodShape::GET_MULTI
        );
    }

    #[test]
    fn test_toggles_and_enums() {
        assert_eq!(shape_of("DebugOn", vec![], TypeDesc::void()), (MethodShape::BOOL_ON, "Debug".into()));
        assert_eq!(shape_of("DebugOff", vec![], TypeDesc::void()), (MethodShape::BOOL_OFF, "Debug".into()));
        let info = classify_method(&make_method("SetColorModeToRGB", vec![], TypeDesc::void()));
        assert_eq!(info.shape, MethodShape::ENUM_SET);
        assert_eq!(info.property, "ColorMode");
        assert_eq!(info.enum_literal.as_deref(), Some("RGB"));
        // `To` followed by lower case is part of the name
        assert!(!classify_method(&make_method("SetTolerance", vec![], TypeDesc::void())).is_recognized());
    }

    #[test]
    fn test_special_getters() {
        assert_eq!(
            shape_of("GetColorModeAsString", vec![], TypeDesc::c_string()),
            (MethodShape::GET_AS_STRING, "ColorMode".into())
        );
        assert_eq!(
            shape_of("GetRadiusMaxValue", vec![], double()),
            (MethodShape::GET_MAX_VALUE, "Radius".into())
        );
        assert_eq!(
            shape_of("GetNumberOfPoints", vec![], TypeDesc::scalar(BaseType::LongLong)),
            (MethodShape::GET_NUM, "Point".into())
        );
        assert_eq!(
            shape_of("SetNumberOfPoints", vec![int()], TypeDesc::void()),
            (MethodShape::SET_NUM, "Point".into())
        );
    }

    #[test]
    fn test_add_remove() {
        let input = TypeDesc::object("vtkAlgorithmOutput").pointer();
        assert_eq!(shape_of("AddInput", vec![input.clone()], TypeDesc::void()).0, MethodShape::ADD);
        assert_eq!(shape_of("AddInput", vec![input.clone()], int()).0, MethodShape::ADD_NODISCARD);
        assert_eq!(shape_of("RemoveInput", vec![input], TypeDesc::void()).0, MethodShape::REMOVE);
        assert_eq!(shape_of("RemoveInput", vec![int()], TypeDesc::void()).0, MethodShape::REMOVE_IDX);
        assert_eq!(
            shape_of("RemoveAllInputs", vec![], TypeDesc::void()),
            (MethodShape::REMOVE_ALL, "Input".into())
        );
    }

    #[test]
    fn test_disqualified() {
        let mut op = make_method("GetValue", vec![], int());
        op.is_operator = true;
        assert!(!classify_method(&op).is_recognized());

        let callback = MethodDescriptor::new("SetCallback")
            .param_desc(ParamDesc::new(TypeDesc::scalar(BaseType::Function).pointer()));
        assert!(!classify_method(&callback).is_recognized());
    }
}
