//! Value type descriptors for parameters, return values, and typedef targets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fundamental category of a value, before indirection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseType {
    Void,
    Bool,
    Char,
    SignedChar,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Float,
    Double,
    /// The native string class
    String,
    /// A user-defined class or struct, named by `TypeDesc::class_name`
    Object,
    /// An enumeration, named by `TypeDesc::class_name`
    Enum,
    /// A function pointer
    Function,
    /// A user name the front end could not classify (often a typedef)
    Unknown,
}

impl BaseType {
    /// Map a spelled-out fundamental type to its base type
    pub fn from_name(text: &str) -> Option<BaseType> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let ty = match words.join(" ").as_str() {
            "void" => BaseType::Void,
            "bool" => BaseType::Bool,
            "char" => BaseType::Char,
            "signed char" => BaseType::SignedChar,
            "unsigned char" => BaseType::UnsignedChar,
            "short" | "short int" | "signed short" | "signed short int" => BaseType::Short,
            "unsigned short" | "unsigned short int" => BaseType::UnsignedShort,
            "int" | "signed" | "signed int" => BaseType::Int,
            "unsigned" | "unsigned int" => BaseType::UnsignedInt,
            "long" | "long int" | "signed long" | "signed long int" => BaseType::Long,
            "unsigned long" | "unsigned long int" => BaseType::UnsignedLong,
            "long long" | "long long int" | "signed long long" | "__int64" => BaseType::LongLong,
            "unsigned long long" | "unsigned long long int" | "unsigned __int64" => {
                BaseType::UnsignedLongLong
            }
            "float" => BaseType::Float,
            "double" => BaseType::Double,
            "std::string" | "string" => BaseType::String,
            _ => return None,
        };
        Some(ty)
    }

    /// Width class of an integer type: 0 char, 1 short, 2 int, 3 long, 4 long long
    pub fn integer_rank(self) -> Option<u8> {
        match self {
            BaseType::Char | BaseType::SignedChar | BaseType::UnsignedChar => Some(0),
            BaseType::Short | BaseType::UnsignedShort => Some(1),
            BaseType::Int | BaseType::UnsignedInt => Some(2),
            BaseType::Long | BaseType::UnsignedLong => Some(3),
            BaseType::LongLong | BaseType::UnsignedLongLong => Some(4),
            _ => None,
        }
    }

    pub fn is_integral(self) -> bool {
        self.integer_rank().is_some()
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            BaseType::UnsignedChar
                | BaseType::UnsignedShort
                | BaseType::UnsignedInt
                | BaseType::UnsignedLong
                | BaseType::UnsignedLongLong
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, BaseType::Float | BaseType::Double)
    }

    /// Numeric in the host's sense: integers, floats, and bool
    pub fn is_numeric(self) -> bool {
        self.is_integral() || self.is_floating() || self == BaseType::Bool
    }

    /// Types that carry a class name
    pub fn is_named(self) -> bool {
        matches!(self, BaseType::Object | BaseType::Enum | BaseType::Unknown)
    }

    pub fn spelling(self) -> &'static str {
        match self {
            BaseType::Void => "void",
            BaseType::Bool => "bool",
            BaseType::Char => "char",
            BaseType::SignedChar => "signed char",
            BaseType::UnsignedChar => "unsigned char",
            BaseType::Short => "short",
            BaseType::UnsignedShort => "unsigned short",
            BaseType::Int => "int",
            BaseType::UnsignedInt => "unsigned int",
            BaseType::Long => "long",
            BaseType::UnsignedLong => "unsigned long",
            BaseType::LongLong => "long long",
            BaseType::UnsignedLongLong => "unsigned long long",
            BaseType::Float => "float",
            BaseType::Double => "double",
            BaseType::String => "std::string",
            BaseType::Object => "object",
            BaseType::Enum => "enum",
            BaseType::Function => "function",
            BaseType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

/// One level of pointer indirection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pointer {
    /// `T *`
    Mutable,
    /// `T * const`
    Const,
}

/// A fully qualified value type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDesc {
    pub base: BaseType,
    /// Class name for object, enum, and unresolved named types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_reference: bool,
    /// Pointer levels, innermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pointers: Vec<Pointer>,
    /// Array dimensions, outermost first; symbolic sizes are kept verbatim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<String>,
    /// Element count hint for pointers (e.g. a getter known to return 3 values)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl TypeDesc {
    pub fn scalar(base: BaseType) -> Self {
        Self {
            base,
            class_name: None,
            is_const: false,
            is_reference: false,
            pointers: Vec::new(),
            dimensions: Vec::new(),
            count: None,
        }
    }

    pub fn void() -> Self {
        Self::scalar(BaseType::Void)
    }

    /// A user-defined class type, by value
    pub fn object(class_name: impl Into<String>) -> Self {
        Self::named(BaseType::Object, class_name)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::named(BaseType::Enum, name)
    }

    pub fn named(base: BaseType, name: impl Into<String>) -> Self {
        Self {
            class_name: Some(name.into()),
            ..Self::scalar(base)
        }
    }

    /// `const char *`
    pub fn c_string() -> Self {
        Self::scalar(BaseType::Char).constant().pointer()
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn pointer(mut self) -> Self {
        self.pointers.push(Pointer::Mutable);
        self
    }

    pub fn array(mut self, dim: impl Into<String>) -> Self {
        self.dimensions.push(dim.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Pointer levels plus array dimensions
    pub fn indirection(&self) -> usize {
        self.pointers.len() + self.dimensions.len()
    }

    pub fn is_void(&self) -> bool {
        self.base == BaseType::Void && self.indirection() == 0
    }

    pub fn is_scalar(&self) -> bool {
        self.indirection() == 0
    }

    pub fn is_pointer(&self) -> bool {
        self.pointers.len() == 1 && self.dimensions.is_empty()
    }

    pub fn is_array(&self) -> bool {
        !self.dimensions.is_empty()
    }

    pub fn is_object(&self) -> bool {
        self.base == BaseType::Object
    }

    /// Native string class, by value or reference
    pub fn is_string(&self) -> bool {
        self.base == BaseType::String && self.indirection() == 0
    }

    /// `char *` or `const char *`
    pub fn is_char_pointer(&self) -> bool {
        self.base == BaseType::Char && self.is_pointer()
    }

    pub fn is_void_pointer(&self) -> bool {
        self.base == BaseType::Void && self.is_pointer()
    }

    /// Integral value with no indirection (references allowed)
    pub fn is_integral_scalar(&self) -> bool {
        self.base.is_integral() && self.is_scalar()
    }

    /// Whether a pointer or reference lets the callee write through it
    pub fn is_out_parameter(&self) -> bool {
        (self.is_reference && !self.is_const && self.is_scalar())
            || (!self.is_const && self.indirection() == 1 && self.base.is_numeric())
    }

    /// Number of elements addressed by an array or counted pointer
    pub fn element_count(&self) -> Option<usize> {
        if !self.dimensions.is_empty() {
            let mut total = 1usize;
            for dim in &self.dimensions {
                total = total.checked_mul(dim.trim().parse::<usize>().ok()?)?;
            }
            return Some(total);
        }
        if self.pointers.len() == 1 {
            return self.count;
        }
        None
    }

    /// Same pointer depth, dimensions, and reference-ness
    pub fn same_shape(&self, other: &TypeDesc) -> bool {
        self.pointers.len() == other.pointers.len()
            && self.dimensions == other.dimensions
            && self.is_reference == other.is_reference
    }

    /// Same type once top-level and pointee const qualifiers are ignored
    pub fn eq_ignoring_const(&self, other: &TypeDesc) -> bool {
        self.base == other.base
            && self.class_name == other.class_name
            && self.same_shape(other)
    }

    /// Count of const qualifiers anywhere in the type
    pub fn const_count(&self) -> usize {
        usize::from(self.is_const)
            + self.pointers.iter().filter(|p| **p == Pointer::Const).count()
    }

    /// The class name, or the fundamental spelling
    pub fn base_name(&self) -> &str {
        match &self.class_name {
            Some(name) if self.base.is_named() => name,
            _ => self.base.spelling(),
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}", self.base_name())?;
        for pointer in &self.pointers {
            match pointer {
                Pointer::Mutable => write!(f, " *")?,
                Pointer::Const => write!(f, " *const")?,
            }
        }
        if self.is_reference {
            write!(f, " &")?;
        }
        for dim in &self.dimensions {
            write!(f, "[{}]", dim)?;
        }
        Ok(())
    }
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDesc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeDesc,
    /// Default value text, if the parameter is optional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ParamDesc {
    pub fn new(ty: TypeDesc) -> Self {
        Self {
            name: None,
            ty,
            default_value: None,
        }
    }

    pub fn named(name: impl Into<String>, ty: TypeDesc) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_normalizes_whitespace() {
        assert_eq!(BaseType::from_name("unsigned   int"), Some(BaseType::UnsignedInt));
        assert_eq!(BaseType::from_name("long long"), Some(BaseType::LongLong));
        assert_eq!(BaseType::from_name("vtkObject"), None);
    }

    #[test]
    fn test_element_count() {
        let arr = TypeDesc::scalar(BaseType::Double).array("3");
        assert_eq!(arr.element_count(), Some(3));

        let grid = TypeDesc::scalar(BaseType::Int).array("2").array("4");
        assert_eq!(grid.element_count(), Some(8));

        let symbolic = TypeDesc::scalar(BaseType::Int).array("N");
        assert_eq!(symbolic.element_count(), None);

        let hinted = TypeDesc::scalar(BaseType::Float).pointer().with_count(6);
        assert_eq!(hinted.element_count(), Some(6));

        assert_eq!(TypeDesc::scalar(BaseType::Int).element_count(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeDesc::c_string().to_string(), "const char *");
        assert_eq!(
            TypeDesc::object("vtkPoints").pointer().to_string(),
            "vtkPoints *"
        );
        assert_eq!(
            TypeDesc::scalar(BaseType::Double).array("3").to_string(),
            "double[3]"
        );
    }

    #[test]
    fn test_out_parameter() {
        assert!(TypeDesc::scalar(BaseType::Double).reference().is_out_parameter());
        assert!(TypeDesc::scalar(BaseType::Double).pointer().is_out_parameter());
        assert!(!TypeDesc::scalar(BaseType::Double).constant().pointer().is_out_parameter());
        assert!(!TypeDesc::object("vtkActor").pointer().is_out_parameter());
    }

    #[test]
    fn test_type_json_defaults() {
        let ty: TypeDesc = serde_json::from_str(r#"{"base":"int"}"#).unwrap();
        assert_eq!(ty, TypeDesc::scalar(BaseType::Int));
    }
}
