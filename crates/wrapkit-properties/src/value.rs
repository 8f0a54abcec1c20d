//! Property value types and the numeric unification rules between them

use serde::Serialize;
use wrapkit_ast::{BaseType, TypeDesc};
use wrapkit_hierarchy::Database;

/// The value a method reads or writes, reduced to its element type and
/// element count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueType {
    pub base: BaseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Elements per value: 1 for scalars, objects and strings, `n` for fixed
    /// arrays and hinted pointers, `None` for pointers of unknown length
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_const: bool,
}

impl ValueType {
    /// Reduce a declared type to a value type
    pub fn of(ty: &TypeDesc) -> ValueType {
        let class_name = if ty.base.is_named() {
            ty.class_name.clone()
        } else {
            None
        };

        // Strings and single objects are one value regardless of indirection
        let (base, count) = if ty.is_char_pointer() || ty.is_string() {
            (BaseType::String, Some(1))
        } else if ty.base == BaseType::Object && ty.pointers.len() <= 1 && ty.dimensions.is_empty() {
            (BaseType::Object, Some(1))
        } else if ty.is_scalar() {
            (ty.base, Some(1))
        } else {
            (ty.base, ty.element_count())
        };

        ValueType {
            base,
            class_name,
            count,
            is_const: ty.is_const,
        }
    }

    /// The same element type repeated `count` times
    pub fn repeated(ty: &TypeDesc, count: usize) -> ValueType {
        ValueType {
            count: Some(count),
            ..ValueType::of(ty)
        }
    }

    pub fn bool() -> ValueType {
        ValueType {
            base: BaseType::Bool,
            class_name: None,
            count: Some(1),
            is_const: false,
        }
    }

    /// Integral or boolean single value: what on/off toggles and
    /// enumerated setters can drive
    pub fn is_switchable(&self) -> bool {
        self.count == Some(1)
            && (self.base.is_integral() || matches!(self.base, BaseType::Bool | BaseType::Enum))
    }
}

/// Whether two element types are interchangeable for one property
pub fn bases_unify(a: BaseType, b: BaseType) -> bool {
    use BaseType::*;

    if a == b {
        return true;
    }
    match (a, b) {
        (Float, Double) | (Double, Float) => true,
        (SignedChar, UnsignedChar) | (UnsignedChar, SignedChar) => true,
        _ => {
            // short/int/long/long long of the same signedness
            let widths = |t: BaseType| matches!(t.integer_rank(), Some(1..=4));
            widths(a) && widths(b) && a.is_unsigned() == b.is_unsigned()
        }
    }
}

/// Whether a method's value can belong to a property holding `property`
pub fn unify(property: &ValueType, method: &ValueType, db: Option<&Database>) -> bool {
    if property.count != method.count {
        return false;
    }
    if !bases_unify(property.base, method.base) {
        return false;
    }
    match property.base {
        BaseType::Object | BaseType::Enum | BaseType::Unknown => {
            match (&property.class_name, &method.class_name) {
                (Some(p), Some(m)) if p == m => true,
                (Some(p), Some(m)) if property.base == BaseType::Object => {
                    db.is_some_and(|db| db.is_a(m, p).is_some() || db.is_a(p, m).is_some())
                }
                _ => false,
            }
        }
        _ => true,
    }
}
