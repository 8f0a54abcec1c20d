//! Which methods the dispatch layer can express

use wrapkit_ast::{BaseType, MethodDescriptor, TypeDesc};
use wrapkit_hierarchy::Database;

use crate::{OverloadSettings, Unwrappable};

/// Check that every parameter and the return value can cross the binding
/// boundary. Constructors are judged like any other method here; whether
/// they are planned at all is up to the caller.
pub fn check_wrappable(
    method: &MethodDescriptor,
    db: Option<&Database>,
    settings: &OverloadSettings,
) -> Result<(), Unwrappable> {
    if method.is_operator {
        return Err(Unwrappable::Operator);
    }
    if !method.is_public() {
        return Err(Unwrappable::NotPublic);
    }
    if method.is_destructor() {
        return Err(Unwrappable::Destructor);
    }
    if method.name == "New" || method.name == "Delete" {
        return Err(Unwrappable::Lifecycle {
            name: method.name.clone(),
        });
    }
    if method.is_legacy && !settings.wrap_legacy {
        return Err(Unwrappable::Legacy);
    }

    for (i, param) in method.params.iter().enumerate() {
        check_param(&param.ty, i)?;
    }
    check_return(&method.return_type)?;

    if let Some(db) = db {
        let types = std::iter::once(&method.return_type).chain(method.params.iter().map(|p| &p.ty));
        for ty in types {
            if let (BaseType::Object | BaseType::Enum, Some(class)) = (ty.base, &ty.class_name) {
                if db.is_excluded(class, &settings.exclude_flag) {
                    return Err(Unwrappable::Excluded {
                        class: class.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Arrays of any rank, or a single pointer
fn indirection_ok(ty: &TypeDesc) -> bool {
    ty.pointers.is_empty() || (ty.pointers.len() == 1 && ty.dimensions.is_empty())
}

fn check_param(ty: &TypeDesc, i: usize) -> Result<(), Unwrappable> {
    match ty.base {
        BaseType::Function => return Err(Unwrappable::FunctionPointer { param: i }),
        BaseType::Unknown => return Err(Unwrappable::UnknownType { param: Some(i) }),
        _ => {}
    }
    if !indirection_ok(ty) {
        return Err(Unwrappable::MultiLevelIndirection { param: Some(i) });
    }
    if ty.indirection() == 0 {
        return Ok(());
    }

    let passes_as_one = ty.is_pointer()
        && (ty.is_object() || ty.is_char_pointer() || ty.is_void_pointer());
    if passes_as_one {
        return Ok(());
    }
    match ty.base {
        BaseType::Enum => return Err(Unwrappable::EnumIndirection { param: i }),
        BaseType::Object => return Err(Unwrappable::ObjectArray { param: i }),
        BaseType::Void => return Err(Unwrappable::MultiLevelIndirection { param: Some(i) }),
        _ => {}
    }
    if ty.element_count().is_none() {
        return Err(Unwrappable::UncountedPointer { param: i });
    }
    Ok(())
}

fn check_return(ty: &TypeDesc) -> Result<(), Unwrappable> {
    match ty.base {
        BaseType::Unknown => return Err(Unwrappable::UnknownType { param: None }),
        BaseType::Function => return Err(Unwrappable::MultiLevelIndirection { param: None }),
        _ => {}
    }
    if ty.is_array() || ty.pointers.len() > 1 {
        return Err(Unwrappable::MultiLevelIndirection { param: None });
    }
    if ty.is_object() && ty.pointers.is_empty() && !ty.is_reference {
        return Err(Unwrappable::ObjectByValueReturn);
    }
    if ty.is_pointer() && ty.base.is_numeric() && !ty.is_char_pointer() && ty.count.is_none() {
        return Err(Unwrappable::UnhintedPointerReturn);
    }
    Ok(())
}
