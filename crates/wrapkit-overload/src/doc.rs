//! Host-language signature lines for docstrings

use wrapkit_ast::{BaseType, MethodDescriptor, TypeDesc};

/// How a value looks from the host language
fn host_type(ty: &TypeDesc) -> String {
    if ty.is_string() || ty.is_char_pointer() {
        return "str".to_string();
    }
    if ty.is_void_pointer() {
        return "Pointer".to_string();
    }

    let element = match ty.base {
        BaseType::Bool => "bool".to_string(),
        BaseType::Float | BaseType::Double => "float".to_string(),
        BaseType::Char => "str".to_string(),
        base if base.is_integral() => "int".to_string(),
        BaseType::Object | BaseType::Enum => ty.base_name().to_string(),
        _ => ty.base_name().to_string(),
    };

    if ty.is_object() || ty.indirection() == 0 {
        return element;
    }
    match ty.element_count() {
        Some(n) => format!("({})", vec![element.as_str(); n].join(", ")),
        None => format!("[{element}, ...]"),
    }
}

/// `V.Name(int, float) -> int`, followed by the native declaration when known
pub fn signature_doc(method: &MethodDescriptor) -> String {
    let params: Vec<String> = method.params.iter().map(|p| host_type(&p.ty)).collect();
    let mut doc = format!("V.{}({})", method.name, params.join(", "));
    if !method.returns_void() {
        doc.push_str(" -> ");
        doc.push_str(&host_type(&method.return_type));
    }
    if let Some(signature) = &method.signature {
        doc.push_str("\nC++: ");
        doc.push_str(signature);
    }
    doc
}

/// Docstring for a whole overload group: every signature, then the
/// first method's comment
pub fn group_doc<'a>(methods: impl IntoIterator<Item = &'a MethodDescriptor>) -> String {
    let mut comment = None;
    let mut lines = Vec::new();
    for method in methods {
        comment = comment.or(method.comment.as_deref());
        lines.push(signature_doc(method));
    }

    let mut doc = lines.join("\n");
    if let Some(comment) = comment {
        doc.push_str("\n\n");
        doc.push_str(comment.trim());
    }
    doc
}
