//! Name manipulation: scopes, template arguments, and parameter substitution
//!
//! All functions work on the canonical spelling produced by the record
//! parser: no whitespace around `<`, `>`, or `::`, and `", "` between
//! template arguments.

use crate::TemplateParam;

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Length of the identifier at the start of `text`
pub fn identifier_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(&b) if is_ident_start(b) => bytes.iter().take_while(|b| is_ident_char(**b)).count(),
        _ => 0,
    }
}

/// Length of a balanced `<...>` group at the start of `text`, 0 if there is none
pub fn template_args_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'<') {
        return 0;
    }
    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
    }
    0
}

/// Identifier plus the template arguments that directly follow it
pub fn unscoped_name_len(text: &str) -> usize {
    let n = identifier_len(text);
    n + template_args_len(&text[n..])
}

/// The minimal name used for database lookups: every scope segment is kept,
/// every template argument list is dropped, and anything after the final
/// identifier (pointers, qualifiers) is ignored.
///
/// `Outer<int>::Inner<float> *` becomes `Outer::Inner`.
///
/// Arguments are dropped from outer segments too, not only the last one.
/// Entities are stored under their unparameterized qualified name, so a
/// member of a templated class is found whichever instantiation of the
/// owner it is written against.
pub fn strip_template_args(name: &str) -> String {
    let text = name.trim();
    let mut rest = text.strip_prefix("::").unwrap_or(text);
    let mut key = String::new();

    loop {
        let n = identifier_len(rest);
        if n == 0 {
            break;
        }
        key.push_str(&rest[..n]);
        rest = &rest[n..];
        rest = &rest[template_args_len(rest)..];
        match rest.strip_prefix("::") {
            Some(tail) if identifier_len(tail) > 0 => {
                key.push_str("::");
                rest = tail;
            }
            _ => break,
        }
    }

    key
}

/// Split `Outer::Inner` into `(Some("Outer"), "Inner")`
pub fn split_scope(name: &str) -> (Option<&str>, &str) {
    let mut depth = 0usize;
    let bytes = name.as_bytes();
    let mut split = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                split = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    match split {
        Some(at) => (Some(&name[..at]), &name[at + 2..]),
        None => (None, name),
    }
}

/// Split the arguments of a `<...>` group at top-level commas
pub fn split_template_args(group: &str) -> Vec<String> {
    let inner = group
        .strip_prefix('<')
        .and_then(|g| g.strip_suffix('>'))
        .unwrap_or(group);

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in inner.bytes().enumerate() {
        match b {
            b'<' | b'(' => depth += 1,
            b'>' | b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                args.push(inner[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = inner[start..].trim();
    if !last.is_empty() || !args.is_empty() {
        args.push(last.to_string());
    }
    args
}

/// Template arguments of `class_with_args` for an entity called `name`,
/// with omitted trailing arguments filled from the declared defaults.
///
/// Returns `None` when `class_with_args` carries no argument list.
pub fn decompose_templated_type(
    class_with_args: &str,
    name: &str,
    params: &[TemplateParam],
) -> Option<Vec<String>> {
    let rest = class_with_args.trim().strip_prefix(name)?;
    let n = template_args_len(rest);
    if n == 0 {
        return None;
    }

    let mut args = split_template_args(&rest[..n]);
    args.truncate(params.len());

    for i in args.len()..params.len() {
        let filled = match &params[i].default {
            Some(default) => {
                let names: Vec<&str> = params[..i].iter().map(|p| p.name.as_str()).collect();
                substitute_identifiers(default, &names, &args)
            }
            // No default: leave the parameter unsubstituted
            None => params[i].name.clone(),
        };
        args.push(filled);
    }

    Some(args)
}

/// Replace whole identifiers matching `params[k]` with `args[k]`.
///
/// Identifiers reached through `::` are members of another scope and are
/// left alone.
pub fn substitute_identifiers(text: &str, params: &[&str], args: &[String]) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let at_boundary = i == 0 || !is_ident_char(bytes[i - 1]);
        if is_ident_start(b) && at_boundary {
            let n = identifier_len(&text[i..]);
            let word = &text[i..i + n];
            let after_scope = i >= 2 && &text[i - 2..i] == "::";
            let replacement = params
                .iter()
                .position(|p| *p == word)
                .filter(|_| !after_scope)
                .and_then(|k| args.get(k));
            match replacement {
                Some(arg) => out.push_str(arg),
                None => out.push_str(word),
            }
            i += n;
        } else {
            let ch = text[i..].chars().next().unwrap_or_default();
            out.push(ch);
            i += ch.len_utf8().max(1);
        }
    }

    out
}

/// Whether the lookup key of `name` mentions any of `params`, i.e. which
/// entity it resolves to depends on how the template is instantiated.
pub fn key_depends_on(name: &str, params: &[TemplateParam]) -> bool {
    let key = strip_template_args(name);
    key.split("::")
        .any(|segment| params.iter().any(|p| p.name == segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(names: &[(&str, Option<&str>)]) -> Vec<TemplateParam> {
        names
            .iter()
            .map(|(n, d)| TemplateParam {
                name: n.to_string(),
                kind: None,
                default: d.map(str::to_string),
            })
            .collect()
    }

    #[test]
    fn test_strip_template_args() {
        assert_eq!(strip_template_args("vtkObject"), "vtkObject");
        assert_eq!(strip_template_args("vtkVector<double, 3>"), "vtkVector");
        assert_eq!(strip_template_args("Outer<int>::Inner<float>"), "Outer::Inner");
        assert_eq!(strip_template_args("::std::string"), "std::string");
        assert_eq!(strip_template_args("vtkPoints *"), "vtkPoints");
    }

    #[test]
    fn test_split_scope() {
        assert_eq!(split_scope("vtkFoo::Mode"), (Some("vtkFoo"), "Mode"));
        assert_eq!(split_scope("A<B::C>::D"), (Some("A<B::C>"), "D"));
        assert_eq!(split_scope("Plain"), (None, "Plain"));
    }

    #[test]
    fn test_split_template_args_nested() {
        assert_eq!(
            split_template_args("<std::pair<int, int>, 3>"),
            vec!["std::pair<int, int>", "3"]
        );
        assert!(split_template_args("<>").is_empty());
    }

    #[test]
    fn test_decompose_fills_defaults() {
        let p = params(&[("T", None), ("U", Some("T")), ("N", Some("3"))]);
        assert_eq!(
            decompose_templated_type("Foo<double>", "Foo", &p),
            Some(vec!["double".into(), "double".into(), "3".into()])
        );
        assert_eq!(decompose_templated_type("Foo", "Foo", &p), None);
    }

    #[test]
    fn test_substitute_identifiers() {
        let args = vec!["int".to_string(), "3".to_string()];
        assert_eq!(
            substitute_identifiers("vtkTuple<T, Size>", &["T", "Size"], &args),
            "vtkTuple<int, 3>"
        );
        // Longer identifiers and scoped members are untouched
        assert_eq!(
            substitute_identifiers("Traits<TT>::T", &["T"], &args[..1]),
            "Traits<TT>::T"
        );
    }

    #[test]
    fn test_key_depends_on() {
        let p = params(&[("T", None)]);
        assert!(key_depends_on("T", &p));
        assert!(key_depends_on("T::Base", &p));
        assert!(!key_depends_on("Base<T>", &p));
    }
}
