//! Type-check strings: one code per parameter, used by the runtime matcher
//! to test a dynamic argument list against one overload
//!
//! ```text
//! @dd|i *vtkPoints     bound call: double, double, optional int
//! Pd                   unbound call: one double array
//! V &vtkVector3d       unbound call: one object reference
//! ```

use serde::Serialize;
use wrapkit_ast::{BaseType, MethodDescriptor, TypeDesc};
use wrapkit_hierarchy::Database;

/// Code for a fundamental type
pub fn base_code(base: BaseType) -> Option<char> {
    let code = match base {
        BaseType::Bool => 'q',
        BaseType::Char => 'c',
        BaseType::SignedChar => 'b',
        BaseType::UnsignedChar => 'B',
        BaseType::Short => 'h',
        BaseType::UnsignedShort => 'H',
        BaseType::Int => 'i',
        BaseType::UnsignedInt => 'I',
        BaseType::Long => 'l',
        BaseType::UnsignedLong => 'k',
        BaseType::LongLong => 'L',
        BaseType::UnsignedLongLong => 'K',
        BaseType::Float => 'f',
        BaseType::Double => 'd',
        _ => return None,
    };
    Some(code)
}

/// Code and, for enums and objects, the qualified name of one parameter
fn param_code(ty: &TypeDesc) -> (String, Option<String>) {
    // Names never contain spaces so the name list splits cleanly
    let name = || ty.class_name.as_deref().unwrap_or("").replace(' ', "");

    if ty.is_string() {
        return ("s".into(), None);
    }
    if ty.is_char_pointer() {
        return ("z".into(), None);
    }
    if ty.is_void_pointer() {
        return ("v".into(), None);
    }
    match ty.base {
        BaseType::Object => {
            let marker = if ty.is_pointer() {
                "*"
            } else if ty.is_reference {
                "&"
            } else {
                ""
            };
            return ("V".into(), Some(format!("{marker}{}", name())));
        }
        BaseType::Enum => return ("E".into(), Some(name())),
        _ => {}
    }

    let code = base_code(ty.base).unwrap_or('?');
    if ty.dimensions.len() >= 2 {
        let trailing: String = ty.dimensions[1..].iter().map(|d| format!("[{d}]")).collect();
        (format!("N{code}{trailing}"), None)
    } else if ty.indirection() == 1 {
        (format!("P{code}"), None)
    } else {
        (code.to_string(), None)
    }
}

/// Build the type-check string of one signature
pub fn type_check_string(method: &MethodDescriptor, bound: bool) -> String {
    let mut codes = String::new();
    let mut names = Vec::new();

    if bound {
        codes.push('@');
    }
    let required = method.required_args();
    for (i, param) in method.params.iter().enumerate() {
        if i == required {
            codes.push('|');
        }
        let (code, name) = param_code(&param.ty);
        codes.push_str(&code);
        names.extend(name);
    }

    for name in names {
        codes.push(' ');
        codes.push_str(&name);
    }
    codes
}

/// Dynamic kind of one argument at a call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgKind {
    None,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    Enum(String),
    Object(String),
    Sequence(Vec<ArgKind>),
}

/// One parameter of a parsed type-check string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamCheck {
    Scalar { code: char },
    String,
    CharPointer,
    VoidPointer,
    Enum { name: String },
    Object { name: String, pointer: bool },
    Array { code: char, dimensions: Vec<String> },
}

/// A parsed type-check string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCheck {
    pub bound: bool,
    pub params: Vec<ParamCheck>,
    /// Number of parameters that must be supplied
    pub required: usize,
}

impl TypeCheck {
    pub fn parse(text: &str) -> TypeCheck {
        let (codes, names) = text.split_once(' ').unwrap_or((text, ""));
        let mut names = names.split(' ').filter(|n| !n.is_empty());
        let mut chars = codes.chars().peekable();

        let mut check = TypeCheck {
            bound: false,
            params: Vec::new(),
            required: usize::MAX,
        };

        while let Some(c) = chars.next() {
            let param = match c {
                '@' => {
                    check.bound = true;
                    continue;
                }
                '|' => {
                    check.required = check.params.len();
                    continue;
                }
                's' => ParamCheck::String,
                'z' => ParamCheck::CharPointer,
                'v' => ParamCheck::VoidPointer,
                'E' => ParamCheck::Enum {
                    name: names.next().unwrap_or("").to_string(),
                },
                'V' => {
                    let name = names.next().unwrap_or("");
                    ParamCheck::Object {
                        pointer: name.starts_with('*'),
                        name: name.trim_start_matches(&['*', '&'][..]).to_string(),
                    }
                }
                'P' => ParamCheck::Array {
                    code: chars.next().unwrap_or('?'),
                    dimensions: Vec::new(),
                },
                'N' => {
                    let code = chars.next().unwrap_or('?');
                    let mut dimensions = Vec::new();
                    while chars.peek() == Some(&'[') {
                        chars.next();
                        let dim: String = chars.by_ref().take_while(|&c| c != ']').collect();
                        dimensions.push(dim);
                    }
                    ParamCheck::Array { code, dimensions }
                }
                code => ParamCheck::Scalar { code },
            };
            check.params.push(param);
        }

        check.required = check.required.min(check.params.len());
        check
    }

    /// Whether a call with `args` type-checks against this signature
    pub fn matches(&self, args: &[ArgKind], db: Option<&Database>) -> bool {
        if args.len() < self.required || args.len() > self.params.len() {
            return false;
        }
        self.params
            .iter()
            .zip(args)
            .all(|(param, arg)| param.accepts(arg, db))
    }
}

fn scalar_accepts(code: char, arg: &ArgKind) -> bool {
    match code {
        'q' => matches!(arg, ArgKind::Bool | ArgKind::Int),
        'c' => matches!(arg, ArgKind::Str),
        'f' | 'd' => matches!(arg, ArgKind::Float | ArgKind::Int | ArgKind::Bool),
        'b' | 'B' | 'h' | 'H' | 'i' | 'I' | 'l' | 'k' | 'L' | 'K' => {
            matches!(arg, ArgKind::Int | ArgKind::Bool)
        }
        _ => false,
    }
}

/// An array of `rank` nested sequences whose leaves match `code`
fn array_accepts(code: char, rank: usize, arg: &ArgKind) -> bool {
    match (rank, arg) {
        (0, leaf) => scalar_accepts(code, leaf),
        (_, ArgKind::Sequence(items)) => items.iter().all(|item| array_accepts(code, rank - 1, item)),
        _ => false,
    }
}

impl ParamCheck {
    pub fn accepts(&self, arg: &ArgKind, db: Option<&Database>) -> bool {
        match self {
            ParamCheck::Scalar { code } => scalar_accepts(*code, arg),
            ParamCheck::String => matches!(arg, ArgKind::Str),
            ParamCheck::CharPointer => matches!(arg, ArgKind::Str | ArgKind::None),
            ParamCheck::VoidPointer => matches!(arg, ArgKind::Bytes | ArgKind::Str | ArgKind::None),
            ParamCheck::Enum { name } => match arg {
                ArgKind::Enum(given) => given == name,
                ArgKind::Int => true,
                _ => false,
            },
            ParamCheck::Object { name, pointer } => match arg {
                ArgKind::None => *pointer,
                ArgKind::Object(given) if given == name => true,
                ArgKind::Object(given) => db.is_some_and(|db| db.is_a(given, name).is_some()),
                _ => false,
            },
            ParamCheck::Array { code, dimensions } => array_accepts(*code, dimensions.len() + 1, arg),
        }
    }
}
