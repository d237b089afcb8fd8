//! Type expressions for operation signatures.
//!
//! Signatures are written in an informal notation (`List T`, `Dict K -> V`,
//! `Tuple A, B`, bare comma lists). This module turns that notation into a
//! `TypeExpr` tree whose `Display` is the canonical generic form, e.g.
//! `List[Tuple[int, int]]`. The canonical form is accepted back as input, so
//! normalizing is idempotent.

use std::{collections::BTreeSet, fmt::Display};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref IDENTIFIER: Regex = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("identifier pattern must compile");
}

/// Represents the primitive types of the stub language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Primitive {
    Bool,
    Int,
    Float,
    Str,
}

impl Primitive {
    /// Maps a scalar spelling (`Bool`, `Boolean`, `Int`, `Integer`, `Float`,
    /// `Str`, `String` and the lowercase primitive names) to a primitive.
    pub fn from_scalar_name(name: &str) -> Option<Primitive> {
        match name {
            "Bool" | "Boolean" | "bool" => Some(Primitive::Bool),
            "Int" | "Integer" | "int" => Some(Primitive::Int),
            "Float" | "float" => Some(Primitive::Float),
            "Str" | "String" | "str" => Some(Primitive::Str),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Str => "str",
        }
    }
}

/// Single-argument generic containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GenericKind {
    List,
    Set,
    Optional,
    Sequence,
    Iterable,
    Iterator,
}

impl GenericKind {
    pub const ALL: [GenericKind; 6] = [
        GenericKind::List,
        GenericKind::Set,
        GenericKind::Optional,
        GenericKind::Sequence,
        GenericKind::Iterable,
        GenericKind::Iterator,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            GenericKind::List => "List",
            GenericKind::Set => "Set",
            GenericKind::Optional => "Optional",
            GenericKind::Sequence => "Sequence",
            GenericKind::Iterable => "Iterable",
            GenericKind::Iterator => "Iterator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeExpr {
    Any,
    Primitive(Primitive),
    /// A type name kept as written, minus whitespace.
    Named(String),
    Generic(GenericKind, Box<TypeExpr>),
    Dict(Box<TypeExpr>, Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
}

impl Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Any => write!(f, "Any"),
            TypeExpr::Primitive(primitive) => write!(f, "{}", primitive.name()),
            TypeExpr::Named(name) => write!(f, "{}", name),
            TypeExpr::Generic(kind, inner) => write!(f, "{}[{}]", kind.keyword(), inner),
            TypeExpr::Dict(key, value) => write!(f, "Dict[{}, {}]", key, value),
            TypeExpr::Tuple(elements) => {
                let elements: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "Tuple[{}]", elements.join(", "))
            }
        }
    }
}

impl TypeExpr {
    /// Adds every identifier mentioned by a named type to `names`.
    ///
    /// Builtin structure (generic keywords, primitives, `Any`) contributes
    /// nothing; only the user-facing names the stub may need to alias do.
    pub fn collect_names(&self, names: &mut BTreeSet<String>) {
        match self {
            TypeExpr::Any | TypeExpr::Primitive(_) => {}
            TypeExpr::Named(name) => {
                for found in IDENTIFIER.find_iter(name) {
                    names.insert(found.as_str().to_string());
                }
            }
            TypeExpr::Generic(_, inner) => inner.collect_names(names),
            TypeExpr::Dict(key, value) => {
                key.collect_names(names);
                value.collect_names(names);
            }
            TypeExpr::Tuple(elements) => {
                for element in elements {
                    element.collect_names(names);
                }
            }
        }
    }
}

/// Byte index of the bracket closing the one opened at `open`, if any.
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in text[open..].char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + index);
                }
            }
            _ => {}
        }
    }

    None
}

/// Splits `text` on `separator` wherever it is not nested in `()` or `[]`.
pub fn split_top_level<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut parts = vec![];
    let mut depth = 0i32;
    let mut start = 0;
    let mut index = 0;

    while index < text.len() {
        let rest = &text[index..];
        if depth == 0 && rest.starts_with(separator) {
            parts.push(&text[start..index]);
            index += separator.len();
            start = index;
            continue;
        }

        let c = match rest.chars().next() {
            Some(c) => c,
            None => break,
        };
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            _ => {}
        }
        index += c.len_utf8();
    }
    parts.push(&text[start..]);

    parts
}

/// The operand of a keyword form: `Kw[inner]` or `Kw operand`.
enum Operand<'a> {
    Bracketed(&'a str),
    Informal(&'a str),
}

fn keyword_operand<'a>(text: &'a str, keyword: &str) -> Option<Operand<'a>> {
    let rest = text.strip_prefix(keyword)?;

    if rest.starts_with('[') {
        return match matching_close(rest, 0) {
            Some(close) if close == rest.len() - 1 => Some(Operand::Bracketed(&rest[1..close])),
            _ => None,
        };
    }

    if rest.starts_with(char::is_whitespace) {
        let operand = rest.trim();
        if !operand.is_empty() {
            return Some(Operand::Informal(operand));
        }
    }

    None
}

fn normalize_dict(operand: Operand) -> TypeExpr {
    let (key, value) = match operand {
        Operand::Bracketed(inner) => {
            let parts = split_top_level(inner, ",");
            match parts.split_first() {
                Some((key, rest)) if !rest.is_empty() => (normalize(key), normalize(&rest.join(","))),
                _ => (normalize(inner), TypeExpr::Any),
            }
        }
        Operand::Informal(text) => {
            let parts = split_top_level(text, "->");
            match parts.split_first() {
                Some((key, rest)) if !rest.is_empty() => {
                    (normalize(key), normalize(&rest.join("->")))
                }
                _ => (normalize(text), TypeExpr::Any),
            }
        }
    };

    TypeExpr::Dict(Box::new(key), Box::new(value))
}

/// Converts an informal or canonical type expression into a `TypeExpr`.
///
/// Total over its input: anything that does not fit the notation becomes a
/// `Named` type with whitespace removed.
pub fn normalize(raw: &str) -> TypeExpr {
    let text = raw.trim();
    if text.is_empty() {
        return TypeExpr::Any;
    }

    if text.starts_with('(') && matching_close(text, 0) == Some(text.len() - 1) {
        return normalize(&text[1..text.len() - 1]);
    }

    for kind in GenericKind::ALL {
        if let Some(operand) = keyword_operand(text, kind.keyword()) {
            let inner = match operand {
                Operand::Bracketed(inner) | Operand::Informal(inner) => normalize(inner),
            };
            return TypeExpr::Generic(kind, Box::new(inner));
        }
    }

    if let Some(operand) = keyword_operand(text, "Dict") {
        return normalize_dict(operand);
    }

    if let Some(operand) = keyword_operand(text, "Tuple") {
        let inner = match operand {
            Operand::Bracketed(inner) | Operand::Informal(inner) => inner,
        };
        return TypeExpr::Tuple(split_top_level(inner, ",").into_iter().map(normalize).collect());
    }

    let parts = split_top_level(text, ",");
    if parts.len() > 1 {
        return TypeExpr::Tuple(parts.into_iter().map(normalize).collect());
    }

    if text == "Any" {
        return TypeExpr::Any;
    }

    if let Some(primitive) = Primitive::from_scalar_name(text) {
        return TypeExpr::Primitive(primitive);
    }

    TypeExpr::Named(text.split_whitespace().collect())
}
