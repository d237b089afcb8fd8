use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use lazy_static::lazy_static;

use crate::signatures::{signatures::TypedOperation, types::Primitive};

pub const HEADER: &str = "from typing import Any, Callable, Dict, Iterable, Iterator, List, Optional, Sequence, Set, Tuple, TypeVar";

pub const HELPERS: &str = "T = TypeVar(\"T\")
U = TypeVar(\"U\")


def fold_repaint(initial: T, items: Iterable[U], update: Callable[[T, U], T]) -> T:
    raise NotImplementedError
";

/// Name of the fold helper declared by every stub module.
pub const FOLD_HELPER: &str = "fold_repaint";

lazy_static! {
    /// Domain names with a fixed shape.
    pub static ref DOMAIN_ALIASES: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        map.insert("Segment", "Tuple[Any, ...]");
        map.insert("Axis", "Tuple[int, int]");
        map.insert("AxisColumn", "Tuple[int, int]");
        map
    };

    /// Names that must never be rebound by an alias: the typing names the
    /// header imports, the helper type variables, and language keywords and
    /// literals.
    static ref RESERVED_NAMES: HashSet<&'static str> = {
        let mut set = HashSet::new();
        for name in [
            "Any", "Callable", "Dict", "Iterable", "Iterator", "List", "Optional", "Sequence",
            "Set", "Tuple", "TypeVar", "T", "U",
        ] {
            set.insert(name);
        }
        for name in [
            "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
            "continue", "def", "del", "elif", "else", "except", "finally", "for", "from",
            "global", "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass",
            "raise", "return", "try", "while", "with", "yield",
        ] {
            set.insert(name);
        }
        set
    };
}

/// The alias bound to `token`, if it needs one.
pub fn alias_for(token: &str) -> Option<String> {
    if RESERVED_NAMES.contains(token) {
        return None;
    }

    if let Some(target) = DOMAIN_ALIASES.get(token) {
        return Some(target.to_string());
    }

    if let Some(primitive) = Primitive::from_scalar_name(token) {
        // Lowercase spellings already are the primitive.
        if primitive.name() == token {
            return None;
        }
        return Some(primitive.name().to_string());
    }

    if token.starts_with(|c: char| c.is_uppercase()) {
        return Some(String::from("Any"));
    }

    None
}

fn operation_stub(operation: &TypedOperation) -> String {
    let parameters: Vec<String> = operation
        .parameter_types
        .iter()
        .enumerate()
        .map(|(index, parameter)| format!("arg{}: {}", index, parameter))
        .collect();

    format!(
        "def {}({}) -> {}:\n    raise NotImplementedError\n",
        operation.name,
        parameters.join(", "),
        operation.return_type
    )
}

/// Builds the stub module for one note.
///
/// Output depends only on the arguments, with aliases and operations in
/// sorted order, so identical notes synthesize byte-identical modules.
pub fn synthesize(
    operations: &BTreeMap<String, TypedOperation>,
    referenced_tokens: &BTreeSet<String>,
    lambda_code: &str,
) -> String {
    let mut module = String::new();
    module.push_str(HEADER);
    module.push_str("\n\n");

    let aliases: Vec<String> = referenced_tokens
        .iter()
        .filter(|token| !operations.contains_key(*token) && token.as_str() != FOLD_HELPER)
        .filter_map(|token| alias_for(token).map(|target| format!("{} = {}", token, target)))
        .collect();
    if !aliases.is_empty() {
        module.push_str(&aliases.join("\n"));
        module.push_str("\n\n");
    }

    module.push_str(HELPERS);

    for operation in operations.values() {
        module.push_str("\n\n");
        module.push_str(&operation_stub(operation));
    }

    module.push_str("\n\n");
    module.push_str(lambda_code);
    if !lambda_code.ends_with('\n') {
        module.push('\n');
    }

    module
}
