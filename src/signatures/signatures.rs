use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::document::document::section_lines;

use super::types::{normalize, split_top_level, TypeExpr};

lazy_static! {
    static ref BACKTICK_SPAN: Regex = Regex::new(r"`([^`]+)`").expect("backtick pattern must compile");
    static ref OPERATION_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("name pattern must compile");
}

/// Separator between the parameter domains of one arrow group.
pub const CARTESIAN_SEPARATOR: &str = "×";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedOperation {
    pub name: String,
    pub parameter_types: Vec<TypeExpr>,
    pub return_type: TypeExpr,
}

/// Parses one backtick span as `name: domain × ... -> codomain`.
fn parse_declaration(span: &str) -> Option<TypedOperation> {
    if !span.contains(':') || !span.contains("->") {
        return None;
    }

    let (name, signature) = span.split_once(':')?;
    let name = name.trim();
    if !OPERATION_NAME.is_match(name) {
        return None;
    }

    let segments = split_top_level(signature, "->");
    let (codomain, groups) = segments.split_last()?;
    if groups.is_empty() || codomain.trim().is_empty() {
        debug!("skipping declaration of `{}` without a codomain", name);
        return None;
    }

    let mut parameter_types = vec![];
    for group in groups {
        for domain in split_top_level(group, CARTESIAN_SEPARATOR) {
            let domain = domain.trim();
            // `()` and an empty group declare no parameters
            if domain.is_empty() || domain == "()" {
                continue;
            }
            parameter_types.push(normalize(domain));
        }
    }

    Some(TypedOperation {
        name: name.to_string(),
        parameter_types,
        return_type: normalize(codomain),
    })
}

/// Scans the signature section for operation declarations.
///
/// Returns the operations keyed by name together with every type name the
/// normalized signatures mention. A document without the section yields
/// empty results. When a name is declared twice, the later declaration
/// replaces the earlier one.
pub fn parse_operations(
    text: &str,
    marker: &str,
) -> (BTreeMap<String, TypedOperation>, BTreeSet<String>) {
    let mut operations = BTreeMap::new();
    let mut names = BTreeSet::new();

    let section = match section_lines(text, marker) {
        Some(section) => section,
        None => return (operations, names),
    };

    for line in section {
        for capture in BACKTICK_SPAN.captures_iter(line) {
            let operation = match parse_declaration(&capture[1]) {
                Some(operation) => operation,
                None => continue,
            };

            for parameter in &operation.parameter_types {
                parameter.collect_names(&mut names);
            }
            operation.return_type.collect_names(&mut names);

            if operations.contains_key(&operation.name) {
                debug!("operation `{}` redeclared, keeping the later declaration", operation.name);
            }
            operations.insert(operation.name.clone(), operation);
        }
    }

    (operations, names)
}
