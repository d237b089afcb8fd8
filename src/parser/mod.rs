//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module transforms the token stream of a lambda block into a list of
//! statements. It uses a Pratt parser for expressions with proper operator
//! precedence and handles:
//!
//! - Function definitions with decorators, annotations and defaults
//! - Assignments, returns and `if`/`elif`/`else` chains
//! - Statements outside the composition grammar, which are recognised and
//!   skipped so the validator can report them
//! - Indented suites and single-line suites
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
