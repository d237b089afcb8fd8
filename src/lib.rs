#![allow(clippy::module_inception)]

//! Static verifier for lambda representations.
//!
//! Documentation notes declare typed grid operations in an informal arrow
//! notation and compose them in a fenced "lambda representation" block. This
//! crate checks that the composition only uses a pure subset of expression
//! forms, synthesizes a typed stub module per note and hands the batch to an
//! external static type checker.

use std::{fmt::Display, rc::Rc};

pub mod ast;
pub mod checker;
pub mod config;
pub mod document;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod purity;
pub mod signatures;
pub mod stub;
pub mod verifier;

extern crate regex;

/// A location inside a lambda block. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: u32, column: u32, file: &Rc<String>) -> Self {
        Position {
            line,
            column,
            file: Rc::clone(file),
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// The line the construct starts on.
    pub fn line(&self) -> u32 {
        self.start.line
    }

    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}
