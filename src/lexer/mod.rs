//! Lexical analysis of lambda blocks.
//!
//! This module contains the lexer (tokenizer) that converts the code of a
//! lambda representation into a stream of tokens for parsing. It handles:
//!
//! - Tokenization using an ordered table of anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Indentation tracking (`Indent`/`Dedent`) and logical line ends
//! - Token position tracking (line and column) for violation reporting

pub mod lexer;
pub mod tokens;
