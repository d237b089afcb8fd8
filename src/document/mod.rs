//! Documentation notes as verifier input.
//!
//! This module finds the note files to verify and reads the parts of a note
//! the pipeline cares about:
//!
//! - Markdown sections, delimited by headings outside fenced blocks
//! - The fenced lambda representation block and the identifiers it uses
//! - Recursive discovery of note files below directory arguments

pub mod document;
