//! Error types for the verifier.
//!
//! This module defines the errors used throughout the pipeline:
//!
//! - Positioned lexing and parsing errors for lambda blocks
//! - Error names and suggestions used when a block is rejected
//! - Run-level failures (discovery, I/O, launching the checker)

pub mod errors;
