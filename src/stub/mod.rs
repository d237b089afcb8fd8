//! Stub module synthesis.
//!
//! Builds the typed module handed to the external checker: typing imports,
//! aliases for the type names a note mentions, the generic helpers
//! available to every composition, one raising stub per declared operation
//! and, last, the lambda block itself.

pub mod stub;
