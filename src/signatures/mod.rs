/// Signatures module
/// Reads typed operation declarations out of a document's signature section
///
/// Submodules:
/// - types: The `TypeExpr` tree and the normalizer for informal type notation
/// - signatures: The declaration scanner producing `TypedOperation`s
pub mod signatures;
pub mod types;
