/// AST (Abstract Syntax Tree) module
/// Contains the restricted syntax tree lambda blocks are parsed into
///
/// Submodules:
/// - ast: Expression and statement nodes with their type tags
/// - expressions: Expression variants, operators and helper nodes
/// - statements: Statement variants and function definitions
pub mod ast;
pub mod expressions;
pub mod statements;
