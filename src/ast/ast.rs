use std::fmt::Display;

use crate::Span;

use super::{expressions::ExprKind, statements::StmtKind};

/// Statement Types
///
/// Every statement form the parser recognises, including the ones the purity
/// grammar rejects. Used to name statements in violation messages.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum StmtType {
    FunctionDef,
    AsyncFunctionDef,
    ClassDef,
    Return,
    Assign,
    AugAssign,
    AnnAssign,
    If,
    For,
    AsyncFor,
    While,
    With,
    AsyncWith,
    Try,
    Raise,
    Assert,
    Delete,
    Import,
    Global,
    Nonlocal,
    Pass,
    Break,
    Continue,
    Expression,
}

impl Display for StmtType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StmtType::FunctionDef => "function definition",
            StmtType::AsyncFunctionDef => "async function definition",
            StmtType::ClassDef => "class definition",
            StmtType::Return => "return",
            StmtType::Assign => "assignment",
            StmtType::AugAssign => "augmented assignment",
            StmtType::AnnAssign => "annotated assignment",
            StmtType::If => "if statement",
            StmtType::For => "for loop",
            StmtType::AsyncFor => "async for loop",
            StmtType::While => "while loop",
            StmtType::With => "with statement",
            StmtType::AsyncWith => "async with statement",
            StmtType::Try => "try statement",
            StmtType::Raise => "raise statement",
            StmtType::Assert => "assert statement",
            StmtType::Delete => "del statement",
            StmtType::Import => "import",
            StmtType::Global => "global declaration",
            StmtType::Nonlocal => "nonlocal declaration",
            StmtType::Pass => "pass",
            StmtType::Break => "break",
            StmtType::Continue => "continue",
            StmtType::Expression => "expression statement",
        };
        write!(f, "{}", name)
    }
}

/// Expression Types
///
/// Defines the various kinds of expressions in the AST.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ExprType {
    Name,
    Constant,
    FormattedString,
    Tuple,
    List,
    Set,
    Dict,
    Call,
    Attribute,
    Binary,
    Unary,
    Boolean,
    Compare,
    Subscript,
    Slice,
    Conditional,
    Lambda,
    ListComp,
    GeneratorExp,
    SetComp,
    DictComp,
    Starred,
    NamedExpr,
    Await,
    Yield,
    YieldFrom,
}

impl Display for ExprType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExprType::Name => "name",
            ExprType::Constant => "constant",
            ExprType::FormattedString => "formatted string",
            ExprType::Tuple => "tuple",
            ExprType::List => "list display",
            ExprType::Set => "set display",
            ExprType::Dict => "dict display",
            ExprType::Call => "call",
            ExprType::Attribute => "attribute access",
            ExprType::Binary => "binary operation",
            ExprType::Unary => "unary operation",
            ExprType::Boolean => "boolean operation",
            ExprType::Compare => "comparison",
            ExprType::Subscript => "subscript",
            ExprType::Slice => "slice",
            ExprType::Conditional => "conditional expression",
            ExprType::Lambda => "lambda",
            ExprType::ListComp => "list comprehension",
            ExprType::GeneratorExp => "generator expression",
            ExprType::SetComp => "set comprehension",
            ExprType::DictComp => "dict comprehension",
            ExprType::Starred => "starred expression",
            ExprType::NamedExpr => "assignment expression",
            ExprType::Await => "await",
            ExprType::Yield => "yield",
            ExprType::YieldFrom => "yield from",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_expr_type(&self) -> ExprType {
        match &self.kind {
            ExprKind::Name { .. } => ExprType::Name,
            ExprKind::Constant(_) => ExprType::Constant,
            ExprKind::FormattedString => ExprType::FormattedString,
            ExprKind::Tuple { .. } => ExprType::Tuple,
            ExprKind::List { .. } => ExprType::List,
            ExprKind::Set { .. } => ExprType::Set,
            ExprKind::Dict { .. } => ExprType::Dict,
            ExprKind::Call { .. } => ExprType::Call,
            ExprKind::Attribute { .. } => ExprType::Attribute,
            ExprKind::Binary { .. } => ExprType::Binary,
            ExprKind::Unary { .. } => ExprType::Unary,
            ExprKind::Boolean { .. } => ExprType::Boolean,
            ExprKind::Compare { .. } => ExprType::Compare,
            ExprKind::Subscript { .. } => ExprType::Subscript,
            ExprKind::Slice { .. } => ExprType::Slice,
            ExprKind::Conditional { .. } => ExprType::Conditional,
            ExprKind::Lambda { .. } => ExprType::Lambda,
            ExprKind::ListComp { .. } => ExprType::ListComp,
            ExprKind::GeneratorExp { .. } => ExprType::GeneratorExp,
            ExprKind::SetComp { .. } => ExprType::SetComp,
            ExprKind::DictComp { .. } => ExprType::DictComp,
            ExprKind::Starred { .. } => ExprType::Starred,
            ExprKind::NamedExpr { .. } => ExprType::NamedExpr,
            ExprKind::Await { .. } => ExprType::Await,
            ExprKind::Yield { .. } => ExprType::Yield,
            ExprKind::YieldFrom { .. } => ExprType::YieldFrom,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    /// Line the statement starts on.
    pub fn line(&self) -> u32 {
        self.span.line()
    }

    pub fn get_stmt_type(&self) -> StmtType {
        match &self.kind {
            StmtKind::FunctionDef(def) if def.is_async => StmtType::AsyncFunctionDef,
            StmtKind::FunctionDef(_) => StmtType::FunctionDef,
            StmtKind::Assign { .. } => StmtType::Assign,
            StmtKind::AugAssign { .. } => StmtType::AugAssign,
            StmtKind::AnnAssign { .. } => StmtType::AnnAssign,
            StmtKind::Return { .. } => StmtType::Return,
            StmtKind::If { .. } => StmtType::If,
            StmtKind::Expression { .. } => StmtType::Expression,
            StmtKind::Other(stmt_type) => *stmt_type,
        }
    }
}
