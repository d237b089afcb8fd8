use super::{
    ast::{Expr, Stmt, StmtType},
    expressions::{BinaryOperator, Parameter},
};

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub returns: Option<Expr>,
    pub decorators: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    FunctionDef(FunctionDef),
    /// `a = b = value` keeps every target, in source order.
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    AugAssign {
        target: Expr,
        operator: BinaryOperator,
        value: Expr,
    },
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
    },
    Return {
        value: Option<Expr>,
    },
    /// `elif` is represented as a single nested `If` in `orelse`.
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    Expression {
        value: Expr,
    },
    /// A statement outside the composition grammar. Only its kind and
    /// location are kept; its contents are skipped by the parser.
    Other(StmtType),
}
