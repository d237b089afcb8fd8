//! Purity validation for lambda blocks.
//!
//! A block is accepted when its top level holds only undecorated function
//! definitions whose bodies are built from:
//!
//! - helper definitions containing only assignments and returns
//! - single-target assignments to a name or a tuple/list of names
//! - guard chains: `if` branches holding exactly one `return`, continued by
//!   an `else` that is another guard or a single `return`
//! - returns
//!
//! Every assigned or returned value must be a pure expression. Guard tests
//! are not constrained.
//! Violations are collected rather than raised, so one pass reports every
//! offending construct.

use std::fmt::Display;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::ExprKind,
        statements::{FunctionDef, StmtKind},
    },
    parser::parser::parse_source,
};

/// One rejected construct, located by its line inside the lambda block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub source: String,
    pub line: u32,
    pub message: String,
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.source, self.line, self.message)
    }
}

/// Validates `code` and returns every violation found, in source order.
///
/// Code that cannot be tokenized or parsed yields a single violation at the
/// line of the error.
pub fn validate_purity(code: &str, source: &str) -> Vec<Violation> {
    let mut validator = Validator::new(source);

    match parse_source(code, source) {
        Ok(body) => validator.check_module(&body),
        Err(error) => validator.report(
            error.get_position().line,
            format!("unable to parse lambda representation: {}", error),
        ),
    }

    validator.violations
}

/// Returns the first sub-expression of `expr` that breaks the pure grammar.
pub fn find_impure(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Name { .. } | ExprKind::Constant(_) => None,
        ExprKind::Tuple { elements } => elements.iter().find_map(find_impure),
        ExprKind::Call {
            callee,
            arguments,
            keywords,
        } => find_impure(callee)
            .or_else(|| arguments.iter().find_map(find_impure))
            .or_else(|| keywords.iter().find_map(|keyword| find_impure(&keyword.value))),
        ExprKind::Attribute { value, .. } => find_impure(value),
        ExprKind::Binary {
            left,
            operator,
            right,
        } => {
            if !operator.is_arithmetic() {
                return Some(expr);
            }
            find_impure(left).or_else(|| find_impure(right))
        }
        ExprKind::Compare {
            left, comparators, ..
        } => find_impure(left).or_else(|| comparators.iter().find_map(find_impure)),
        ExprKind::Boolean { values, .. } => values.iter().find_map(find_impure),
        ExprKind::Subscript { value, index } => find_impure(value).or_else(|| find_impure(index)),
        ExprKind::Slice { lower, upper, step } => [lower, upper, step]
            .into_iter()
            .flatten()
            .find_map(|part| find_impure(part)),
        ExprKind::Unary { operand, .. } => find_impure(operand),
        ExprKind::ListComp {
            element,
            generators,
        }
        | ExprKind::GeneratorExp {
            element,
            generators,
        } => {
            if generators.iter().any(|generator| generator.is_async) {
                return Some(expr);
            }
            find_impure(element).or_else(|| {
                generators.iter().find_map(|generator| {
                    find_impure(&generator.iter)
                        .or_else(|| generator.ifs.iter().find_map(find_impure))
                })
            })
        }
        ExprKind::Lambda { parameters, body } => {
            let plain = parameters
                .iter()
                .all(|parameter| parameter.default.is_none() && !parameter.is_variadic());
            if !plain {
                return Some(expr);
            }
            find_impure(body)
        }
        _ => Some(expr),
    }
}

/// Explains why `expr`, as returned by `find_impure`, was rejected.
fn describe_impure(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Binary { operator, .. } => {
            format!("operator `{}` is not allowed", operator.symbol())
        }
        ExprKind::ListComp { .. } | ExprKind::GeneratorExp { .. } => {
            String::from("asynchronous comprehension is not allowed")
        }
        ExprKind::Lambda { .. } => {
            String::from("lambda parameters must not have defaults or be variadic")
        }
        _ => format!("{} is not allowed", expr.get_expr_type()),
    }
}

fn is_name(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Name { .. })
}

fn is_valid_target(target: &Expr) -> bool {
    match &target.kind {
        ExprKind::Name { .. } => true,
        ExprKind::Tuple { elements } | ExprKind::List { elements } => {
            !elements.is_empty() && elements.iter().all(is_name)
        }
        _ => false,
    }
}

struct Validator<'a> {
    source: &'a str,
    violations: Vec<Violation>,
}

impl<'a> Validator<'a> {
    fn new(source: &'a str) -> Self {
        Validator {
            source,
            violations: vec![],
        }
    }

    fn report(&mut self, line: u32, message: String) {
        self.violations.push(Violation {
            source: self.source.to_string(),
            line,
            message,
        });
    }

    fn check_pure(&mut self, expr: &Expr) {
        if let Some(impure) = find_impure(expr) {
            self.report(
                impure.span.line(),
                format!("impure expression: {}", describe_impure(impure)),
            );
        }
    }

    fn check_module(&mut self, body: &[Stmt]) {
        for stmt in body {
            match &stmt.kind {
                StmtKind::FunctionDef(def) if !def.is_async => self.check_function(stmt, def),
                _ => self.report(
                    stmt.line(),
                    format!("disallowed top-level statement: {}", stmt.get_stmt_type()),
                ),
            }
        }
    }

    fn check_decorators(&mut self, stmt: &Stmt, def: &FunctionDef) {
        if !def.decorators.is_empty() {
            self.report(
                stmt.line(),
                format!("function `{}` must not be decorated", def.name),
            );
        }
    }

    fn check_function(&mut self, stmt: &Stmt, def: &FunctionDef) {
        self.check_decorators(stmt, def);

        for stmt in &def.body {
            match &stmt.kind {
                StmtKind::FunctionDef(helper) if !helper.is_async => self.check_helper(stmt, helper),
                StmtKind::Assign { targets, value } => self.check_assign(stmt, targets, value),
                StmtKind::If { body, orelse, .. } => self.check_guard(stmt, body, orelse),
                StmtKind::Return { value } => self.check_return(value),
                _ => self.report(
                    stmt.line(),
                    format!("disallowed statement type: {}", stmt.get_stmt_type()),
                ),
            }
        }
    }

    fn check_helper(&mut self, stmt: &Stmt, helper: &FunctionDef) {
        self.check_decorators(stmt, helper);

        for stmt in &helper.body {
            match &stmt.kind {
                StmtKind::Assign { targets, value } => self.check_assign(stmt, targets, value),
                StmtKind::Return { value } => self.check_return(value),
                _ => self.report(
                    stmt.line(),
                    format!(
                        "disallowed statement type in helper `{}`: {}",
                        helper.name,
                        stmt.get_stmt_type()
                    ),
                ),
            }
        }
    }

    fn check_assign(&mut self, stmt: &Stmt, targets: &[Expr], value: &Expr) {
        match targets {
            [target] if is_valid_target(target) => {}
            [_] => self.report(
                stmt.line(),
                String::from("assignment target must be a name or a tuple of names"),
            ),
            _ => self.report(
                stmt.line(),
                String::from("assignment must have exactly one target"),
            ),
        }

        self.check_pure(value);
    }

    fn check_return(&mut self, value: &Option<Expr>) {
        if let Some(value) = value {
            self.check_pure(value);
        }
    }

    /// A guard branch is exactly one `return`.
    fn check_guard_branch(&mut self, line: u32, branch: &[Stmt], message: &str) {
        match branch {
            [Stmt {
                kind: StmtKind::Return { value },
                ..
            }] => self.check_return(value),
            _ => self.report(line, String::from(message)),
        }
    }

    /// Only the branches are constrained; the test may be any expression.
    fn check_guard(&mut self, stmt: &Stmt, body: &[Stmt], orelse: &[Stmt]) {
        self.check_guard_branch(
            stmt.line(),
            body,
            "guard branch must be exactly one return statement",
        );

        match orelse {
            [] => {}
            [nested] if matches!(nested.kind, StmtKind::If { .. }) => {
                if let StmtKind::If { body, orelse, .. } = &nested.kind {
                    self.check_guard(nested, body, orelse);
                }
            }
            [first, ..] => self.check_guard_branch(
                first.line(),
                orelse,
                "else branch must be a single guard or exactly one return statement",
            ),
        }
    }
}
