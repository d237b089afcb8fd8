//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various constructs including:
//! - Function definitions
//! - Assignments and guard chains
//! - Expressions and operator precedence
//! - Skipped statements
//! - Error cases

use crate::ast::{
    ast::{ExprType, Stmt, StmtType},
    expressions::{BinaryOperator, BoolOperator, CompareOperator, ExprKind, ParameterKind},
    statements::{FunctionDef, StmtKind},
};

use super::parser::parse_source;

fn parse_ok(source: &str) -> Vec<Stmt> {
    parse_source(source, "test.md").unwrap()
}

fn single_function(source: &str) -> FunctionDef {
    let body = parse_ok(source);
    assert_eq!(body.len(), 1);
    match &body[0].kind {
        StmtKind::FunctionDef(def) => def.clone(),
        other => panic!("expected a function definition, got {:?}", other),
    }
}

fn return_value(source: &str) -> ExprKind {
    let def = single_function(&format!("def f(x):\n    return {}\n", source));
    match &def.body[0].kind {
        StmtKind::Return { value: Some(value) } => value.kind.clone(),
        other => panic!("expected a return, got {:?}", other),
    }
}

#[test]
fn test_parse_empty_source() {
    assert!(parse_ok("").is_empty());
    assert!(parse_ok("\n\n# only a comment\n").is_empty());
}

#[test]
fn test_parse_function_definition() {
    let def = single_function("def solve(grid: Grid, n=2) -> Grid:\n    return grid\n");

    assert_eq!(def.name, "solve");
    assert_eq!(def.parameters.len(), 2);
    assert!(def.parameters[0].annotation.is_some());
    assert!(def.parameters[1].default.is_some());
    assert!(def.returns.is_some());
    assert!(!def.is_async);
    assert!(def.decorators.is_empty());
    assert_eq!(def.body.len(), 1);
}

#[test]
fn test_parse_decorated_and_async_function() {
    let def = single_function("@cache\n@wraps(g)\ndef f(x):\n    return x\n");
    assert_eq!(def.decorators.len(), 2);

    let body = parse_ok("async def f(x):\n    return x\n");
    assert_eq!(body[0].get_stmt_type(), StmtType::AsyncFunctionDef);
}

#[test]
fn test_parse_variadic_parameters() {
    let def = single_function("def f(a, /, *args, b, **kwargs):\n    return a\n");
    let kinds: Vec<ParameterKind> = def.parameters.iter().map(|p| p.kind).collect();

    assert_eq!(
        kinds,
        vec![
            ParameterKind::Positional,
            ParameterKind::PositionalOnlyMarker,
            ParameterKind::VarArgs,
            ParameterKind::Positional,
            ParameterKind::VarKeyword,
        ]
    );
}

#[test]
fn test_parse_assignments() {
    let def = single_function("def f(x):\n    a = b = x\n    c, d = x\n    e += 1\n    g: int = 2\n    return a\n");
    let types: Vec<StmtType> = def.body.iter().map(|s| s.get_stmt_type()).collect();

    assert_eq!(
        types,
        vec![
            StmtType::Assign,
            StmtType::Assign,
            StmtType::AugAssign,
            StmtType::AnnAssign,
            StmtType::Return,
        ]
    );

    match &def.body[0].kind {
        StmtKind::Assign { targets, .. } => assert_eq!(targets.len(), 2),
        other => panic!("expected an assignment, got {:?}", other),
    }
    match &def.body[1].kind {
        StmtKind::Assign { targets, .. } => {
            assert_eq!(targets[0].get_expr_type(), ExprType::Tuple)
        }
        other => panic!("expected an assignment, got {:?}", other),
    }
    match &def.body[2].kind {
        StmtKind::AugAssign { operator, .. } => assert_eq!(*operator, BinaryOperator::Add),
        other => panic!("expected an augmented assignment, got {:?}", other),
    }
}

#[test]
fn test_parse_elif_chain_nests_in_orelse() {
    let def = single_function(
        "def f(x):\n    if x > 1:\n        return 1\n    elif x > 0:\n        return 2\n    else:\n        return 3\n",
    );

    let (body, orelse) = match &def.body[0].kind {
        StmtKind::If { body, orelse, .. } => (body, orelse),
        other => panic!("expected an if, got {:?}", other),
    };
    assert_eq!(body.len(), 1);
    assert_eq!(orelse.len(), 1);
    assert_eq!(orelse[0].line(), 4);

    match &orelse[0].kind {
        StmtKind::If { orelse, .. } => {
            assert_eq!(orelse.len(), 1);
            assert_eq!(orelse[0].get_stmt_type(), StmtType::Return);
        }
        other => panic!("expected a nested if, got {:?}", other),
    }
}

#[test]
fn test_parse_inline_suites() {
    let def = single_function("def f(x):\n    if x: return 1\n    else: return 2\n");

    match &def.body[0].kind {
        StmtKind::If { body, orelse, .. } => {
            assert_eq!(body.len(), 1);
            assert_eq!(orelse.len(), 1);
        }
        other => panic!("expected an if, got {:?}", other),
    }

    let def = single_function("def f(x): a = x; return a\n");
    assert_eq!(def.body.len(), 2);
}

#[test]
fn test_parse_skipped_statements() {
    let def = single_function(
        "def f(x):\n    for i in range(3):\n        x = x + i\n    else:\n        pass\n    while x:\n        break\n    try:\n        x = 1\n    except (ValueError, KeyError):\n        x = 2\n    finally:\n        pass\n    with open(x) as h: pass\n    import os\n    from os import path\n    del x\n    return x\n",
    );
    let types: Vec<StmtType> = def.body.iter().map(|s| s.get_stmt_type()).collect();

    assert_eq!(
        types,
        vec![
            StmtType::For,
            StmtType::While,
            StmtType::Try,
            StmtType::With,
            StmtType::Import,
            StmtType::Import,
            StmtType::Delete,
            StmtType::Return,
        ]
    );
    assert_eq!(def.body[1].line(), 6);
}

#[test]
fn test_parse_top_level_skipped_statements() {
    let body = parse_ok("import os\nclass A:\n    x = 1\n@dataclass\nclass B:\n    y: int\nasync def g():\n    return 1\n");
    let types: Vec<StmtType> = body.iter().map(|s| s.get_stmt_type()).collect();

    assert_eq!(
        types,
        vec![
            StmtType::Import,
            StmtType::ClassDef,
            StmtType::ClassDef,
            StmtType::AsyncFunctionDef,
        ]
    );
}

#[test]
fn test_parse_operator_precedence() {
    match return_value("a + b * c") {
        ExprKind::Binary {
            operator, right, ..
        } => {
            assert_eq!(operator, BinaryOperator::Add);
            assert_eq!(right.get_expr_type(), ExprType::Binary);
        }
        other => panic!("expected a binary operation, got {:?}", other),
    }

    match return_value("not a and b or c") {
        ExprKind::Boolean { operator, values } => {
            assert_eq!(operator, BoolOperator::Or);
            assert_eq!(values[0].get_expr_type(), ExprType::Boolean);
        }
        other => panic!("expected a boolean operation, got {:?}", other),
    }

    match return_value("-x ** 2") {
        ExprKind::Unary { operand, .. } => {
            assert_eq!(operand.get_expr_type(), ExprType::Binary)
        }
        other => panic!("expected a unary operation, got {:?}", other),
    }
}

#[test]
fn test_parse_chained_comparison() {
    match return_value("0 <= x < n is not None not in y") {
        ExprKind::Compare {
            operators,
            comparators,
            ..
        } => {
            assert_eq!(
                operators,
                vec![
                    CompareOperator::LtE,
                    CompareOperator::Lt,
                    CompareOperator::IsNot,
                    CompareOperator::NotIn,
                ]
            );
            assert_eq!(comparators.len(), 4);
        }
        other => panic!("expected a comparison, got {:?}", other),
    }
}

#[test]
fn test_parse_boolean_chain_is_flat() {
    match return_value("a and b and c") {
        ExprKind::Boolean { operator, values } => {
            assert_eq!(operator, BoolOperator::And);
            assert_eq!(values.len(), 3);
        }
        other => panic!("expected a boolean operation, got {:?}", other),
    }
}

#[test]
fn test_parse_expression_kinds() {
    let cases = [
        ("f(a, *b, k=1, **c)", ExprType::Call),
        ("g.rows", ExprType::Attribute),
        ("g[0]", ExprType::Subscript),
        ("(a, b)", ExprType::Tuple),
        ("()", ExprType::Tuple),
        ("a, b", ExprType::Tuple),
        ("(a)", ExprType::Name),
        ("[a, b]", ExprType::List),
        ("{a, b}", ExprType::Set),
        ("{a: b, **c}", ExprType::Dict),
        ("{}", ExprType::Dict),
        ("a if b else c", ExprType::Conditional),
        ("lambda a, b: a", ExprType::Lambda),
        ("[y for y in x if y]", ExprType::ListComp),
        ("(y for y in x)", ExprType::GeneratorExp),
        ("{y for y in x}", ExprType::SetComp),
        ("{y: 1 for y in x}", ExprType::DictComp),
        ("(y := x)", ExprType::NamedExpr),
        ("await x", ExprType::Await),
        ("(yield x)", ExprType::Yield),
        ("(yield from x)", ExprType::YieldFrom),
        ("f'{x}'", ExprType::FormattedString),
        ("'a' 'b'", ExprType::Constant),
        ("...", ExprType::Constant),
    ];

    for (source, expected) in cases {
        let def = single_function(&format!("def f(x):\n    return {}\n", source));
        match &def.body[0].kind {
            StmtKind::Return { value: Some(value) } => {
                assert_eq!(value.get_expr_type(), expected, "source: {}", source)
            }
            other => panic!("expected a return for {}, got {:?}", source, other),
        }
    }
}

#[test]
fn test_parse_slices() {
    match return_value("g[1:, ::2]") {
        ExprKind::Subscript { index, .. } => match index.kind {
            ExprKind::Tuple { elements } => {
                assert_eq!(elements.len(), 2);
                assert!(elements
                    .iter()
                    .all(|e| e.get_expr_type() == ExprType::Slice));
            }
            other => panic!("expected a tuple index, got {:?}", other),
        },
        other => panic!("expected a subscript, got {:?}", other),
    }
}

#[test]
fn test_parse_generator_argument() {
    match return_value("sum(v for v in x)") {
        ExprKind::Call { arguments, .. } => {
            assert_eq!(arguments[0].get_expr_type(), ExprType::GeneratorExp)
        }
        other => panic!("expected a call, got {:?}", other),
    }
}

#[test]
fn test_parse_async_comprehension() {
    match return_value("[y async for y in x]") {
        ExprKind::ListComp { generators, .. } => assert!(generators[0].is_async),
        other => panic!("expected a list comprehension, got {:?}", other),
    }
}

#[test]
fn test_parse_lambda_with_defaults() {
    match return_value("lambda a, b=1, *c: a") {
        ExprKind::Lambda { parameters, .. } => {
            assert_eq!(parameters.len(), 3);
            assert!(parameters[1].default.is_some());
            assert!(parameters[2].is_variadic());
        }
        other => panic!("expected a lambda, got {:?}", other),
    }

    match return_value("lambda a, /, *, b: a") {
        ExprKind::Lambda { parameters, .. } => {
            assert_eq!(parameters.len(), 4);
            assert!(parameters.iter().all(|parameter| !parameter.is_variadic()));
        }
        other => panic!("expected a lambda, got {:?}", other),
    }
}

#[test]
fn test_parse_statement_lines() {
    let def = single_function("def f(x):\n\n    a = x\n\n    # note\n    return a\n");

    assert_eq!(def.body[0].line(), 3);
    assert_eq!(def.body[1].line(), 6);
}

#[test]
fn test_parse_error_missing_colon() {
    let error = parse_source("def f(x)\n    return x\n", "test.md").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_position().line, 1);
}

#[test]
fn test_parse_error_unbalanced_brackets() {
    assert!(parse_source("def f(x):\n    return g(x\n", "test.md").is_err());
}

#[test]
fn test_parse_error_stray_else() {
    assert!(parse_source("else:\n    return 1\n", "test.md").is_err());
}

#[test]
fn test_parse_error_detailed_not() {
    let error = parse_source("def f(x):\n    return a not b\n", "test.md").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}
