//! Unit tests for the purity validator.
//!
//! Accepted blocks must produce no violations; rejected blocks must name
//! the offending construct and cite its line within the block.

use crate::parser::parser::parse_source;

use super::purity::{find_impure, validate_purity, Violation};

fn violations(code: &str) -> Vec<Violation> {
    validate_purity(code, "notes.md")
}

fn accepts(code: &str) {
    let found = violations(code);
    assert!(found.is_empty(), "unexpected violations: {:?}", found);
}

fn single(code: &str) -> Violation {
    let found = violations(code);
    assert_eq!(found.len(), 1, "violations: {:?}", found);
    found[0].clone()
}

#[test]
fn test_accepts_assignments_then_return() {
    accepts("def solve(g):\n    a = move(g)\n    b, c = split(a)\n    [d, e] = pair(b)\n    return join(c, d, e)\n");
}

#[test]
fn test_accepts_empty_block() {
    accepts("");
}

#[test]
fn test_accepts_helpers() {
    accepts("def solve(g):\n    def step(x):\n        y = move(x)\n        return y\n    return step(g)\n");
}

#[test]
fn test_accepts_guard_chains() {
    accepts("def solve(g):\n    if empty(g):\n        return g\n    elif wide(g):\n        return shrink(g)\n    else:\n        return move(g)\n");
    accepts("def solve(g):\n    if empty(g):\n        return g\n    else:\n        if wide(g):\n            return shrink(g)\n        else:\n            return g\n");
    accepts("def solve(g):\n    if empty(g):\n        return\n    return g\n");
}

#[test]
fn test_accepts_pure_expressions() {
    let expressions = [
        "g",
        "1",
        "'text'",
        "None",
        "(g, 1)",
        "f(g, k=1, **opts)",
        "g.rows[0]",
        "g[1:-1, ::2]",
        "a + b - c * d / e",
        "-a",
        "not a",
        "a < b <= c",
        "a in b and c is not None or d",
        "[cell for row in g if row for cell in row if cell]",
        "sum(v for v in values(g))",
        "lambda a, b: a + b",
        "fold_repaint(g, items(g), lambda acc, item: paint(acc, item))",
    ];

    for expression in expressions {
        accepts(&format!("def solve(g):\n    return {}\n", expression));
    }
}

#[test]
fn test_rejects_impure_expressions() {
    let cases = [
        ("[a, b]", "list display"),
        ("{a, b}", "set display"),
        ("{a: b}", "dict display"),
        ("a if b else c", "conditional expression"),
        ("f'{a}'", "formatted string"),
        ("f(*args)", "starred expression"),
        ("(y := g)", "assignment expression"),
        ("await g", "await"),
        ("(yield g)", "yield"),
        ("{v for v in g}", "set comprehension"),
        ("{k: v for k, v in g}", "dict comprehension"),
        ("a % b", "operator `%`"),
        ("a ** b", "operator `**`"),
        ("a | b", "operator `|`"),
        ("[v async for v in g]", "asynchronous comprehension"),
        ("lambda a=1: a", "lambda parameters"),
        ("lambda *a: a", "lambda parameters"),
    ];

    for (expression, expected) in cases {
        let found = single(&format!("def solve(g):\n    return {}\n", expression));
        assert_eq!(found.line, 2, "expression: {}", expression);
        assert!(
            found.message.starts_with("impure expression: ") && found.message.contains(expected),
            "expression {} gave {:?}",
            expression,
            found.message
        );
    }
}

#[test]
fn test_rejects_nested_impurity() {
    let found = single("def solve(g):\n    return move(g, [g])\n");
    assert!(found.message.contains("list display"));

    let found = single("def solve(g):\n    return [f(x) for x in g if x % 2]\n");
    assert!(found.message.contains("operator `%`"));

    let found = single("def solve(g):\n    return lambda x: [x]\n");
    assert!(found.message.contains("list display"));
}

#[test]
fn test_rejects_for_loop_with_line() {
    let found = single("def solve(g):\n    a = move(g)\n    for row in a:\n        a = paint(row)\n    return a\n");

    assert_eq!(found.line, 3);
    assert_eq!(found.message, "disallowed statement type: for loop");
}

#[test]
fn test_rejects_augmented_assignment() {
    let found = single("def f(g):\n    g.counter += 1\n    return g\n");

    assert_eq!(found.line, 2);
    assert_eq!(found.message, "disallowed statement type: augmented assignment");
    assert_eq!(found.to_string(), "notes.md:2: disallowed statement type: augmented assignment");
}

#[test]
fn test_rejects_disallowed_statements() {
    let statements = [
        ("while g:\n        g = shrink(g)", "while loop"),
        ("try:\n        g = move(g)\n    except Exception:\n        pass", "try statement"),
        ("with open(g) as h:\n        g = h", "with statement"),
        ("import os", "import"),
        ("global g", "global declaration"),
        ("nonlocal g", "nonlocal declaration"),
        ("pass", "pass"),
        ("raise ValueError(g)", "raise statement"),
        ("assert g", "assert statement"),
        ("del g", "del statement"),
        ("print(g)", "expression statement"),
        ("x: int = 1", "annotated assignment"),
        ("class Box:\n        pass", "class definition"),
        ("async def helper(x):\n        return x", "async function definition"),
    ];

    for (statement, expected) in statements {
        let found = single(&format!("def solve(g):\n    {}\n    return g\n", statement));
        assert_eq!(found.line, 2, "statement: {}", statement);
        assert_eq!(found.message, format!("disallowed statement type: {}", expected));
    }
}

#[test]
fn test_rejects_assignment_shapes() {
    let found = single("def solve(g):\n    a = b = g\n    return a\n");
    assert_eq!(found.message, "assignment must have exactly one target");

    let found = single("def solve(g):\n    g.rows = 1\n    return g\n");
    assert_eq!(found.message, "assignment target must be a name or a tuple of names");

    let found = single("def solve(g):\n    a, g.x = pair(g)\n    return a\n");
    assert_eq!(found.message, "assignment target must be a name or a tuple of names");

    let found = single("def solve(g):\n    g[0] = 1\n    return g\n");
    assert_eq!(found.line, 2);
}

#[test]
fn test_rejects_top_level_statements() {
    let found = violations("import os\nx = 1\ndef solve(g):\n    return g\nasync def other(g):\n    return g\n");
    let messages: Vec<(u32, &str)> = found
        .iter()
        .map(|v| (v.line, v.message.as_str()))
        .collect();

    assert_eq!(
        messages,
        vec![
            (1, "disallowed top-level statement: import"),
            (2, "disallowed top-level statement: assignment"),
            (5, "disallowed top-level statement: async function definition"),
        ]
    );
}

#[test]
fn test_rejects_decorators() {
    let found = single("@cache\ndef solve(g):\n    return g\n");
    assert_eq!(found.line, 1);
    assert_eq!(found.message, "function `solve` must not be decorated");

    let found = single("def solve(g):\n    @cache\n    def step(x):\n        return x\n    return step(g)\n");
    assert_eq!(found.message, "function `step` must not be decorated");
}

#[test]
fn test_rejects_helper_statements() {
    let found = single("def solve(g):\n    def step(x):\n        if x:\n            return x\n        return g\n    return step(g)\n");

    assert_eq!(found.line, 3);
    assert_eq!(found.message, "disallowed statement type in helper `step`: if statement");
}

#[test]
fn test_rejects_guard_with_two_statements() {
    let found = single("def solve(g):\n    if empty(g):\n        a = move(g)\n        return a\n    return g\n");

    assert_eq!(found.line, 2);
    assert_eq!(found.message, "guard branch must be exactly one return statement");
}

#[test]
fn test_rejects_guard_without_return() {
    let found = single("def solve(g):\n    if empty(g):\n        a = move(g)\n    return g\n");

    assert_eq!(found.line, 2);
}

#[test]
fn test_rejects_bad_else_branch() {
    let found = single("def solve(g):\n    if empty(g):\n        return g\n    else:\n        a = move(g)\n        return a\n");
    assert_eq!(found.line, 5);
    assert_eq!(found.message, "else branch must be a single guard or exactly one return statement");

    let found = single("def solve(g):\n    if empty(g):\n        return g\n    elif wide(g):\n        a = g\n    return g\n");
    assert_eq!(found.line, 4);
    assert_eq!(found.message, "guard branch must be exactly one return statement");
}

#[test]
fn test_rejects_impure_guard_values() {
    let found = single("def solve(g):\n    if empty(g):\n        return [g]\n    return g\n");
    assert_eq!(found.line, 3);

    let found = single("def solve(g):\n    if (h := g):\n        return [h]\n    return g\n");
    assert_eq!(found.line, 3);
    assert!(found.message.contains("list display"));
}

#[test]
fn test_accepts_any_guard_test() {
    accepts("def solve(g):\n    if len(g) % 2 == 0:\n        return g\n    return g\n");
    accepts("def solve(g):\n    if (n := len(g)):\n        return n\n    return g\n");
    accepts("def solve(g):\n    if empty(g):\n        return g\n    elif [g] if g else {g}:\n        return g\n    else:\n        return move(g)\n");
}

#[test]
fn test_accepts_lambda_parameter_markers() {
    accepts("def solve(g):\n    h = lambda *, x: x\n    return h\n");
    accepts("def solve(g):\n    h = lambda a, /: a\n    return h(g)\n");

    let found = single("def solve(g):\n    h = lambda **kw: kw\n    return h\n");
    assert_eq!(found.message, "impure expression: lambda parameters must not have defaults or be variadic");
}

#[test]
fn test_reports_every_violation_in_order() {
    let found = violations("def solve(g):\n    for x in g:\n        pass\n    g += 1\n    return [g]\n");
    let lines: Vec<u32> = found.iter().map(|v| v.line).collect();

    assert_eq!(lines, vec![2, 4, 5]);
}

#[test]
fn test_unparseable_block_is_one_violation() {
    let found = single("def solve(g):\n    return g +\n");
    assert_eq!(found.line, 2);
    assert!(found.message.starts_with("unable to parse lambda representation: "));

    let found = single("def solve(g):\n    return $g\n");
    assert!(found.message.contains("UnrecognisedToken"));
}

#[test]
fn test_find_impure_points_at_offender() {
    let body = parse_source("def f(g):\n    return move(g, {1})\n", "test.md").unwrap();
    let value = match &body[0].kind {
        crate::ast::statements::StmtKind::FunctionDef(def) => match &def.body[0].kind {
            crate::ast::statements::StmtKind::Return { value: Some(value) } => value.clone(),
            other => panic!("expected a return, got {:?}", other),
        },
        other => panic!("expected a function, got {:?}", other),
    };

    let impure = find_impure(&value).unwrap();
    assert_eq!(impure.get_expr_type().to_string(), "set display");
}
