use crate::{
    ast::{
        ast::{Expr, Stmt, StmtType},
        statements::{FunctionDef, StmtKind},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{
        expr::{at_expr_start, augmented_operator, parse_expr, parse_expr_list, parse_parameters},
        lookups::BindingPower,
    },
    Span,
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();
    if let Some(handler) = handler {
        return handler(parser);
    }

    let stmt = parse_simple_stmt(parser)?;
    end_simple_stmt(parser)?;

    Ok(stmt)
}

/// Consumes the terminator of a simple statement.
///
/// Returns `true` when the logical line is over and `false` when another
/// simple statement follows a `;` on the same line.
pub fn end_simple_stmt(parser: &mut Parser) -> Result<bool, Error> {
    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            match parser.current_token_kind() {
                TokenKind::Newline => {
                    parser.advance();
                    Ok(true)
                }
                TokenKind::EOF | TokenKind::Dedent => Ok(true),
                _ => Ok(false),
            }
        }
        TokenKind::Newline => {
            parser.advance();
            Ok(true)
        }
        TokenKind::EOF | TokenKind::Dedent => Ok(true),
        _ => Err(parser.unexpected()),
    }
}

pub fn parse_simple_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let handler = parser
        .get_simple_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();
    if let Some(handler) = handler {
        return handler(parser);
    }

    let first = parse_expr_list(parser, BindingPower::Default)?;
    let start = first.span.clone();

    let kind = match parser.current_token_kind() {
        TokenKind::Assignment => {
            let mut targets = vec![first];
            let mut value;
            loop {
                parser.advance();
                value = parse_expr_list(parser, BindingPower::Default)?;
                if parser.current_token_kind() != TokenKind::Assignment {
                    break;
                }
                targets.push(value);
            }
            StmtKind::Assign { targets, value }
        }
        kind if kind.is_augmented_assignment() => {
            let operator = match augmented_operator(kind) {
                Some(operator) => operator,
                None => return Err(parser.unexpected()),
            };
            parser.advance();
            let value = parse_expr_list(parser, BindingPower::Default)?;
            StmtKind::AugAssign {
                target: first,
                operator,
                value,
            }
        }
        TokenKind::Colon => {
            parser.advance();
            let annotation = parse_expr(parser, BindingPower::Default)?;
            let value = if parser.current_token_kind() == TokenKind::Assignment {
                parser.advance();
                Some(parse_expr_list(parser, BindingPower::Default)?)
            } else {
                None
            };
            StmtKind::AnnAssign {
                target: first,
                annotation,
                value,
            }
        }
        _ => StmtKind::Expression { value: first },
    };

    Ok(Stmt::new(kind, parser.span_from(&start)))
}

/// Parses `: suite`, either an indented block or simple statements on the
/// same line.
pub fn parse_suite(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.expect(TokenKind::Colon)?;

    let mut body = vec![];

    if parser.current_token_kind() == TokenKind::Newline {
        parser.advance();
        parser.expect(TokenKind::Indent)?;
        while !matches!(
            parser.current_token_kind(),
            TokenKind::Dedent | TokenKind::EOF
        ) {
            body.push(parse_stmt(parser)?);
        }
        parser.expect(TokenKind::Dedent)?;
        return Ok(body);
    }

    loop {
        body.push(parse_simple_stmt(parser)?);
        if end_simple_stmt(parser)? {
            break;
        }
    }

    Ok(body)
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.clone();

    let value = if at_expr_start(parser) {
        Some(parse_expr_list(parser, BindingPower::Default)?)
    } else {
        None
    };

    Ok(Stmt::new(StmtKind::Return { value }, parser.span_from(&start)))
}

/// Simple statements outside the composition grammar. Their operands are
/// not parsed.
pub fn parse_skipped_simple_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();
    let stmt_type = match start_token.kind {
        TokenKind::Pass => StmtType::Pass,
        TokenKind::Break => StmtType::Break,
        TokenKind::Continue => StmtType::Continue,
        TokenKind::Global => StmtType::Global,
        TokenKind::Nonlocal => StmtType::Nonlocal,
        TokenKind::Raise => StmtType::Raise,
        TokenKind::Del => StmtType::Delete,
        TokenKind::Assert => StmtType::Assert,
        _ => StmtType::Import,
    };

    while !matches!(
        parser.current_token_kind(),
        TokenKind::Newline | TokenKind::Semicolon | TokenKind::Dedent | TokenKind::EOF
    ) {
        parser.advance();
    }

    Ok(Stmt::new(
        StmtKind::Other(stmt_type),
        parser.span_from(&start_token.span),
    ))
}

fn parse_function(
    parser: &mut Parser,
    start: Span,
    decorators: Vec<Expr>,
    is_async: bool,
) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Def)?;
    let name = parser.expect(TokenKind::Identifier)?.value;

    parser.expect(TokenKind::OpenParen)?;
    let parameters = parse_parameters(parser, TokenKind::CloseParen, true)?;
    parser.expect(TokenKind::CloseParen)?;

    let returns = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let body = parse_suite(parser)?;

    Ok(Stmt::new(
        StmtKind::FunctionDef(FunctionDef {
            name,
            parameters,
            returns,
            decorators,
            body,
            is_async,
        }),
        parser.span_from(&start),
    ))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span.clone();
    parse_function(parser, start, vec![], false)
}

pub fn parse_decorated_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span.clone();

    let mut decorators = vec![];
    while parser.current_token_kind() == TokenKind::At {
        parser.advance();
        decorators.push(parse_expr(parser, BindingPower::Default)?);
        parser.expect(TokenKind::Newline)?;
    }

    match parser.current_token_kind() {
        TokenKind::Def => parse_function(parser, start, decorators, false),
        TokenKind::Async => {
            parser.advance();
            parse_function(parser, start, decorators, true)
        }
        TokenKind::Class => {
            skip_compound(parser)?;
            Ok(Stmt::new(
                StmtKind::Other(StmtType::ClassDef),
                parser.span_from(&start),
            ))
        }
        _ => Err(parser.unexpected_detailed("expected a function or class after decorators")),
    }
}

pub fn parse_async_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span.clone();

    let stmt_type = match parser.peek_kind(1) {
        TokenKind::Def => {
            parser.advance();
            return parse_function(parser, start, vec![], true);
        }
        TokenKind::For => StmtType::AsyncFor,
        TokenKind::With => StmtType::AsyncWith,
        _ => {
            parser.advance();
            return Err(parser.unexpected());
        }
    };

    parser.advance();
    skip_compound(parser)?;

    Ok(Stmt::new(StmtKind::Other(stmt_type), parser.span_from(&start)))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    // Also entered on `elif`, which becomes a nested `if` in `orelse`.
    let start = parser.advance().span.clone();

    let test = parse_expr(parser, BindingPower::Default)?;
    let body = parse_suite(parser)?;

    let orelse = match parser.current_token_kind() {
        TokenKind::Elif => vec![parse_if_stmt(parser)?],
        TokenKind::Else => {
            parser.advance();
            parse_suite(parser)?
        }
        _ => vec![],
    };

    Ok(Stmt::new(
        StmtKind::If { test, body, orelse },
        parser.span_from(&start),
    ))
}

pub fn parse_skipped_compound_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span.clone();
    let stmt_type = match parser.current_token_kind() {
        TokenKind::For => StmtType::For,
        TokenKind::While => StmtType::While,
        TokenKind::Try => StmtType::Try,
        TokenKind::With => StmtType::With,
        _ => StmtType::ClassDef,
    };

    skip_compound(parser)?;

    Ok(Stmt::new(StmtKind::Other(stmt_type), parser.span_from(&start)))
}

/// Skips a compound statement together with its `else`, `elif`, `except`
/// and `finally` clauses.
fn skip_compound(parser: &mut Parser) -> Result<(), Error> {
    skip_clause(parser)?;
    while matches!(
        parser.current_token_kind(),
        TokenKind::Else | TokenKind::Elif | TokenKind::Except | TokenKind::Finally
    ) {
        skip_clause(parser)?;
    }

    Ok(())
}

/// Skips one clause: the header up to its colon, then the suite.
fn skip_clause(parser: &mut Parser) -> Result<(), Error> {
    let mut depth = 0usize;
    loop {
        let kind = parser.current_token_kind();
        match kind {
            TokenKind::EOF | TokenKind::Newline => return Err(parser.unexpected()),
            TokenKind::Colon if depth == 0 => break,
            _ if kind.opens_group() => depth += 1,
            _ if kind.closes_group() => depth = depth.saturating_sub(1),
            _ => {}
        }
        parser.advance();
    }
    parser.advance();

    if parser.current_token_kind() != TokenKind::Newline {
        while !matches!(
            parser.current_token_kind(),
            TokenKind::Newline | TokenKind::EOF
        ) {
            parser.advance();
        }
        if parser.current_token_kind() == TokenKind::Newline {
            parser.advance();
        }
        return Ok(());
    }

    parser.advance();
    parser.expect(TokenKind::Indent)?;

    let mut depth = 1usize;
    while depth > 0 {
        match parser.current_token_kind() {
            TokenKind::Indent => depth += 1,
            TokenKind::Dedent => depth -= 1,
            TokenKind::EOF => return Err(parser.unexpected()),
            _ => {}
        }
        parser.advance();
    }

    Ok(())
}
