use crate::{
    ast::{
        ast::Expr,
        expressions::{
            BinaryOperator, BoolOperator, CompareOperator, Comprehension, Constant, ExprKind,
            Keyword, Parameter, ParameterKind, UnaryOperator,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while parser.binding_power(parser.current_token_kind()) > bp {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };

        left = led(parser, left, parser.binding_power(token_kind))?;
    }

    Ok(left)
}

/// Whether the current token can begin an expression.
pub fn at_expr_start(parser: &Parser) -> bool {
    parser
        .get_nud_lookup()
        .contains_key(&parser.current_token_kind())
}

/// Parses `expr (, expr)* [,]`, producing a tuple when a comma is present.
pub fn parse_expr_list(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    let first = parse_expr(parser, bp)?;
    if parser.current_token_kind() != TokenKind::Comma {
        return Ok(first);
    }

    let start = first.span.clone();
    let mut elements = vec![first];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        if !at_expr_start(parser) {
            break;
        }
        elements.push(parse_expr(parser, bp)?);
    }

    Ok(Expr::new(ExprKind::Tuple { elements }, parser.span_from(&start)))
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    let kind = match token.kind {
        TokenKind::Identifier => ExprKind::Name { id: token.value },
        TokenKind::Number => ExprKind::Constant(Constant::Number(token.value)),
        TokenKind::True => ExprKind::Constant(Constant::Bool(true)),
        TokenKind::False => ExprKind::Constant(Constant::Bool(false)),
        TokenKind::None => ExprKind::Constant(Constant::None),
        TokenKind::Ellipsis => ExprKind::Constant(Constant::Ellipsis),
        TokenKind::String | TokenKind::FormattedString => {
            // Adjacent literals concatenate; any f-string makes the whole
            // literal formatted.
            let mut formatted = token.kind == TokenKind::FormattedString;
            let mut text = token.value;
            while matches!(
                parser.current_token_kind(),
                TokenKind::String | TokenKind::FormattedString
            ) {
                let next = parser.advance().clone();
                formatted |= next.kind == TokenKind::FormattedString;
                text.push(' ');
                text.push_str(&next.value);
            }

            if formatted {
                ExprKind::FormattedString
            } else {
                ExprKind::Constant(Constant::Str(text))
            }
        }
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    Ok(Expr::new(kind, parser.span_from(&token.span)))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    Some(match kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Dash => BinaryOperator::Sub,
        TokenKind::Star => BinaryOperator::Mult,
        TokenKind::Slash => BinaryOperator::Div,
        TokenKind::DoubleSlash => BinaryOperator::FloorDiv,
        TokenKind::Percent => BinaryOperator::Mod,
        TokenKind::DoubleStar => BinaryOperator::Pow,
        TokenKind::At => BinaryOperator::MatMult,
        TokenKind::Pipe => BinaryOperator::BitOr,
        TokenKind::Caret => BinaryOperator::BitXor,
        TokenKind::Ampersand => BinaryOperator::BitAnd,
        TokenKind::ShiftLeft => BinaryOperator::LShift,
        TokenKind::ShiftRight => BinaryOperator::RShift,
        _ => return None,
    })
}

/// Operator of an augmented assignment token such as `+=`.
pub fn augmented_operator(kind: TokenKind) -> Option<BinaryOperator> {
    Some(match kind {
        TokenKind::PlusEquals => BinaryOperator::Add,
        TokenKind::MinusEquals => BinaryOperator::Sub,
        TokenKind::StarEquals => BinaryOperator::Mult,
        TokenKind::SlashEquals => BinaryOperator::Div,
        TokenKind::DoubleSlashEquals => BinaryOperator::FloorDiv,
        TokenKind::PercentEquals => BinaryOperator::Mod,
        TokenKind::DoubleStarEquals => BinaryOperator::Pow,
        TokenKind::AtEquals => BinaryOperator::MatMult,
        TokenKind::PipeEquals => BinaryOperator::BitOr,
        TokenKind::CaretEquals => BinaryOperator::BitXor,
        TokenKind::AmpersandEquals => BinaryOperator::BitAnd,
        TokenKind::ShiftLeftEquals => BinaryOperator::LShift,
        TokenKind::ShiftRightEquals => BinaryOperator::RShift,
        _ => return None,
    })
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator = match binary_operator(parser.current_token_kind()) {
        Some(operator) => operator,
        None => return Err(parser.unexpected()),
    };
    parser.advance();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::new(
        ExprKind::Binary {
            left: Box::new(left.clone()),
            operator,
            right: Box::new(right),
        },
        parser.span_from(&left.span),
    ))
}

pub fn parse_power_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    // Right associative, and the exponent may carry a sign.
    let right = parse_expr(parser, BindingPower::Multiplicative)?;

    Ok(Expr::new(
        ExprKind::Binary {
            left: Box::new(left.clone()),
            operator: BinaryOperator::Pow,
            right: Box::new(right),
        },
        parser.span_from(&left.span),
    ))
}

pub fn parse_boolean_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator = if parser.advance().kind == TokenKind::And {
        BoolOperator::And
    } else {
        BoolOperator::Or
    };

    let right = parse_expr(parser, bp)?;
    let span = parser.span_from(&left.span);

    let values = match left.kind {
        ExprKind::Boolean {
            operator: previous,
            mut values,
        } if previous == operator => {
            values.push(right);
            values
        }
        _ => vec![left, right],
    };

    Ok(Expr::new(ExprKind::Boolean { operator, values }, span))
}

fn compare_operator(parser: &mut Parser) -> Result<CompareOperator, Error> {
    let operator = match parser.current_token_kind() {
        TokenKind::Less => CompareOperator::Lt,
        TokenKind::LessEquals => CompareOperator::LtE,
        TokenKind::Greater => CompareOperator::Gt,
        TokenKind::GreaterEquals => CompareOperator::GtE,
        TokenKind::Equals => CompareOperator::Eq,
        TokenKind::NotEquals => CompareOperator::NotEq,
        TokenKind::In => CompareOperator::In,
        TokenKind::Not => {
            parser.advance();
            if parser.current_token_kind() != TokenKind::In {
                return Err(parser.unexpected_detailed("expected `in` after `not`"));
            }
            CompareOperator::NotIn
        }
        TokenKind::Is => {
            if parser.peek_kind(1) == TokenKind::Not {
                parser.advance();
                CompareOperator::IsNot
            } else {
                CompareOperator::Is
            }
        }
        _ => return Err(parser.unexpected()),
    };
    parser.advance();

    Ok(operator)
}

pub fn parse_compare_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let mut operators = vec![];
    let mut comparators = vec![];

    loop {
        operators.push(compare_operator(parser)?);
        comparators.push(parse_expr(parser, bp)?);

        if parser.binding_power(parser.current_token_kind()) != BindingPower::Relational {
            break;
        }
    }

    Ok(Expr::new(
        ExprKind::Compare {
            left: Box::new(left.clone()),
            operators,
            comparators,
        },
        parser.span_from(&left.span),
    ))
}

pub fn parse_conditional_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let test = parse_expr(parser, bp)?;
    parser.expect(TokenKind::Else)?;
    let orelse = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::new(
        ExprKind::Conditional {
            test: Box::new(test),
            body: Box::new(left.clone()),
            orelse: Box::new(orelse),
        },
        parser.span_from(&left.span),
    ))
}

pub fn parse_named_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    if !matches!(left.kind, ExprKind::Name { .. }) {
        return Err(parser.unexpected_detailed("assignment expression target must be a name"));
    }
    parser.advance();

    let value = parse_expr(parser, bp)?;

    Ok(Expr::new(
        ExprKind::NamedExpr {
            target: Box::new(left.clone()),
            value: Box::new(value),
        },
        parser.span_from(&left.span),
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let (operator, bp) = match operator_token.kind {
        TokenKind::Not => (UnaryOperator::Not, BindingPower::LogicalNot),
        TokenKind::Dash => (UnaryOperator::Negate, BindingPower::Unary),
        TokenKind::Plus => (UnaryOperator::Plus, BindingPower::Unary),
        _ => (UnaryOperator::Invert, BindingPower::Unary),
    };

    let operand = parse_expr(parser, bp)?;

    Ok(Expr::new(
        ExprKind::Unary {
            operator,
            operand: Box::new(operand),
        },
        parser.span_from(&operator_token.span),
    ))
}

pub fn parse_starred_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();
    let value = parse_expr(parser, BindingPower::Relational)?;

    Ok(Expr::new(
        ExprKind::Starred {
            value: Box::new(value),
        },
        parser.span_from(&start),
    ))
}

pub fn parse_await_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();
    let value = parse_expr(parser, BindingPower::Power)?;

    Ok(Expr::new(
        ExprKind::Await {
            value: Box::new(value),
        },
        parser.span_from(&start),
    ))
}

pub fn parse_yield_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    if parser.current_token_kind() == TokenKind::From {
        parser.advance();
        let value = parse_expr(parser, BindingPower::Default)?;
        return Ok(Expr::new(
            ExprKind::YieldFrom {
                value: Box::new(value),
            },
            parser.span_from(&start),
        ));
    }

    let value = if at_expr_start(parser) {
        Some(Box::new(parse_expr_list(parser, BindingPower::Default)?))
    } else {
        None
    };

    Ok(Expr::new(ExprKind::Yield { value }, parser.span_from(&start)))
}

/// Parses a parameter list up to (not including) `closing`.
///
/// Annotations are only read for `def` parameters; in a lambda the colon
/// ends the parameter list.
pub fn parse_parameters(
    parser: &mut Parser,
    closing: TokenKind,
    annotations: bool,
) -> Result<Vec<Parameter>, Error> {
    let mut parameters = vec![];

    while parser.current_token_kind() != closing {
        let (name, kind) = match parser.current_token_kind() {
            TokenKind::Star => {
                parser.advance();
                if parser.current_token_kind() == TokenKind::Identifier {
                    (parser.advance().value.clone(), ParameterKind::VarArgs)
                } else {
                    (String::new(), ParameterKind::KeywordOnlyMarker)
                }
            }
            TokenKind::DoubleStar => {
                parser.advance();
                (
                    parser.expect(TokenKind::Identifier)?.value,
                    ParameterKind::VarKeyword,
                )
            }
            TokenKind::Slash => {
                parser.advance();
                (String::new(), ParameterKind::PositionalOnlyMarker)
            }
            TokenKind::Identifier => (parser.advance().value.clone(), ParameterKind::Positional),
            _ => return Err(parser.unexpected_detailed("expected parameter name")),
        };

        let annotation = if annotations && parser.current_token_kind() == TokenKind::Colon {
            parser.advance();
            Some(parse_expr(parser, BindingPower::Default)?)
        } else {
            None
        };

        let default = if parser.current_token_kind() == TokenKind::Assignment {
            parser.advance();
            Some(parse_expr(parser, BindingPower::Default)?)
        } else {
            None
        };

        parameters.push(Parameter {
            name,
            kind,
            annotation,
            default,
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    Ok(parameters)
}

pub fn parse_lambda_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    let parameters = parse_parameters(parser, TokenKind::Colon, false)?;
    parser.expect(TokenKind::Colon)?;
    let body = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::new(
        ExprKind::Lambda {
            parameters,
            body: Box::new(body),
        },
        parser.span_from(&start),
    ))
}

fn at_comprehension(parser: &Parser) -> bool {
    match parser.current_token_kind() {
        TokenKind::For => true,
        TokenKind::Async => parser.peek_kind(1) == TokenKind::For,
        _ => false,
    }
}

/// Parses one or more `[async] for target in iter [if cond]*` clauses.
pub fn parse_comprehension_clauses(parser: &mut Parser) -> Result<Vec<Comprehension>, Error> {
    let mut generators = vec![];

    while at_comprehension(parser) {
        let is_async = parser.current_token_kind() == TokenKind::Async;
        if is_async {
            parser.advance();
        }
        parser.expect(TokenKind::For)?;

        // Targets stop before `in`; the iterable and filters stop before `if`.
        let target = parse_expr_list(parser, BindingPower::Relational)?;
        parser.expect(TokenKind::In)?;
        let iter = parse_expr(parser, BindingPower::Ternary)?;

        let mut ifs = vec![];
        while parser.current_token_kind() == TokenKind::If {
            parser.advance();
            ifs.push(parse_expr(parser, BindingPower::Ternary)?);
        }

        generators.push(Comprehension {
            target,
            iter,
            ifs,
            is_async,
        });
    }

    Ok(generators)
}

/// Parses comma separated elements up to `closing`, starting after `first`.
fn parse_elements(parser: &mut Parser, first: Expr, closing: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut elements = vec![first];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        if parser.current_token_kind() == closing {
            break;
        }
        elements.push(parse_expr(parser, BindingPower::Default)?);
    }
    parser.expect(closing)?;

    Ok(elements)
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    if parser.current_token_kind() == TokenKind::CloseParen {
        parser.advance();
        return Ok(Expr::new(
            ExprKind::Tuple { elements: vec![] },
            parser.span_from(&start),
        ));
    }

    let first = parse_expr(parser, BindingPower::Default)?;

    if at_comprehension(parser) {
        let generators = parse_comprehension_clauses(parser)?;
        parser.expect(TokenKind::CloseParen)?;
        return Ok(Expr::new(
            ExprKind::GeneratorExp {
                element: Box::new(first),
                generators,
            },
            parser.span_from(&start),
        ));
    }

    if parser.current_token_kind() == TokenKind::Comma {
        let elements = parse_elements(parser, first, TokenKind::CloseParen)?;
        return Ok(Expr::new(
            ExprKind::Tuple { elements },
            parser.span_from(&start),
        ));
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(first)
}

pub fn parse_list_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    if parser.current_token_kind() == TokenKind::CloseBracket {
        parser.advance();
        return Ok(Expr::new(
            ExprKind::List { elements: vec![] },
            parser.span_from(&start),
        ));
    }

    let first = parse_expr(parser, BindingPower::Default)?;

    if at_comprehension(parser) {
        let generators = parse_comprehension_clauses(parser)?;
        parser.expect(TokenKind::CloseBracket)?;
        return Ok(Expr::new(
            ExprKind::ListComp {
                element: Box::new(first),
                generators,
            },
            parser.span_from(&start),
        ));
    }

    let elements = parse_elements(parser, first, TokenKind::CloseBracket)?;
    Ok(Expr::new(ExprKind::List { elements }, parser.span_from(&start)))
}

fn parse_dict_entry(parser: &mut Parser) -> Result<(Option<Expr>, Expr), Error> {
    if parser.current_token_kind() == TokenKind::DoubleStar {
        parser.advance();
        return Ok((None, parse_expr(parser, BindingPower::Relational)?));
    }

    let key = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok((Some(key), value))
}

/// Parses `{...}`: dict and set displays and their comprehensions.
pub fn parse_curly_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    if parser.current_token_kind() == TokenKind::CloseCurly {
        parser.advance();
        return Ok(Expr::new(
            ExprKind::Dict { entries: vec![] },
            parser.span_from(&start),
        ));
    }

    if parser.current_token_kind() == TokenKind::DoubleStar {
        return parse_dict_rest(parser, &start, vec![]);
    }

    let first = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        let value = parse_expr(parser, BindingPower::Default)?;

        if at_comprehension(parser) {
            let generators = parse_comprehension_clauses(parser)?;
            parser.expect(TokenKind::CloseCurly)?;
            return Ok(Expr::new(
                ExprKind::DictComp {
                    key: Box::new(first),
                    value: Box::new(value),
                    generators,
                },
                parser.span_from(&start),
            ));
        }

        let entries = vec![(Some(first), value)];
        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        }
        return parse_dict_rest(parser, &start, entries);
    }

    if at_comprehension(parser) {
        let generators = parse_comprehension_clauses(parser)?;
        parser.expect(TokenKind::CloseCurly)?;
        return Ok(Expr::new(
            ExprKind::SetComp {
                element: Box::new(first),
                generators,
            },
            parser.span_from(&start),
        ));
    }

    let elements = parse_elements(parser, first, TokenKind::CloseCurly)?;
    Ok(Expr::new(ExprKind::Set { elements }, parser.span_from(&start)))
}

fn parse_dict_rest(
    parser: &mut Parser,
    start: &Span,
    mut entries: Vec<(Option<Expr>, Expr)>,
) -> Result<Expr, Error> {
    while parser.current_token_kind() != TokenKind::CloseCurly {
        entries.push(parse_dict_entry(parser)?);
        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }
    parser.expect(TokenKind::CloseCurly)?;

    Ok(Expr::new(ExprKind::Dict { entries }, parser.span_from(start)))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let mut arguments = vec![];
    let mut keywords = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        if parser.current_token_kind() == TokenKind::DoubleStar {
            parser.advance();
            keywords.push(Keyword {
                arg: None,
                value: parse_expr(parser, BindingPower::Default)?,
            });
        } else if parser.current_token_kind() == TokenKind::Identifier
            && parser.peek_kind(1) == TokenKind::Assignment
        {
            let name = parser.advance().value.clone();
            parser.advance();
            keywords.push(Keyword {
                arg: Some(name),
                value: parse_expr(parser, BindingPower::Default)?,
            });
        } else {
            let argument = parse_expr(parser, BindingPower::Default)?;
            if at_comprehension(parser) {
                let start = argument.span.clone();
                let generators = parse_comprehension_clauses(parser)?;
                arguments.push(Expr::new(
                    ExprKind::GeneratorExp {
                        element: Box::new(argument),
                        generators,
                    },
                    parser.span_from(&start),
                ));
            } else {
                arguments.push(argument);
            }
        }

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::new(
        ExprKind::Call {
            callee: Box::new(left.clone()),
            arguments,
            keywords,
        },
        parser.span_from(&left.span),
    ))
}

fn at_slice_end(parser: &Parser) -> bool {
    matches!(
        parser.current_token_kind(),
        TokenKind::Colon | TokenKind::Comma | TokenKind::CloseBracket
    )
}

fn parse_slice_rest(parser: &mut Parser, lower: Option<Expr>) -> Result<Expr, Error> {
    let colon = parser.expect(TokenKind::Colon)?;
    let start = lower
        .as_ref()
        .map(|lower| lower.span.clone())
        .unwrap_or(colon.span);

    let upper = if at_slice_end(parser) {
        None
    } else {
        Some(Box::new(parse_expr(parser, BindingPower::Default)?))
    };

    let mut step = None;
    if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        if !at_slice_end(parser) {
            step = Some(Box::new(parse_expr(parser, BindingPower::Default)?));
        }
    }

    Ok(Expr::new(
        ExprKind::Slice {
            lower: lower.map(Box::new),
            upper,
            step,
        },
        parser.span_from(&start),
    ))
}

fn parse_slice_item(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.current_token_kind() == TokenKind::Colon {
        return parse_slice_rest(parser, None);
    }

    let lower = parse_expr(parser, BindingPower::Default)?;
    if parser.current_token_kind() == TokenKind::Colon {
        parse_slice_rest(parser, Some(lower))
    } else {
        Ok(lower)
    }
}

pub fn parse_subscript_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let open = parser.advance().span.clone();

    let mut items = vec![];
    let mut saw_comma = false;
    loop {
        items.push(parse_slice_item(parser)?);
        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        saw_comma = true;
        parser.advance();
        if parser.current_token_kind() == TokenKind::CloseBracket {
            break;
        }
    }
    parser.expect(TokenKind::CloseBracket)?;

    let index = if items.len() == 1 && !saw_comma {
        items.remove(0)
    } else {
        Expr::new(ExprKind::Tuple { elements: items }, parser.span_from(&open))
    };

    Ok(Expr::new(
        ExprKind::Subscript {
            value: Box::new(left.clone()),
            index: Box::new(index),
        },
        parser.span_from(&left.span),
    ))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let attr = parser.expect(TokenKind::Identifier)?.value;

    Ok(Expr::new(
        ExprKind::Attribute {
            value: Box::new(left.clone()),
            attr,
        },
        parser.span_from(&left.span),
    ))
}
