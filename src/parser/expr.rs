use crate::{
    ast::{
        expressions::{BinaryOp, Expr, ExprKind, UnaryOp},
        types::TypeExpr,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    type_checker::primitives::is_castable_type,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

/// Builds an expression node anchored on `token` in the current scope.
pub fn make_expr(parser: &mut Parser, token: Token, kind: ExprKind) -> Expr {
    Expr {
        id: parser.advance_id(),
        token,
        scope: parser.current_scope(),
        kind,
    }
}

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected("an expression"));
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than `bp`, fold it into lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = parser
            .get_bp_lookup()
            .get(&token_kind)
            .copied()
            .unwrap_or(BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let kind = match token.kind {
        TokenKind::Int => match token.value.parse::<i64>() {
            Ok(value) => ExprKind::Int(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value.clone() },
                    token.span.start.clone(),
                ))
            }
        },
        TokenKind::Float => match token.value.parse::<f64>() {
            Ok(value) => ExprKind::Float(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value.clone() },
                    token.span.start.clone(),
                ))
            }
        },
        TokenKind::String => ExprKind::String(token.value.clone()),
        TokenKind::True => ExprKind::Bool(true),
        TokenKind::False => ExprKind::Bool(false),
        TokenKind::Nil => ExprKind::Nil,
        TokenKind::Identifier => {
            if is_castable_type(&token.value) && parser.peek_kind() == TokenKind::OpenParen {
                return parse_cast_expr(parser);
            }
            ExprKind::VarRef { name: token.value.clone() }
        }
        _ => return Err(parser.unexpected("an expression")),
    };

    parser.advance();
    Ok(make_expr(parser, token, kind))
}

/// `float(x)`: exactly one value between the parentheses.
pub fn parse_cast_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::OpenParen)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let target = TypeExpr::Named { token: token.clone() };
    Ok(make_expr(
        parser,
        token,
        ExprKind::Cast {
            target,
            value: Box::new(value),
        },
    ))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let Some(op) = BinaryOp::from_token(operator_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: String::from("a binary operator"),
                found: operator_token.value.clone(),
            },
            operator_token.span.start.clone(),
        ));
    };

    let right = parse_expr(parser, bp)?;

    Ok(make_expr(
        parser,
        operator_token,
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let Some(op) = UnaryOp::from_token(operator_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: String::from("a unary operator"),
                found: operator_token.value.clone(),
            },
            operator_token.span.start.clone(),
        ));
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(make_expr(
        parser,
        operator_token,
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_list_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.expect(TokenKind::OpenBracket)?;
    let elements = parse_expr_list(parser, TokenKind::CloseBracket)?;

    Ok(make_expr(parser, token, ExprKind::List { elements }))
}

pub fn parse_new_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.expect(TokenKind::New)?;
    let ty = parse_type(parser, BindingPower::Default)?;

    Ok(make_expr(parser, token, ExprKind::New { ty }))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let token = parser.expect(TokenKind::OpenParen)?;
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    Ok(make_expr(
        parser,
        token,
        ExprKind::Call {
            callee: Box::new(left),
            arguments,
        },
    ))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let token = parser.expect(TokenKind::OpenBracket)?;
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(make_expr(
        parser,
        token,
        ExprKind::Index {
            base: Box::new(left),
            index: Box::new(index),
        },
    ))
}

pub fn parse_dot_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::Dot)?;
    let member = parser.expect(TokenKind::Identifier)?;

    Ok(make_expr(
        parser,
        member.clone(),
        ExprKind::Dot {
            left: Box::new(left),
            member: member.value,
        },
    ))
}

/// Comma separated expressions up to and including `close`.
fn parse_expr_list(parser: &mut Parser, close: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut exprs = vec![];

    if parser.eat(close) {
        return Ok(exprs);
    }

    loop {
        exprs.push(parse_expr(parser, BindingPower::Default)?);
        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    parser.expect(close)?;
    Ok(exprs)
}
