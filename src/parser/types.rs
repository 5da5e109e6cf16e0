//! Type annotation parsing.
//!
//! Handles the three annotation forms:
//!
//! - Named types (`int`, `Point`)
//! - List types (`[int]`)
//! - Generic containers (`map[string, int]`)
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers.

use std::collections::HashMap;

use crate::{ast::types::TypeExpr, errors::errors::Error, lexer::tokens::TokenKind};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeExpr, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, TypeExpr, BindingPower) -> Result<TypeExpr, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_named_type);
    parser.type_nud(TokenKind::OpenBracket, parse_list_type);
    parser.type_led(TokenKind::OpenBracket, BindingPower::Call, parse_generic_type);
}

pub fn parse_named_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(TypeExpr::Named { token })
}

pub fn parse_list_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token = parser.expect(TokenKind::OpenBracket)?;
    let inner = parse_type(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(TypeExpr::List {
        token,
        inner: Box::new(inner),
    })
}

/// `Name[T1, T2, ...]`, only valid after a plain name.
pub fn parse_generic_type(parser: &mut Parser, left: TypeExpr, _bp: BindingPower) -> Result<TypeExpr, Error> {
    let TypeExpr::Named { token } = left else {
        return Err(parser.unexpected("a type"));
    };

    parser.expect(TokenKind::OpenBracket)?;

    let mut args = vec![parse_type(parser, BindingPower::Default)?];
    while parser.eat(TokenKind::Comma) {
        args.push(parse_type(parser, BindingPower::Default)?);
    }

    parser.expect(TokenKind::CloseBracket)?;

    Ok(TypeExpr::Generic { token, args })
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeExpr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected("a type"));
    };

    let mut left = nud(parser)?;

    // While the next token binds tighter than `bp`, keep extending the type
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = parser
            .get_type_bp_lookup()
            .get(&token_kind)
            .copied()
            .unwrap_or(BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_type_led_lookup().get(&token_kind).copied() else {
            break;
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}
