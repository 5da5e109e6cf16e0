use crate::{
    ast::{
        ast::{Block, ClassBody, ClassDecl, Decl, FuncDecl, Member, Param, ParamList, ReturnList},
        statements::{
            ConditionalBlock, ExpressionStmt, ForStmt, IfStmt, JumpKind, JumpStmt, Stmt, VarAssign, VarDecl,
            WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    symtable::symtable::{ScopeId, ScopeKind, SymbolKind},
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser, types::parse_type};

/// A top level declaration: `class` or `func`.
pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Error> {
    match parser.current_token_kind() {
        TokenKind::Class => Ok(Decl::Class(parse_class_decl(parser)?)),
        TokenKind::Func => Ok(Decl::Func(parse_func_decl(parser)?)),
        _ => Err(parser.unexpected("`class` or `func`")),
    }
}

pub fn parse_class_decl(parser: &mut Parser) -> Result<ClassDecl, Error> {
    parser.expect(TokenKind::Class)?;
    let name = parser.expect(TokenKind::Identifier)?;
    let id = parser.advance_id();

    // The class is visible from its own members.
    let brace = parser.expect(TokenKind::OpenCurly)?;
    let scope = parser.open_scope(ScopeKind::Class);
    let enclosing = parser.parent_scope();
    parser.declare_in(enclosing, &name, id, SymbolKind::Class { members: scope })?;

    let mut members = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        match parser.current_token_kind() {
            TokenKind::Var => members.push(Member::Var(parse_var_decl(parser)?)),
            TokenKind::Func => members.push(Member::Func(parse_func_decl(parser)?)),
            _ => return Err(parser.unexpected("`var` or `func`")),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;
    parser.close_scope();

    Ok(ClassDecl {
        id,
        name: name.value.clone(),
        token: name,
        body: ClassBody {
            id: parser.advance_id(),
            token: brace,
            scope,
            members,
        },
    })
}

pub fn parse_func_decl(parser: &mut Parser) -> Result<FuncDecl, Error> {
    parser.expect(TokenKind::Func)?;
    let name = parser.expect(TokenKind::Identifier)?;

    // Parameters live in the body's scope, so it opens before they are read.
    let body_scope = parser.open_scope(ScopeKind::Block);
    let params = parse_param_list(parser)?;
    let returns = parse_return_list(parser)?;

    let id = parser.advance_id();
    let signature = SymbolKind::Function {
        params: params.params.iter().map(|param| param.ty.clone()).collect(),
        returns: returns.types.clone(),
    };
    let enclosing = parser.parent_scope();
    parser.declare_in(enclosing, &name, id, signature)?;

    let body = parse_block_in(parser, body_scope)?;

    Ok(FuncDecl {
        id,
        name: name.value.clone(),
        token: name,
        params,
        returns,
        body,
    })
}

fn parse_param_list(parser: &mut Parser) -> Result<ParamList, Error> {
    let token = parser.expect(TokenKind::OpenParen)?;
    let mut params = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        let name = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let ty = parse_type(parser, BindingPower::Default)?;

        let id = parser.advance_id();
        parser.declare(&name, id, SymbolKind::Parameter { ty: ty.clone() })?;
        params.push(Param {
            id,
            name: name.value.clone(),
            token: name,
            ty,
        });

        if parser.eat(TokenKind::Comma) && parser.current_token_kind() == TokenKind::CloseParen {
            return Err(parser.unexpected(TokenKind::Identifier.describe()));
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(ParamList {
        id: parser.advance_id(),
        token,
        params,
    })
}

/// `T` or `(T1, T2, ...)`.
fn parse_return_list(parser: &mut Parser) -> Result<ReturnList, Error> {
    let token = parser.current_token().clone();
    let mut types = vec![];

    if parser.eat(TokenKind::OpenParen) {
        types.push(parse_type(parser, BindingPower::Default)?);
        while parser.eat(TokenKind::Comma) {
            types.push(parse_type(parser, BindingPower::Default)?);
        }
        parser.expect(TokenKind::CloseParen)?;
    } else {
        types.push(parse_type(parser, BindingPower::Default)?);
    }

    Ok(ReturnList {
        id: parser.advance_id(),
        token,
        types,
    })
}

/// A block with a scope of its own.
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    let scope = parser.open_scope(ScopeKind::Block);
    parse_block_in(parser, scope)
}

/// A block whose scope is already open and current. Closes it on exit.
pub fn parse_block_in(parser: &mut Parser, scope: ScopeId) -> Result<Block, Error> {
    let token = parser.expect(TokenKind::OpenCurly)?;

    let mut statements = vec![];
    while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    parser.close_scope();

    Ok(Block {
        id: parser.advance_id(),
        token,
        scope,
        statements,
    })
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let kind = parser.current_token_kind();
    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        return handler(parser);
    }

    if !parser.get_nud_lookup().contains_key(&kind) {
        let token = parser.current_token();
        return Err(Error::new(
            ErrorImpl::ExpectedStatement { found: token.value.clone() },
            token.span.start.clone(),
        ));
    }

    parse_simple_stmt(parser)
}

/// An assignment or a bare expression, both ending in `;`.
fn parse_simple_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().clone();
    let first = parse_expr(parser, BindingPower::Default)?;

    if !matches!(parser.current_token_kind(), TokenKind::Comma | TokenKind::Assignment) {
        parser.expect(TokenKind::Semicolon)?;
        return Ok(Stmt::Expression(ExpressionStmt {
            id: parser.advance_id(),
            token: start,
            expression: first,
        }));
    }

    let mut targets = vec![first];
    while parser.eat(TokenKind::Comma) {
        targets.push(parse_expr(parser, BindingPower::Default)?);
    }

    if let Some(target) = targets.iter().find(|target| !target.is_assignable()) {
        return Err(Error::new(ErrorImpl::InvalidAssignmentTarget, target.token.span.start.clone()));
    }

    let token = parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Assign(VarAssign {
        id: parser.advance_id(),
        token,
        targets,
        value,
    }))
}

/// `var a, b : T = value;`
///
/// The names are declared once the whole statement is read, so the
/// initializer cannot see them.
pub fn parse_var_decl(parser: &mut Parser) -> Result<VarDecl, Error> {
    let token = parser.expect(TokenKind::Var)?;

    let mut names = vec![parser.expect(TokenKind::Identifier)?];
    while parser.eat(TokenKind::Comma) {
        names.push(parser.expect(TokenKind::Identifier)?);
    }

    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    let id = parser.advance_id();
    for name in names.iter() {
        parser.declare(name, id, SymbolKind::Variable { ty: ty.clone() })?;
    }

    Ok(VarDecl {
        id,
        token,
        names,
        ty,
        value,
    })
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::VarDecl(parse_var_decl(parser)?))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.expect(TokenKind::If)?;

    let condition = parse_expr(parser, BindingPower::Default)?;
    let block = parse_block(parser)?;
    let mut branches = vec![ConditionalBlock { condition, block }];
    let mut else_block = None;

    while parser.eat(TokenKind::Else) {
        if parser.eat(TokenKind::If) {
            let condition = parse_expr(parser, BindingPower::Default)?;
            let block = parse_block(parser)?;
            branches.push(ConditionalBlock { condition, block });
        } else {
            else_block = Some(parse_block(parser)?);
            break;
        }
    }

    Ok(Stmt::If(IfStmt {
        id: parser.advance_id(),
        token,
        branches,
        else_block,
    }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.expect(TokenKind::For)?;

    // The loop variable belongs to the body's scope.
    let body_scope = parser.open_scope(ScopeKind::Block);

    parser.expect(TokenKind::Var)?;
    let variable = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Colon)?;
    let variable_ty = parse_type(parser, BindingPower::Default)?;
    parser.expect(TokenKind::In)?;
    let iterable = parse_expr(parser, BindingPower::Default)?;

    let id = parser.advance_id();
    parser.declare(&variable, id, SymbolKind::Variable { ty: variable_ty.clone() })?;

    let body = parse_block_in(parser, body_scope)?;

    Ok(Stmt::For(ForStmt {
        id,
        token,
        variable,
        variable_ty,
        iterable,
        body,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.expect(TokenKind::While)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt {
        id: parser.advance_id(),
        token,
        condition,
        body,
    }))
}

/// `return`, `break` or `continue`, with optional comma separated values.
pub fn parse_jump_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance();
    let kind = match token.kind {
        TokenKind::Return => JumpKind::Return,
        TokenKind::Break => JumpKind::Break,
        TokenKind::Continue => JumpKind::Continue,
        _ => {
            return Err(Error::new(
                ErrorImpl::ExpectedStatement { found: token.value.clone() },
                token.span.start.clone(),
            ))
        }
    };

    let mut values = vec![];
    if parser.current_token_kind() != TokenKind::Semicolon {
        values.push(parse_expr(parser, BindingPower::Default)?);
        while parser.eat(TokenKind::Comma) {
            values.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Jump(JumpStmt {
        id: parser.advance_id(),
        token,
        kind,
        values,
    }))
}
