use std::fmt::Display;

use crate::lexer::tokens::Token;

use super::{
    ast::{Block, NodeId},
    expressions::Expr,
    types::TypeExpr,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDecl),
    Assign(VarAssign),
    If(IfStmt),
    For(ForStmt),
    While(WhileStmt),
    Jump(JumpStmt),
    Expression(ExpressionStmt),
}

/// `var a, b : T = value;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub id: NodeId,
    pub token: Token,
    pub names: Vec<Token>,
    pub ty: TypeExpr,
    pub value: Expr,
}

/// `a, b[0], c.d = value;` where `token` is the `=`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarAssign {
    pub id: NodeId,
    pub token: Token,
    pub targets: Vec<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBlock {
    pub condition: Expr,
    pub block: Block,
}

/// `if` plus any `else if` arms, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub id: NodeId,
    pub token: Token,
    pub branches: Vec<ConditionalBlock>,
    pub else_block: Option<Block>,
}

/// `for var x : T in iterable { ... }`. The loop variable lives in the body's scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub id: NodeId,
    pub token: Token,
    pub variable: Token,
    pub variable_ty: TypeExpr,
    pub iterable: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub id: NodeId,
    pub token: Token,
    pub condition: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Return,
    Break,
    Continue,
}

impl Display for JumpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JumpKind::Return => write!(f, "return"),
            JumpKind::Break => write!(f, "break"),
            JumpKind::Continue => write!(f, "continue"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JumpStmt {
    pub id: NodeId,
    pub token: Token,
    pub kind: JumpKind,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub id: NodeId,
    pub token: Token,
    pub expression: Expr,
}
