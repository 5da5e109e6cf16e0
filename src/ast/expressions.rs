use std::fmt::Display;

use crate::{lexer::tokens::{Token, TokenKind}, symtable::symtable::ScopeId};

use super::{ast::NodeId, types::TypeExpr};

/// An expression node.
///
/// `scope` is the innermost scope open when the expression was parsed. It is
/// a plain handle into the program's arena and owns nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub token: Token,
    pub scope: ScopeId,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Dot {
        left: Box<Expr>,
        member: String,
    },
    /// `float(x)`: a primitive type name applied to one value.
    Cast {
        target: TypeExpr,
        value: Box<Expr>,
    },
    New {
        ty: TypeExpr,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    VarRef {
        name: String,
    },
    List {
        elements: Vec<Expr>,
    },
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Nil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    /// String `+`, retagged by the checker.
    Concat,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        let op = match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Dash => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Equals => BinaryOp::Eq,
            TokenKind::NotEquals => BinaryOp::NotEq,
            TokenKind::Less => BinaryOp::Lt,
            TokenKind::LessEquals => BinaryOp::LtEq,
            TokenKind::Greater => BinaryOp::Gt,
            TokenKind::GreaterEquals => BinaryOp::GtEq,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add | BinaryOp::Concat => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::NotEq)
    }

    pub fn is_relational(&self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Plus,
    Minus,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<UnaryOp> {
        match kind {
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Dash => Some(UnaryOp::Minus),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Expr {
    pub fn line(&self) -> u32 {
        self.token.line()
    }

    /// Assignable expressions: variables, indexed elements and members.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::VarRef { .. } | ExprKind::Index { .. } | ExprKind::Dot { .. }
        )
    }

    /// Visits this expression and every nested one, parents first.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Expr)) {
        visit(self);

        match &mut self.kind {
            ExprKind::Binary { left, right, .. } => {
                left.walk_mut(visit);
                right.walk_mut(visit);
            }
            ExprKind::Unary { operand, .. } => operand.walk_mut(visit),
            ExprKind::Index { base, index } => {
                base.walk_mut(visit);
                index.walk_mut(visit);
            }
            ExprKind::Dot { left, .. } => left.walk_mut(visit),
            ExprKind::Cast { value, .. } => value.walk_mut(visit),
            ExprKind::Call { callee, arguments } => {
                callee.walk_mut(visit);
                arguments.iter_mut().for_each(|argument| argument.walk_mut(visit));
            }
            ExprKind::List { elements } => {
                elements.iter_mut().for_each(|element| element.walk_mut(visit))
            }
            ExprKind::New { .. }
            | ExprKind::VarRef { .. }
            | ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::String(_)
            | ExprKind::Bool(_)
            | ExprKind::Nil => {}
        }
    }
}
