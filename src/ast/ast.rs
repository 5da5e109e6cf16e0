use std::fmt::Display;

use crate::{
    lexer::tokens::Token,
    symtable::symtable::{ScopeId, SymbolArena},
};

use super::{
    expressions::Expr,
    statements::{Stmt, VarDecl},
    types::TypeExpr,
};

/// Identity of a node, allocated in parse order.
///
/// Comparing two ids tells which node came first in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Root of a parsed source file.
///
/// The program owns the symbol arena, so every scope handle stored in the
/// tree stays valid for the program's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub id: NodeId,
    pub scope: ScopeId,
    pub declarations: Vec<Decl>,
    pub symbols: SymbolArena,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Class(ClassDecl),
    Func(FuncDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub id: NodeId,
    pub token: Token,
    pub name: String,
    pub body: ClassBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassBody {
    pub id: NodeId,
    pub token: Token,
    pub scope: ScopeId,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Var(VarDecl),
    Func(FuncDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub id: NodeId,
    pub token: Token,
    pub name: String,
    pub params: ParamList,
    pub returns: ReturnList,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamList {
    pub id: NodeId,
    pub token: Token,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub id: NodeId,
    pub token: Token,
    pub name: String,
    pub ty: TypeExpr,
}

/// Declared result slots. A `void` function has the single slot `void`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnList {
    pub id: NodeId,
    pub token: Token,
    pub types: Vec<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub token: Token,
    pub scope: ScopeId,
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Decl::Func(func) => Some(func),
            Decl::Class(_) => None,
        })
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Decl::Class(class) => Some(class),
            Decl::Func(_) => None,
        })
    }

    /// Mutable access to every expression in the tree, in source order.
    pub fn for_each_expr_mut(&mut self, visit: &mut impl FnMut(&mut Expr)) {
        for decl in self.declarations.iter_mut() {
            match decl {
                Decl::Func(func) => func.body.for_each_expr_mut(visit),
                Decl::Class(class) => {
                    for member in class.body.members.iter_mut() {
                        match member {
                            Member::Var(var) => var.value.walk_mut(visit),
                            Member::Func(func) => func.body.for_each_expr_mut(visit),
                        }
                    }
                }
            }
        }
    }
}

impl Block {
    pub fn for_each_expr_mut(&mut self, visit: &mut impl FnMut(&mut Expr)) {
        for stmt in self.statements.iter_mut() {
            match stmt {
                Stmt::VarDecl(var) => var.value.walk_mut(visit),
                Stmt::Assign(assign) => {
                    assign.targets.iter_mut().for_each(|target| target.walk_mut(visit));
                    assign.value.walk_mut(visit);
                }
                Stmt::If(stmt) => {
                    for branch in stmt.branches.iter_mut() {
                        branch.condition.walk_mut(visit);
                        branch.block.for_each_expr_mut(visit);
                    }
                    if let Some(block) = stmt.else_block.as_mut() {
                        block.for_each_expr_mut(visit);
                    }
                }
                Stmt::For(stmt) => {
                    stmt.iterable.walk_mut(visit);
                    stmt.body.for_each_expr_mut(visit);
                }
                Stmt::While(stmt) => {
                    stmt.condition.walk_mut(visit);
                    stmt.body.for_each_expr_mut(visit);
                }
                Stmt::Jump(stmt) => stmt.values.iter_mut().for_each(|value| value.walk_mut(visit)),
                Stmt::Expression(stmt) => stmt.expression.walk_mut(visit),
            }
        }
    }
}
