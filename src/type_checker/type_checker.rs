use std::collections::HashSet;

use tracing::debug;

use crate::{
    ast::{
        ast::{Block, ClassDecl, Decl, FuncDecl, Member, NodeId, Program},
        expressions::{BinaryOp, Expr, ExprKind},
        statements::{ForStmt, IfStmt, JumpKind, JumpStmt, Stmt, VarAssign, VarDecl, WhileStmt},
        types::TypeExpr,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
    symtable::symtable::{ScopeId, SymbolArena},
};

use super::{
    builtins::Builtins,
    expr::type_check_expr,
    primitives::{PrimitiveRegistry, FLOAT_LITERAL, INT_LITERAL},
    type_obj::{build_return_list, build_type_list, build_type_obj, types_match, Signature, TypeObj},
};

/// A tree edit decided during checking and applied afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// The binary `+` with this id joins two strings.
    Concat(NodeId),
}

/// State shared by the whole walk.
pub struct TypeChecker<'a> {
    pub symbols: &'a SymbolArena,
    pub primitives: PrimitiveRegistry,
    pub builtins: Builtins,
    pub rewrites: Vec<Rewrite>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(symbols: &'a SymbolArena) -> Self {
        let primitives = PrimitiveRegistry::new();
        let builtins = Builtins::new(&primitives);

        TypeChecker {
            symbols,
            primitives,
            builtins,
            rewrites: vec![],
        }
    }

    pub fn record(&mut self, rewrite: Rewrite) {
        debug!(?rewrite, "rewrite recorded");
        self.rewrites.push(rewrite);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassContext {
    pub name: String,
    pub scope: ScopeId,
}

/// Where in the program the walk currently is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    /// Result list of the enclosing function.
    pub returns: Option<TypeObj>,
    pub class: Option<ClassContext>,
    pub loop_depth: usize,
}

impl Context {
    pub fn in_class(&self, class: ClassContext) -> Context {
        Context {
            class: Some(class),
            ..self.clone()
        }
    }

    pub fn in_function(&self, returns: TypeObj) -> Context {
        Context {
            returns: Some(returns),
            loop_depth: 0,
            ..self.clone()
        }
    }

    pub fn in_loop(&self) -> Context {
        Context {
            loop_depth: self.loop_depth + 1,
            ..self.clone()
        }
    }
}

pub fn error_at(token: &Token, error: ErrorImpl) -> Error {
    Error::new(error, token.span.start.clone())
}

pub fn mismatch(token: &Token, expected: &TypeObj, received: &TypeObj) -> Error {
    error_at(
        token,
        ErrorImpl::MismatchedTypes {
            expected: expected.full_name.clone(),
            received: received.full_name.clone(),
        },
    )
}

/// Resolves an annotation seen from `scope`.
///
/// Class names must be declared and `map` with two arguments is the only
/// generic container. Once checked, the annotation is built by [`build_type_obj`].
pub fn resolve_type(checker: &TypeChecker, ty: &TypeExpr, scope: ScopeId) -> Result<TypeObj, Error> {
    validate_type(checker, ty, scope)?;
    Ok(build_type_obj(ty, &checker.primitives))
}

fn validate_type(checker: &TypeChecker, ty: &TypeExpr, scope: ScopeId) -> Result<(), Error> {
    let unknown = || error_at(ty.token(), ErrorImpl::UnknownType { type_: ty.to_string() });

    match ty {
        TypeExpr::Named { token } => {
            // Literal types exist only for values.
            if matches!(token.value.as_str(), INT_LITERAL | FLOAT_LITERAL) {
                return Err(unknown());
            }
            if checker.primitives.contains(&token.value) {
                return Ok(());
            }

            match checker.symbols.lookup(scope, &token.value) {
                Some(symbol) if symbol.is_class() => Ok(()),
                _ => Err(unknown()),
            }
        }
        TypeExpr::List { inner, .. } => validate_type(checker, inner, scope),
        TypeExpr::Generic { args, .. } => {
            if ty.name() != "map" || args.len() != 2 {
                return Err(unknown());
            }
            args.iter().try_for_each(|arg| validate_type(checker, arg, scope))
        }
    }
}

/// Resolves the annotation of a variable or parameter, which cannot be `void`.
fn resolve_declared_type(
    checker: &TypeChecker,
    symbol: &str,
    ty: &TypeExpr,
    scope: ScopeId,
) -> Result<TypeObj, Error> {
    let resolved = resolve_type(checker, ty, scope)?;
    if resolved.is_named("void") {
        return Err(error_at(
            ty.token(),
            ErrorImpl::VoidDeclaration {
                symbol: String::from(symbol),
            },
        ));
    }

    Ok(resolved)
}

/// Signature of a declared function, with every annotation resolved.
pub fn resolve_signature(
    checker: &TypeChecker,
    params: &[TypeExpr],
    returns: &[TypeExpr],
    scope: ScopeId,
) -> Result<Signature, Error> {
    let params = params
        .iter()
        .map(|ty| resolve_type(checker, ty, scope))
        .collect::<Result<Vec<TypeObj>, Error>>()?;
    let returns = returns
        .iter()
        .map(|ty| resolve_type(checker, ty, scope))
        .collect::<Result<Vec<TypeObj>, Error>>()?;

    Ok(Signature::new(params, returns))
}

pub fn type_check_decl(checker: &mut TypeChecker, ctx: &Context, decl: &Decl) -> Result<(), Error> {
    match decl {
        Decl::Class(class) => type_check_class(checker, ctx, class),
        Decl::Func(func) => type_check_func(checker, ctx, func),
    }
}

fn type_check_class(checker: &mut TypeChecker, ctx: &Context, class: &ClassDecl) -> Result<(), Error> {
    let ctx = ctx.in_class(ClassContext {
        name: class.name.clone(),
        scope: class.body.scope,
    });

    for member in class.body.members.iter() {
        match member {
            Member::Var(var) => type_check_var_decl(checker, &ctx, var)?,
            Member::Func(func) => type_check_func(checker, &ctx, func)?,
        }
    }

    Ok(())
}

fn type_check_func(checker: &mut TypeChecker, ctx: &Context, func: &FuncDecl) -> Result<(), Error> {
    let scope = func.body.scope;

    for param in func.params.params.iter() {
        resolve_declared_type(checker, &param.name, &param.ty, scope)?;
    }
    for ty in func.returns.types.iter() {
        validate_type(checker, ty, scope)?;
    }

    let ctx = ctx.in_function(build_return_list(&func.returns, &checker.primitives));
    type_check_block(checker, &ctx, &func.body)
}

pub fn type_check_block(checker: &mut TypeChecker, ctx: &Context, block: &Block) -> Result<(), Error> {
    for stmt in block.statements.iter() {
        type_check_stmt(checker, ctx, stmt)?;
    }

    Ok(())
}

pub fn type_check_stmt(checker: &mut TypeChecker, ctx: &Context, stmt: &Stmt) -> Result<(), Error> {
    match stmt {
        Stmt::VarDecl(var) => type_check_var_decl(checker, ctx, var),
        Stmt::Assign(assign) => type_check_assign(checker, ctx, assign),
        Stmt::If(stmt) => type_check_if(checker, ctx, stmt),
        Stmt::For(stmt) => type_check_for(checker, ctx, stmt),
        Stmt::While(stmt) => type_check_while(checker, ctx, stmt),
        Stmt::Jump(stmt) => type_check_jump(checker, ctx, stmt),
        Stmt::Expression(stmt) => type_check_expr(checker, ctx, &stmt.expression).map(|_| ()),
    }
}

fn type_check_var_decl(checker: &mut TypeChecker, ctx: &Context, var: &VarDecl) -> Result<(), Error> {
    let names: Vec<&str> = var.names.iter().map(|name| name.value.as_str()).collect();
    let declared = resolve_declared_type(checker, &names.join(", "), &var.ty, var.value.scope)?;

    // `var a, b : T = f();` takes one `T` per name.
    let expected = if var.names.len() == 1 {
        declared
    } else {
        build_type_list(vec![declared; var.names.len()])
    };

    let value = type_check_expr(checker, ctx, &var.value)?;
    if !types_match(&expected, &value) {
        return Err(mismatch(&var.token, &expected, &value));
    }

    Ok(())
}

fn type_check_assign(checker: &mut TypeChecker, ctx: &Context, assign: &VarAssign) -> Result<(), Error> {
    let mut targets = vec![];
    for target in assign.targets.iter() {
        targets.push(type_check_expr(checker, ctx, target)?);
    }

    let expected = if targets.len() == 1 {
        targets.remove(0)
    } else {
        build_type_list(targets)
    };

    let value = type_check_expr(checker, ctx, &assign.value)?;
    if !types_match(&expected, &value) {
        return Err(mismatch(&assign.token, &expected, &value));
    }

    Ok(())
}

fn type_check_condition(checker: &mut TypeChecker, ctx: &Context, condition: &Expr) -> Result<(), Error> {
    let ty = type_check_expr(checker, ctx, condition)?;
    if !ty.is_named("bool") {
        return Err(error_at(
            &condition.token,
            ErrorImpl::NonBooleanCondition { received: ty.full_name },
        ));
    }

    Ok(())
}

fn type_check_if(checker: &mut TypeChecker, ctx: &Context, stmt: &IfStmt) -> Result<(), Error> {
    for branch in stmt.branches.iter() {
        type_check_condition(checker, ctx, &branch.condition)?;
        type_check_block(checker, ctx, &branch.block)?;
    }

    if let Some(block) = &stmt.else_block {
        type_check_block(checker, ctx, block)?;
    }

    Ok(())
}

fn type_check_while(checker: &mut TypeChecker, ctx: &Context, stmt: &WhileStmt) -> Result<(), Error> {
    type_check_condition(checker, ctx, &stmt.condition)?;
    type_check_block(checker, &ctx.in_loop(), &stmt.body)
}

fn type_check_for(checker: &mut TypeChecker, ctx: &Context, stmt: &ForStmt) -> Result<(), Error> {
    let iterable = type_check_expr(checker, ctx, &stmt.iterable)?;
    if !iterable.is_list && !iterable.is_map {
        return Err(error_at(
            &stmt.iterable.token,
            ErrorImpl::NotIterable { received: iterable.full_name },
        ));
    }

    let variable = resolve_declared_type(checker, &stmt.variable.value, &stmt.variable_ty, stmt.body.scope)?;

    // Lists yield elements, maps yield keys. `[]` yields nothing to compare.
    if let Some(element) = iterable.inner.first() {
        if !types_match(&variable, element) {
            return Err(mismatch(&stmt.variable, &variable, element));
        }
    }

    type_check_block(checker, &ctx.in_loop(), &stmt.body)
}

fn type_check_jump(checker: &mut TypeChecker, ctx: &Context, stmt: &JumpStmt) -> Result<(), Error> {
    if stmt.kind != JumpKind::Return {
        if ctx.loop_depth == 0 {
            return Err(error_at(&stmt.token, ErrorImpl::JumpOutsideLoop { keyword: stmt.kind.to_string() }));
        }
        if !stmt.values.is_empty() {
            return Err(error_at(
                &stmt.token,
                ErrorImpl::UnexpectedJumpValues { keyword: stmt.kind.to_string() },
            ));
        }
        return Ok(());
    }

    let expected = ctx
        .returns
        .clone()
        .unwrap_or_else(|| build_type_list(vec![checker.primitives.void()]));

    let mut values = vec![];
    for value in stmt.values.iter() {
        values.push(type_check_expr(checker, ctx, value)?);
    }

    // `return g();` hands back every result of `g` at once.
    let received = if values.is_empty() {
        None
    } else if values.len() == 1 && values[0].is_multi {
        values.pop()
    } else {
        Some(build_type_list(values))
    };

    let matches = match &received {
        None => expected.is_void_list(),
        Some(received) => !expected.is_void_list() && types_match(&expected, received),
    };

    if !matches {
        let received = received.map_or_else(|| String::from("void"), |received| received.full_name);
        return Err(error_at(
            &stmt.token,
            ErrorImpl::ReturnTypeMatchError {
                expected: expected.full_name,
                received,
            },
        ));
    }

    Ok(())
}

/// Validates the whole program without touching it.
///
/// Returns the rewrites to apply once checking has succeeded.
#[tracing::instrument(level = "debug", skip_all)]
pub fn check(program: &Program) -> Result<Vec<Rewrite>, Error> {
    let mut checker = TypeChecker::new(&program.symbols);
    let ctx = Context::default();

    for decl in program.declarations.iter() {
        type_check_decl(&mut checker, &ctx, decl)?;
    }

    debug!(rewrites = checker.rewrites.len(), "type check passed");
    Ok(checker.rewrites)
}

pub fn apply_rewrites(program: &mut Program, rewrites: &[Rewrite]) {
    let concat: HashSet<NodeId> = rewrites
        .iter()
        .map(|rewrite| match rewrite {
            Rewrite::Concat(id) => *id,
        })
        .collect();

    program.for_each_expr_mut(&mut |expr| {
        if !concat.contains(&expr.id) {
            return;
        }
        if let ExprKind::Binary { op, .. } = &mut expr.kind {
            *op = BinaryOp::Concat;
        }
    });
}

/// Type checks `program` and applies the resulting rewrites.
///
/// Fails on the first violation, leaving the program unchanged.
#[tracing::instrument(level = "debug", skip_all)]
pub fn analyze(program: &mut Program) -> Result<(), Error> {
    let rewrites = check(program)?;
    apply_rewrites(program, &rewrites);
    Ok(())
}
