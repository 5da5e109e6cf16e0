use crate::{
    ast::expressions::{BinaryOp, Expr, ExprKind, UnaryOp},
    errors::errors::{Error, ErrorImpl},
    symtable::symtable::{ScopeKind, SymbolKind},
};

use super::{
    primitives::{is_castable_type, is_integer_type, FLOAT_LITERAL, INT_LITERAL},
    type_checker::{error_at, mismatch, resolve_signature, resolve_type, Context, Rewrite, TypeChecker},
    type_obj::{concrete_type, types_match, Signature, TypeObj},
};

/// What a `.member` access found.
enum MemberKind {
    Field(TypeObj),
    Method(Signature),
}

/// Computes the type of `expr`, validating it on the way.
pub fn type_check_expr(checker: &mut TypeChecker, ctx: &Context, expr: &Expr) -> Result<TypeObj, Error> {
    match &expr.kind {
        ExprKind::Int(_) => Ok(TypeObj::primitive(INT_LITERAL)),
        ExprKind::Float(_) => Ok(TypeObj::primitive(FLOAT_LITERAL)),
        ExprKind::String(_) => Ok(checker.primitives.string()),
        ExprKind::Bool(_) => Ok(checker.primitives.bool()),
        ExprKind::Nil => Ok(TypeObj::primitive("nil")),
        ExprKind::VarRef { name } => type_check_var_ref(checker, ctx, expr, name),
        ExprKind::Binary { op, left, right } => type_check_binary(checker, ctx, expr, *op, left, right),
        ExprKind::Unary { op, operand } => {
            let ty = type_check_expr(checker, ctx, operand)?;
            let valid = match op {
                UnaryOp::Not => ty.is_named("bool"),
                UnaryOp::Plus | UnaryOp::Minus => ty.is_number,
            };

            if !valid {
                return Err(error_at(
                    &expr.token,
                    ErrorImpl::InvalidOperation {
                        operator: op.to_string(),
                        operand: ty.full_name,
                    },
                ));
            }
            Ok(ty)
        }
        ExprKind::Index { base, index } => type_check_index(checker, ctx, expr, base, index),
        ExprKind::Dot { left, member } => {
            let owner = type_check_expr(checker, ctx, left)?;
            match resolve_member(checker, expr, &owner, member)? {
                MemberKind::Field(ty) => Ok(ty),
                MemberKind::Method(signature) => Ok(signature.to_type_obj()),
            }
        }
        ExprKind::Cast { target, value } => {
            let from = type_check_expr(checker, ctx, value)?;
            let to = resolve_type(checker, target, expr.scope)?;

            let literal = from.is_literal && from.is_number;
            if !(is_castable_type(&from.name) || literal) || !is_castable_type(&to.name) {
                return Err(error_at(
                    &expr.token,
                    ErrorImpl::IllegalCast {
                        from: from.full_name,
                        to: to.full_name,
                    },
                ));
            }
            Ok(to)
        }
        ExprKind::New { ty } => resolve_type(checker, ty, expr.scope),
        ExprKind::Call { callee, arguments } => type_check_call(checker, ctx, expr, callee, arguments),
        ExprKind::List { elements } => type_check_list(checker, ctx, elements),
    }
}

fn type_check_var_ref(checker: &mut TypeChecker, ctx: &Context, expr: &Expr, name: &str) -> Result<TypeObj, Error> {
    if name == "self" {
        return match &ctx.class {
            Some(class) => Ok(TypeObj::class(&class.name)),
            None => Err(error_at(&expr.token, ErrorImpl::SelfOutsideClass)),
        };
    }

    let symbols = checker.symbols;
    let Some(scope) = symbols.scope_of(expr.scope, name) else {
        if let Some(signature) = checker.builtins.function(name) {
            return Ok(signature.to_type_obj());
        }
        return Err(error_at(&expr.token, ErrorImpl::UndeclaredSymbol { symbol: String::from(name) }));
    };

    let Some(symbol) = symbols.lookup_local(scope, name) else {
        return Err(error_at(&expr.token, ErrorImpl::UndeclaredSymbol { symbol: String::from(name) }));
    };

    match &symbol.kind {
        SymbolKind::Variable { ty } => {
            // Block locals only exist from their declaration onwards.
            if symbols.get(scope).kind() == ScopeKind::Block && symbol.node > expr.id {
                return Err(error_at(
                    &expr.token,
                    ErrorImpl::UseBeforeDeclaration { symbol: String::from(name) },
                ));
            }
            resolve_type(checker, ty, scope)
        }
        SymbolKind::Parameter { ty } => resolve_type(checker, ty, scope),
        SymbolKind::Function { params, returns } => {
            Ok(resolve_signature(checker, params, returns, scope)?.to_type_obj())
        }
        SymbolKind::Class { .. } => Err(error_at(&expr.token, ErrorImpl::NotAValue { symbol: String::from(name) })),
    }
}

fn type_check_binary(
    checker: &mut TypeChecker,
    ctx: &Context,
    expr: &Expr,
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
) -> Result<TypeObj, Error> {
    let left_ty = type_check_expr(checker, ctx, left)?;
    let right_ty = type_check_expr(checker, ctx, right)?;

    if !types_match(&left_ty, &right_ty) {
        return Err(mismatch(&expr.token, &left_ty, &right_ty));
    }

    let invalid = |operand: &TypeObj| {
        error_at(
            &expr.token,
            ErrorImpl::InvalidOperation {
                operator: op.to_string(),
                operand: operand.full_name.clone(),
            },
        )
    };

    if op.is_logical() {
        if !left_ty.is_named("bool") {
            return Err(invalid(&left_ty));
        }
        return Ok(checker.primitives.bool());
    }

    if op.is_equality() {
        return Ok(checker.primitives.bool());
    }

    if matches!(op, BinaryOp::Add | BinaryOp::Concat) && left_ty.is_named("string") {
        if op == BinaryOp::Add {
            checker.record(Rewrite::Concat(expr.id));
        }
        return Ok(left_ty);
    }

    if !left_ty.is_number {
        return Err(invalid(&left_ty));
    }

    if op.is_relational() {
        return Ok(checker.primitives.bool());
    }

    // A literal operand takes the other side's concrete type.
    Ok(concrete_type(left_ty, right_ty))
}

fn type_check_index(
    checker: &mut TypeChecker,
    ctx: &Context,
    expr: &Expr,
    base: &Expr,
    index: &Expr,
) -> Result<TypeObj, Error> {
    let base_ty = type_check_expr(checker, ctx, base)?;
    let index_ty = type_check_expr(checker, ctx, index)?;

    let not_indexable = || {
        error_at(
            &expr.token,
            ErrorImpl::NotIndexable {
                received: base_ty.full_name.clone(),
            },
        )
    };

    if base_ty.is_list {
        let element = base_ty.inner.first().cloned().ok_or_else(not_indexable)?;
        if !is_integer_type(&index_ty.name) {
            return Err(error_at(
                &index.token,
                ErrorImpl::InvalidIndex {
                    expected: String::from("int"),
                    received: index_ty.full_name,
                },
            ));
        }
        return Ok(element);
    }

    if base_ty.is_map {
        let (Some(key), Some(value)) = (base_ty.inner.first(), base_ty.inner.get(1)) else {
            return Err(not_indexable());
        };
        if !types_match(key, &index_ty) {
            return Err(error_at(
                &index.token,
                ErrorImpl::InvalidIndex {
                    expected: key.full_name.clone(),
                    received: index_ty.full_name,
                },
            ));
        }
        return Ok(value.clone());
    }

    Err(not_indexable())
}

/// Looks `member` up on a class or a built-in container.
fn resolve_member(checker: &TypeChecker, expr: &Expr, owner: &TypeObj, member: &str) -> Result<MemberKind, Error> {
    let unknown = || {
        error_at(
            &expr.token,
            ErrorImpl::UnknownMember {
                owner: owner.full_name.clone(),
                member: String::from(member),
            },
        )
    };

    if owner.is_container {
        return checker
            .builtins
            .container_member(owner, member)
            .map(MemberKind::Method)
            .ok_or_else(unknown);
    }

    if !owner.is_class {
        return Err(unknown());
    }

    let symbols = checker.symbols;
    let members = match symbols.lookup(expr.scope, &owner.name).map(|symbol| &symbol.kind) {
        Some(SymbolKind::Class { members }) => *members,
        _ => return Err(error_at(&expr.token, ErrorImpl::UnknownType { type_: owner.full_name.clone() })),
    };

    let Some(symbol) = symbols.lookup_local(members, member) else {
        return Err(unknown());
    };

    match &symbol.kind {
        SymbolKind::Variable { ty } => Ok(MemberKind::Field(resolve_type(checker, ty, members)?)),
        SymbolKind::Function { params, returns } => Ok(MemberKind::Method(resolve_signature(
            checker, params, returns, members,
        )?)),
        SymbolKind::Parameter { .. } | SymbolKind::Class { .. } => Err(unknown()),
    }
}

/// Finds what a callee refers to without evaluating it as a value.
fn resolve_callee(checker: &mut TypeChecker, ctx: &Context, callee: &Expr) -> Result<Signature, Error> {
    match &callee.kind {
        ExprKind::VarRef { name } if name != "self" => {
            let symbols = checker.symbols;
            match symbols.lookup(callee.scope, name).map(|symbol| &symbol.kind) {
                Some(SymbolKind::Function { params, returns }) => {
                    resolve_signature(checker, params, returns, callee.scope)
                }
                Some(_) => Err(error_at(&callee.token, ErrorImpl::NotCallable { received: name.clone() })),
                None => checker.builtins.function(name).cloned().ok_or_else(|| {
                    error_at(&callee.token, ErrorImpl::UndeclaredSymbol { symbol: name.clone() })
                }),
            }
        }
        ExprKind::Dot { left, member } => {
            let owner = type_check_expr(checker, ctx, left)?;
            match resolve_member(checker, callee, &owner, member)? {
                MemberKind::Method(signature) => Ok(signature),
                MemberKind::Field(ty) => Err(error_at(&callee.token, ErrorImpl::NotCallable { received: ty.full_name })),
            }
        }
        _ => {
            let ty = type_check_expr(checker, ctx, callee)?;
            Err(error_at(&callee.token, ErrorImpl::NotCallable { received: ty.full_name }))
        }
    }
}

fn type_check_call(
    checker: &mut TypeChecker,
    ctx: &Context,
    expr: &Expr,
    callee: &Expr,
    arguments: &[Expr],
) -> Result<TypeObj, Error> {
    let signature = resolve_callee(checker, ctx, callee)?;

    if signature.params.len() != arguments.len() {
        return Err(error_at(
            &expr.token,
            ErrorImpl::ArgumentCountMismatch {
                expected: signature.params.len(),
                received: arguments.len(),
            },
        ));
    }

    for (param, argument) in signature.params.iter().zip(arguments.iter()) {
        let ty = type_check_expr(checker, ctx, argument)?;
        if !types_match(param, &ty) {
            return Err(error_at(
                &argument.token,
                ErrorImpl::ArgumentTypeMatchError {
                    expected: param.full_name.clone(),
                    received: ty.full_name,
                },
            ));
        }
    }

    Ok(signature.result())
}

fn type_check_list(checker: &mut TypeChecker, ctx: &Context, elements: &[Expr]) -> Result<TypeObj, Error> {
    let Some((first, rest)) = elements.split_first() else {
        return Ok(TypeObj::empty_list());
    };

    let mut element = type_check_expr(checker, ctx, first)?;
    for other in rest {
        let ty = type_check_expr(checker, ctx, other)?;
        if !types_match(&element, &ty) {
            return Err(mismatch(&other.token, &element, &ty));
        }
        // `[1, 2.5]` holds float literals.
        element = concrete_type(element, ty);
    }

    Ok(TypeObj::list(element))
}
