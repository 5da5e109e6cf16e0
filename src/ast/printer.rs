//! Indented dump of a program, one node per line.

use super::{
    ast::{Block, Decl, FuncDecl, Member, Program},
    expressions::{Expr, ExprKind},
    statements::{Stmt, VarDecl},
};

const INDENT: &str = "  ";

pub fn print_program(program: &Program) -> String {
    let mut out = String::new();
    line(&mut out, 0, "Program");

    for decl in program.declarations.iter() {
        match decl {
            Decl::Class(class) => {
                line(&mut out, 1, &format!("Class {}", class.name));
                for member in class.body.members.iter() {
                    match member {
                        Member::Var(var) => print_var_decl(&mut out, 2, var),
                        Member::Func(func) => print_func(&mut out, 2, func),
                    }
                }
            }
            Decl::Func(func) => print_func(&mut out, 1, func),
        }
    }

    out
}

fn line(out: &mut String, depth: usize, text: &str) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(text);
    out.push('\n');
}

fn print_func(out: &mut String, depth: usize, func: &FuncDecl) {
    let params: Vec<String> = func
        .params
        .params
        .iter()
        .map(|param| format!("{}: {}", param.name, param.ty))
        .collect();
    let returns: Vec<String> = func.returns.types.iter().map(|ty| ty.to_string()).collect();

    line(
        out,
        depth,
        &format!("Func {}({}) ({})", func.name, params.join(", "), returns.join(", ")),
    );
    print_block(out, depth + 1, &func.body);
}

fn print_var_decl(out: &mut String, depth: usize, var: &VarDecl) {
    let names: Vec<&str> = var.names.iter().map(|name| name.value.as_str()).collect();
    line(out, depth, &format!("Var {} : {}", names.join(", "), var.ty));
    print_expr(out, depth + 1, &var.value);
}

fn print_block(out: &mut String, depth: usize, block: &Block) {
    line(out, depth, "Block");
    for stmt in block.statements.iter() {
        print_stmt(out, depth + 1, stmt);
    }
}

fn print_stmt(out: &mut String, depth: usize, stmt: &Stmt) {
    match stmt {
        Stmt::VarDecl(var) => print_var_decl(out, depth, var),
        Stmt::Assign(assign) => {
            line(out, depth, "Assign");
            for target in assign.targets.iter() {
                print_expr(out, depth + 1, target);
            }
            print_expr(out, depth + 1, &assign.value);
        }
        Stmt::If(stmt) => {
            for (i, branch) in stmt.branches.iter().enumerate() {
                line(out, depth, if i == 0 { "If" } else { "ElseIf" });
                print_expr(out, depth + 1, &branch.condition);
                print_block(out, depth + 1, &branch.block);
            }
            if let Some(block) = &stmt.else_block {
                line(out, depth, "Else");
                print_block(out, depth + 1, block);
            }
        }
        Stmt::For(stmt) => {
            line(out, depth, &format!("For {} : {}", stmt.variable.value, stmt.variable_ty));
            print_expr(out, depth + 1, &stmt.iterable);
            print_block(out, depth + 1, &stmt.body);
        }
        Stmt::While(stmt) => {
            line(out, depth, "While");
            print_expr(out, depth + 1, &stmt.condition);
            print_block(out, depth + 1, &stmt.body);
        }
        Stmt::Jump(stmt) => {
            line(out, depth, &stmt.kind.to_string());
            for value in stmt.values.iter() {
                print_expr(out, depth + 1, value);
            }
        }
        Stmt::Expression(stmt) => print_expr(out, depth, &stmt.expression),
    }
}

fn print_expr(out: &mut String, depth: usize, expr: &Expr) {
    match &expr.kind {
        ExprKind::Binary { op, left, right } => {
            line(out, depth, &format!("Binary {:?}", op));
            print_expr(out, depth + 1, left);
            print_expr(out, depth + 1, right);
        }
        ExprKind::Unary { op, operand } => {
            line(out, depth, &format!("Unary {}", op));
            print_expr(out, depth + 1, operand);
        }
        ExprKind::Index { base, index } => {
            line(out, depth, "Index");
            print_expr(out, depth + 1, base);
            print_expr(out, depth + 1, index);
        }
        ExprKind::Dot { left, member } => {
            line(out, depth, &format!("Dot .{}", member));
            print_expr(out, depth + 1, left);
        }
        ExprKind::Cast { target, value } => {
            line(out, depth, &format!("Cast {}", target));
            print_expr(out, depth + 1, value);
        }
        ExprKind::New { ty } => line(out, depth, &format!("New {}", ty)),
        ExprKind::Call { callee, arguments } => {
            line(out, depth, "Call");
            print_expr(out, depth + 1, callee);
            for argument in arguments.iter() {
                print_expr(out, depth + 1, argument);
            }
        }
        ExprKind::VarRef { name } => line(out, depth, &format!("VarRef {}", name)),
        ExprKind::List { elements } => {
            line(out, depth, "List");
            for element in elements.iter() {
                print_expr(out, depth + 1, element);
            }
        }
        ExprKind::Int(value) => line(out, depth, &format!("Int {}", value)),
        ExprKind::Float(value) => line(out, depth, &format!("Float {}", value)),
        ExprKind::String(value) => line(out, depth, &format!("String {:?}", value)),
        ExprKind::Bool(value) => line(out, depth, &format!("Bool {}", value)),
        ExprKind::Nil => line(out, depth, "Nil"),
    }
}
