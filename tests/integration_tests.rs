//! Integration tests for the whole front end.
//!
//! These tests drive tokenization, parsing and type checking on Knox source
//! and inspect the checked program or the first error.

use std::rc::Rc;

use indoc::{formatdoc, indoc};
use knox::{
    ast::{
        ast::{Decl, Program},
        expressions::{BinaryOp, ExprKind},
        printer::print_program,
        statements::Stmt,
    },
    compile_source, format_error,
    errors::errors::{Error, ErrorPhase},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::analyze,
};

fn compile(source: &str) -> Result<Program, Error> {
    compile_source(source, "test.knox")
}

fn compile_err(source: &str) -> Error {
    match compile(source) {
        Ok(_) => panic!("expected compilation to fail"),
        Err(error) => error,
    }
}

#[test]
fn test_end_to_end_program() {
    let source = "func main() void { var x : int = 1 + 2; if x == 3 { var y : bool = true; } }";

    let tokens = tokenize(source, Some("test.knox".to_string())).unwrap();
    let mut program = parse(tokens, Rc::new("test.knox".to_string())).unwrap();

    assert_eq!(program.declarations.len(), 1);
    let Decl::Func(main) = &program.declarations[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(main.name, "main");
    assert_eq!(main.body.statements.len(), 2);
    assert!(matches!(main.body.statements[0], Stmt::VarDecl(_)));
    assert!(matches!(main.body.statements[1], Stmt::If(_)));

    assert!(analyze(&mut program).is_ok());
}

#[test]
fn test_end_to_end_mismatch_reports_addition_line() {
    let source = indoc! {r#"
        func main() void {
            var x : int = 1
                + "a";
        }
    "#};

    let error = compile_err(source);
    assert_eq!(error.get_error_name(), "MismatchedTypes");
    assert_eq!(error.get_phase(), ErrorPhase::Semantic);
    // The `+` sits on the third line.
    assert_eq!(error.get_line(), 3);
}

#[test]
fn test_single_line_mismatch() {
    let error = compile_err("func main() void { var x : int = 1 + \"a\"; }");

    assert_eq!(error.get_error_name(), "MismatchedTypes");
    assert_eq!(error.get_line(), 1);
}

#[test]
fn test_inner_block_names_do_not_escape() {
    let source = indoc! {"
        func main() void {
            if true {
                var inner : int = 1;
            }
            inner = 2;
        }
    "};

    let error = compile_err(source);
    assert_eq!(error.get_error_name(), "UndeclaredSymbol");
    assert_eq!(error.get_line(), 5);
}

#[test]
fn test_redeclaration_in_block() {
    let source = indoc! {"
        func main() void {
            var a : int = 1;
            var a : int = 2;
        }
    "};

    let error = compile_err(source);
    assert_eq!(error.get_error_name(), "SymbolAlreadyDeclared");
    assert_eq!(error.get_phase(), ErrorPhase::Syntax);
    assert_eq!(error.get_line(), 3);
}

#[test]
fn test_numeric_coercion() {
    assert!(compile("func main() void { var f : float = 1; }").is_ok());
    assert_eq!(
        compile_err("func main() void { var i : int = 1.0; }").get_error_name(),
        "MismatchedTypes"
    );
}

#[test]
fn test_float_literals_fit_float_types() {
    let source = indoc! {"
        func scale(value: f32) f32 {
            return value * 0.5;
        }

        func main() void {
            var half : f32 = scale(1.5);
            var wide : f64 = 2.25;
        }
    "};
    assert!(compile(source).is_ok());

    let error = compile_err("func main() void { var count : u32 = 0.5; }");
    assert_eq!(error.get_error_name(), "MismatchedTypes");
}

#[test]
fn test_returning_a_multi_value_call() {
    let source = indoc! {"
        func bounds() (int, int) {
            return 0, 10;
        }

        func forward() (int, int) {
            return bounds();
        }
    "};
    assert!(compile(source).is_ok());
}

#[test]
fn test_void_variables_are_rejected() {
    let error = compile_err("func main() void { var v : void = println(\"a\"); }");
    assert_eq!(error.get_error_name(), "VoidDeclaration");
    assert_eq!(error.get_phase(), ErrorPhase::Semantic);
}

#[test]
fn test_nil_for_classes_only() {
    let source = indoc! {"
        class MyClass {
            var value : int = 0;
        }

        func main() void {
            var c : MyClass = nil;
        }
    "};
    assert!(compile(source).is_ok());

    assert_eq!(
        compile_err("func main() void { var n : int = nil; }").get_error_name(),
        "MismatchedTypes"
    );
}

#[test]
fn test_list_types_compare_structurally() {
    let source = indoc! {"
        func main() void {
            var a : [int] = [1, 2];
            var b : [int] = a;
        }
    "};
    assert!(compile(source).is_ok());

    let source = indoc! {"
        func main() void {
            var a : [int] = [1, 2];
            var b : [float] = a;
        }
    "};
    assert_eq!(compile_err(source).get_error_name(), "MismatchedTypes");

    let source = indoc! {"
        func main() void {
            var a : [int] = [1, 2];
            var b : map[int, int] = a;
        }
    "};
    assert_eq!(compile_err(source).get_error_name(), "MismatchedTypes");
}

#[test]
fn test_call_arguments() {
    let source = |call: &str| {
        formatdoc!(
            "
            func f(a: int) int {{
                return a;
            }}

            func main() void {{
                {}
            }}
            ",
            call
        )
    };

    assert!(compile(&source("var r : int = f(1);")).is_ok());

    let error = compile_err(&source("f(\"x\");"));
    assert_eq!(error.get_error_name(), "ArgumentTypeMatchError");
    assert_eq!(error.get_line(), 6);

    assert_eq!(compile_err(&source("f(1, 2);")).get_error_name(), "ArgumentCountMismatch");
}

#[test]
fn test_void_returns() {
    assert!(compile("func main() void { return; }").is_ok());
    assert_eq!(
        compile_err("func main() void { return 1; }").get_error_name(),
        "ReturnTypeMatchError"
    );
}

#[test]
fn test_string_concatenation_is_marked() {
    let source = indoc! {r#"
        func greet(name: string) string {
            return "hello " + name;
        }
    "#};

    let program = compile(source).unwrap();
    let printed = print_program(&program);
    assert!(printed.contains("Binary Concat"));

    let Decl::Func(greet) = &program.declarations[0] else {
        panic!("expected a function declaration");
    };
    let Stmt::Jump(ret) = &greet.body.statements[0] else {
        panic!("expected a return");
    };
    assert!(matches!(ret.values[0].kind, ExprKind::Binary { op: BinaryOp::Concat, .. }));
}

#[test]
fn test_full_program() {
    let source = indoc! {r#"
        class Stack {
            var items : [int] = [];

            func push(value: int) void {
                self.items.append(value);
            }

            func pop() (int, bool) {
                if self.items.length() == 0 {
                    return 0, false;
                }
                return self.items.pop(), true;
            }
        }

        func sum(values: [int]) int {
            var total : int = 0;
            for var value : int in values {
                total = total + value;
            }
            return total;
        }

        func main() void {
            var stack : Stack = new Stack;
            stack.push(1);
            stack.push(2);

            var top : int = 0;
            var ok : bool = false;
            top, ok = stack.pop();

            var counts : map[string, int] = new map[string, int];
            counts["a"] = 1;
            for var key : string in counts {
                println(key + ": " + string(counts[key]));
            }

            var i : int = 0;
            while i < 10 {
                i = i + 1;
                if i == 5 {
                    continue;
                } else if i > 8 {
                    break;
                }
            }

            println(string(sum([1, 2, 3]) + top));
        }
    "#};

    let program = compile(source).unwrap();
    assert_eq!(program.classes().count(), 1);
    assert_eq!(program.functions().count(), 2);
}

#[test]
fn test_format_error_snippet() {
    let source = indoc! {"
        func main() void {
            var x : int = y;
        }
    "};

    let error = compile_err(source);
    let rendered = format_error(&error, source);

    assert!(rendered.starts_with("Error: UndeclaredSymbol"));
    assert!(rendered.contains("-> test.knox:2"));
    assert!(rendered.contains("2 | var x : int = y;"));
}

#[test]
fn test_lexer_error_surfaces() {
    let error = compile_err("func main() void { var x : int = 1 $ 2; }");

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_phase(), ErrorPhase::Syntax);
}
