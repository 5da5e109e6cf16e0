//! Unit tests for the type checker module.
//!
//! This module contains tests for:
//! - The primitive registry and name classification
//! - TypeObj construction and structural matching
//! - Built-in functions and container methods
//! - Checking rules for statements and expressions

use std::rc::Rc;

use crate::{
    ast::{
        ast::Program,
        expressions::{BinaryOp, ExprKind},
    },
    compile_source,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
};

use super::{
    builtins::Builtins,
    primitives::{
        is_castable_type, is_float_type, is_integer_type, is_number_type, is_primitive_type, PrimitiveRegistry,
        FLOAT_LITERAL, INT_LITERAL,
    },
    type_checker::{apply_rewrites, check, resolve_type, Rewrite, TypeChecker},
    type_obj::{build_return_list, build_type_obj, concrete_type, types_match, Signature, TypeObj},
};

fn parse_only(source: &str) -> Program {
    let tokens = tokenize(source, Some("test.knox".to_string())).unwrap();
    parse(tokens, Rc::new("test.knox".to_string())).unwrap()
}

fn check_source(source: &str) -> Result<Program, Error> {
    compile_source(source, "test.knox")
}

/// Wraps statements in `func main() void { ... }` and checks them.
fn check_body(body: &str) -> Result<Program, Error> {
    check_source(&format!("func main() void {{\n{}\n}}", body))
}

fn error_name(result: Result<Program, Error>) -> String {
    result.unwrap_err().get_error_name().to_string()
}

fn int() -> TypeObj {
    TypeObj::primitive("int")
}

fn float() -> TypeObj {
    TypeObj::primitive("float")
}

fn literal() -> TypeObj {
    TypeObj::primitive(INT_LITERAL)
}

fn float_literal() -> TypeObj {
    TypeObj::primitive(FLOAT_LITERAL)
}

#[test]
fn test_registry_contents() {
    let registry = PrimitiveRegistry::new();

    for name in ["void", "bool", "int", "float", "string", "nil", INT_LITERAL, FLOAT_LITERAL, "i8", "u64", "f32"] {
        assert!(registry.contains(name), "missing {}", name);
    }
    assert_eq!(registry.len(), 18);
    assert!(!registry.contains("Point"));
}

#[test]
fn test_name_classification() {
    assert!(is_number_type("int"));
    assert!(is_number_type("f64"));
    assert!(is_number_type(INT_LITERAL));
    assert!(is_number_type(FLOAT_LITERAL));
    assert!(!is_number_type("string"));

    assert!(is_integer_type("u8"));
    assert!(!is_integer_type("float"));
    assert!(!is_integer_type(FLOAT_LITERAL));
    assert!(is_float_type("f32"));
    assert!(!is_float_type(INT_LITERAL));

    assert!(is_primitive_type("bool"));
    assert!(!is_primitive_type("Point"));

    assert!(is_castable_type("string"));
    assert!(!is_castable_type("void"));
    assert!(!is_castable_type(INT_LITERAL));
    assert!(!is_castable_type(FLOAT_LITERAL));
}

#[test]
fn test_primitive_facets() {
    let registry = PrimitiveRegistry::new();

    let int = registry.get("int").unwrap();
    assert!(int.is_primitive && int.is_number && !int.is_literal);

    let literal = registry.get(INT_LITERAL).unwrap();
    assert!(literal.is_literal && literal.is_number);

    let string = registry.get("string").unwrap();
    assert!(string.is_primitive && !string.is_number);
}

#[test]
fn test_full_names() {
    assert_eq!(TypeObj::list(int()).full_name, "[int]");
    assert_eq!(TypeObj::container("map", vec![TypeObj::primitive("string"), int()]).full_name, "map[string, int]");
    assert_eq!(TypeObj::multi(vec![int(), float()]).to_string(), "(int, float)");
    assert_eq!(TypeObj::class("Point").name, "Point");
}

#[test]
fn test_literal_matches_numbers() {
    assert!(types_match(&literal(), &int()));
    assert!(types_match(&float(), &literal()));
    assert!(types_match(&literal(), &TypeObj::primitive("u8")));
    assert!(!types_match(&literal(), &TypeObj::primitive("string")));
    assert!(!types_match(&float(), &int()));
}

#[test]
fn test_float_literal_matches_float_types() {
    assert!(types_match(&float_literal(), &float()));
    assert!(types_match(&TypeObj::primitive("f32"), &float_literal()));
    assert!(types_match(&float_literal(), &TypeObj::primitive("f64")));
    assert!(types_match(&float_literal(), &literal()));
    assert!(!types_match(&float_literal(), &int()));
    assert!(!types_match(&TypeObj::primitive("u8"), &float_literal()));
    assert!(!types_match(&float_literal(), &TypeObj::primitive("string")));
}

#[test]
fn test_concrete_type_prefers_declared_side() {
    assert_eq!(concrete_type(literal(), int()), int());
    assert_eq!(concrete_type(int(), literal()), int());
    assert_eq!(concrete_type(float_literal(), TypeObj::primitive("f32")), TypeObj::primitive("f32"));
    assert_eq!(concrete_type(literal(), float_literal()), float_literal());
    assert_eq!(concrete_type(float_literal(), literal()), float_literal());
}

#[test]
fn test_nil_matches_references() {
    let nil = TypeObj::primitive("nil");

    assert!(types_match(&nil, &TypeObj::class("Point")));
    assert!(types_match(&TypeObj::list(int()), &nil));
    assert!(!types_match(&nil, &int()));
    assert!(types_match(&nil, &nil));
}

#[test]
fn test_container_matching() {
    let list_int = TypeObj::list(int());

    assert!(types_match(&list_int, &TypeObj::list(int())));
    assert!(!types_match(&list_int, &TypeObj::list(float())));
    assert!(!types_match(&list_int, &TypeObj::container("map", vec![int(), int()])));
    assert!(types_match(&list_int, &TypeObj::list(literal())));
    assert!(types_match(&list_int, &TypeObj::empty_list()));
    assert!(!types_match(&TypeObj::empty_list(), &TypeObj::container("map", vec![int(), int()])));

    // Same container name, different number of inner types.
    let map_one = TypeObj::container("map", vec![int()]);
    let map_two = TypeObj::container("map", vec![int(), int()]);
    assert!(!types_match(&map_one, &map_two));
    assert!(!types_match(&map_two, &map_one));
    assert!(types_match(&map_two, &TypeObj::container("map", vec![literal(), int()])));

    let mut list_pair = TypeObj::list(int());
    list_pair.inner.push(int());
    assert!(!types_match(&list_int, &list_pair));
}

#[test]
fn test_multi_matching() {
    let pair = TypeObj::multi(vec![int(), TypeObj::primitive("string")]);

    assert!(types_match(&pair, &TypeObj::multi(vec![literal(), TypeObj::primitive("string")])));
    assert!(!types_match(&pair, &TypeObj::multi(vec![int()])));
    assert!(!types_match(&pair, &int()));
}

#[test]
fn test_build_type_obj() {
    let program = parse_only("func f(a: int, b: Point, c: [float], d: map[string, [int]]) (int, bool) { }");
    let registry = PrimitiveRegistry::new();
    let func = program.functions().next().unwrap();

    let types: Vec<TypeObj> = func.params.params.iter().map(|p| build_type_obj(&p.ty, &registry)).collect();
    assert!(types[0].is_primitive);
    assert!(types[1].is_class);
    assert!(types[2].is_list);
    assert!(types[3].is_map);
    assert_eq!(types[3].full_name, "map[string, [int]]");

    let returns = build_return_list(&func.returns, &registry);
    assert!(returns.is_multi);
    assert_eq!(returns.inner.len(), 2);
}

#[test]
fn test_resolve_type_builds_checked_annotations() {
    let program = parse_only("class Point { }
func f(a: int, b: Point, c: [float], d: map[string, [Point]]) int { }");
    let checker = TypeChecker::new(&program.symbols);
    let func = program.functions().next().unwrap();

    for param in func.params.params.iter() {
        let resolved = resolve_type(&checker, &param.ty, func.body.scope).unwrap();
        assert_eq!(resolved, build_type_obj(&param.ty, &checker.primitives));
    }

    // The builder accepts any generic, resolution does not.
    let program = parse_only("func f(a: set[int]) void { }");
    let checker = TypeChecker::new(&program.symbols);
    let func = program.functions().next().unwrap();
    let ty = &func.params.params[0].ty;
    assert!(build_type_obj(ty, &checker.primitives).is_container);
    let error = resolve_type(&checker, ty, func.body.scope).unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownType");
}

#[test]
fn test_signature_result() {
    let single = Signature::new(vec![], vec![int()]);
    assert_eq!(single.result(), int());

    let pair = Signature::new(vec![], vec![int(), float()]);
    assert!(pair.result().is_multi);
    assert!(pair.to_type_obj().is_function);
}

#[test]
fn test_builtin_tables() {
    let registry = PrimitiveRegistry::new();
    let builtins = Builtins::new(&registry);

    assert_eq!(builtins.function("print").unwrap().params.len(), 1);
    assert!(builtins.function("input").unwrap().params.is_empty());
    assert!(builtins.function("exit").is_none());

    let list = TypeObj::list(float());
    assert_eq!(builtins.container_member(&list, "append").unwrap().params, vec![float()]);
    assert_eq!(builtins.container_member(&list, "pop").unwrap().result(), float());
    assert!(builtins.container_member(&list, "has").is_none());

    let map = TypeObj::container("map", vec![TypeObj::primitive("string"), int()]);
    assert_eq!(builtins.container_member(&map, "keys").unwrap().result().full_name, "[string]");
    assert!(builtins.container_member(&int(), "length").is_none());
}

#[test]
fn test_numeric_literal_coercion() {
    assert!(check_body("var f : float = 1;").is_ok());
    assert!(check_body("var u : u8 = 255;").is_ok());
    assert!(check_body("var a : f32 = 1.5; var d : f64 = 2; var g : f32 = a * 2.0;").is_ok());
    assert!(check_body("var xs : [f32] = [1, 2.5];").is_ok());
    assert_eq!(error_name(check_body("var i : int = 1.0;")), "MismatchedTypes");
    assert_eq!(error_name(check_body("var u : u8 = 1.5 + 1;")), "MismatchedTypes");
    assert_eq!(error_name(check_body("var xs : [int] = [1, 2.5];")), "MismatchedTypes");
    assert_eq!(error_name(check_body("var d : f64 = 1.5; var f : f32 = d;")), "MismatchedTypes");
    assert_eq!(error_name(check_body("var s : string = 1;")), "MismatchedTypes");
}

#[test]
fn test_nil_assignment() {
    assert!(check_source("class Node { }\nfunc main() void { var n : Node = nil; var l : [int] = nil; }").is_ok());
    assert_eq!(error_name(check_body("var n : int = nil;")), "MismatchedTypes");
}

#[test]
fn test_unknown_types() {
    assert_eq!(error_name(check_body("var p : Point = nil;")), "UnknownType");
    assert_eq!(error_name(check_body("var s : set[int] = nil;")), "UnknownType");
    assert_eq!(error_name(check_source("func f(p: Missing) void { }")), "UnknownType");
    assert_eq!(error_name(check_body("var x : INT_LITERAL = 1;")), "UnknownType");
}

#[test]
fn test_multiple_names_take_multi_value() {
    let source = "func pair() (int, int) { return 1, 2; }\nfunc main() void { var a, b : int = pair(); }";
    assert!(check_source(source).is_ok());

    let source = "func one() int { return 1; }\nfunc main() void { var a, b : int = one(); }";
    assert_eq!(error_name(check_source(source)), "MismatchedTypes");
}

#[test]
fn test_assignment() {
    assert!(check_body("var a : int = 1; a = 2;").is_ok());
    assert_eq!(error_name(check_body("var a : int = 1; a = \"x\";")), "MismatchedTypes");

    let source = "func pair() (int, string) { return 1, \"a\"; }\nfunc main() void { var a : int = 0; var s : string = \"\"; a, s = pair(); }";
    assert!(check_source(source).is_ok());
}

#[test]
fn test_conditions_must_be_bool() {
    assert!(check_body("if 1 < 2 { } else if true { } else { }").is_ok());
    assert_eq!(error_name(check_body("if 1 { }")), "NonBooleanCondition");
    assert_eq!(error_name(check_body("while \"yes\" { }")), "NonBooleanCondition");
}

#[test]
fn test_for_loops() {
    assert!(check_body("var xs : [int] = [1, 2]; for var x : int in xs { }").is_ok());
    assert!(check_body("var m : map[string, int] = nil; for var k : string in m { }").is_ok());
    assert_eq!(error_name(check_body("var xs : [int] = [1]; for var x : string in xs { }")), "MismatchedTypes");
    assert_eq!(error_name(check_body("for var x : int in 5 { }")), "NotIterable");
}

#[test]
fn test_jumps() {
    assert!(check_body("while true { break; }").is_ok());
    assert!(check_body("var xs : [int] = []; for var x : int in xs { if x > 1 { continue; } }").is_ok());
    assert_eq!(error_name(check_body("break;")), "JumpOutsideLoop");
    assert_eq!(error_name(check_body("while true { break 1; }")), "UnexpectedJumpValues");
}

#[test]
fn test_returns() {
    assert!(check_body("return;").is_ok());
    assert_eq!(error_name(check_body("return 1;")), "ReturnTypeMatchError");
    assert!(check_source("func f() int { return 1; }").is_ok());
    assert_eq!(error_name(check_source("func f() int { return; }")), "ReturnTypeMatchError");
    assert_eq!(error_name(check_source("func f() int { return \"a\"; }")), "ReturnTypeMatchError");
    assert_eq!(error_name(check_source("func f() (int, int) { return 1; }")), "ReturnTypeMatchError");

    // A call returning several values can be returned as a whole.
    let pair = "func g() (int, int) { return 1, 2; }
";
    assert!(check_source(&format!("{}func f() (int, int) {{ return g(); }}", pair)).is_ok());
    assert_eq!(
        error_name(check_source(&format!("{}func f() (int, string) {{ return g(); }}", pair))),
        "ReturnTypeMatchError"
    );
    assert_eq!(
        error_name(check_source(&format!("{}func f() (int, int, int) {{ return g(); }}", pair))),
        "ReturnTypeMatchError"
    );
}

#[test]
fn test_void_declarations() {
    assert_eq!(error_name(check_body("var v : void = println(\"a\");")), "VoidDeclaration");
    assert_eq!(error_name(check_source("func f(x: void) void { }")), "VoidDeclaration");
    assert_eq!(error_name(check_body("var xs : [int] = [1]; for var x : void in xs { }")), "VoidDeclaration");
    assert!(check_source("func f() void { }").is_ok());
}

#[test]
fn test_calls() {
    let decl = "func f(a: int) int { return a; }\n";

    assert!(check_source(&format!("{}func main() void {{ var x : int = f(1); }}", decl)).is_ok());
    assert_eq!(
        error_name(check_source(&format!("{}func main() void {{ f(\"x\"); }}", decl))),
        "ArgumentTypeMatchError"
    );
    assert_eq!(
        error_name(check_source(&format!("{}func main() void {{ f(1, 2); }}", decl))),
        "ArgumentCountMismatch"
    );
    assert_eq!(
        error_name(check_source(&format!("{}func main() void {{ var s : string = f(1); }}", decl))),
        "MismatchedTypes"
    );
    assert_eq!(error_name(check_body("missing();")), "UndeclaredSymbol");
    assert_eq!(error_name(check_body("var x : int = 1; x();")), "NotCallable");
}

#[test]
fn test_functions_can_be_called_before_declaration() {
    assert!(check_source("func main() void { helper(); }\nfunc helper() void { }").is_ok());
}

#[test]
fn test_builtin_functions() {
    assert!(check_body("print(\"a\"); println(input());").is_ok());
    assert_eq!(error_name(check_body("print(1);")), "ArgumentTypeMatchError");
}

#[test]
fn test_user_function_shadows_builtin() {
    assert!(check_source("func print(x: int) void { }\nfunc main() void { print(1); }").is_ok());
}

#[test]
fn test_variable_references() {
    assert_eq!(error_name(check_body("var x : int = y;")), "UndeclaredSymbol");
    assert_eq!(error_name(check_body("var x : int = x;")), "UseBeforeDeclaration");
    assert_eq!(error_name(check_body("if true { x = 1; }\nvar x : int = 0;")), "UseBeforeDeclaration");
    assert_eq!(error_name(check_source("class Point { }\nfunc main() void { var p : Point = Point; }")), "NotAValue");
}

#[test]
fn test_inner_scope_not_visible_after_block() {
    assert_eq!(error_name(check_body("if true { var y : int = 1; }\ny = 2;")), "UndeclaredSymbol");
}

#[test]
fn test_binary_operators() {
    assert!(check_body("var x : int = 1 + 2 * 3; var y : float = 1.5 / 2;").is_ok());
    assert!(check_body("var b : bool = 1 < 2 && !false || 3 == 4;").is_ok());
    assert!(check_body("var s : string = \"a\" + \"b\";").is_ok());
    assert_eq!(error_name(check_body("var s : string = \"a\" - \"b\";")), "InvalidOperation");
    assert_eq!(error_name(check_body("var b : bool = \"a\" < \"b\";")), "InvalidOperation");
    assert_eq!(error_name(check_body("var b : bool = 1 && 2;")), "InvalidOperation");
    assert_eq!(error_name(check_body("var x : int = 1; var f : float = 1.5; var z : int = x + f;")), "MismatchedTypes");
}

#[test]
fn test_unary_operators() {
    assert!(check_body("var x : int = -1; var b : bool = !true; var f : float = +2.5;").is_ok());
    assert_eq!(error_name(check_body("var b : bool = !1;")), "InvalidOperation");
    assert_eq!(error_name(check_body("var s : string = -\"a\";")), "InvalidOperation");
}

#[test]
fn test_casts() {
    assert!(check_body("var f : float = float(1); var s : string = string(2.5); var i : int = int(\"3\");").is_ok());
    assert_eq!(error_name(check_body("var xs : [int] = []; var i : int = int(xs);")), "IllegalCast");
}

#[test]
fn test_list_operations() {
    let body = "var xs : [int] = [1, 2, 3];\nvar first : int = xs[0];\nxs.append(4);\nvar n : int = xs.length();\nvar last : int = xs.pop();\nxs[1] = 5;";
    assert!(check_body(body).is_ok());

    assert_eq!(error_name(check_body("var xs : [int] = [1, \"a\"];")), "MismatchedTypes");
    assert_eq!(error_name(check_body("var xs : [int] = [1]; var x : int = xs[\"a\"];")), "InvalidIndex");
    assert_eq!(error_name(check_body("var xs : [int] = [1]; xs.append(\"a\");")), "ArgumentTypeMatchError");
    assert_eq!(error_name(check_body("var xs : [int] = [1]; xs.push(1);")), "UnknownMember");
    assert_eq!(error_name(check_body("var x : int = 1; var y : int = x[0];")), "NotIndexable");
}

#[test]
fn test_map_operations() {
    let body = "var m : map[string, int] = new map[string, int];\nvar v : int = m[\"a\"];\nvar found : bool = m.has(\"a\");\nvar keys : [string] = m.keys();\nm[\"b\"] = 2;";
    assert!(check_body(body).is_ok());

    assert_eq!(error_name(check_body("var m : map[string, int] = nil; var v : int = m[1];")), "InvalidIndex");
}

#[test]
fn test_classes() {
    let source = "class Counter {\n  var count : int = 0;\n  func increment(by: int) int {\n    self.count = self.count + by;\n    return self.count;\n  }\n}\nfunc main() void {\n  var c : Counter = new Counter;\n  var n : int = c.increment(2);\n  c.count = 3;\n}";
    assert!(check_source(source).is_ok());

    let source = "class Counter { var count : int = 0; }\nfunc main() void { var c : Counter = new Counter; c.total = 1; }";
    assert_eq!(error_name(check_source(source)), "UnknownMember");

    let source = "class Counter { var count : int = 0; }\nfunc main() void { var c : Counter = new Counter; c.count(); }";
    assert_eq!(error_name(check_source(source)), "NotCallable");
}

#[test]
fn test_methods_without_call_are_function_values() {
    let program = parse_only("class A { func get() int { return 1; } }\nfunc main() void { var a : A = new A; a.get; }");
    assert!(check(&program).is_ok());
}

#[test]
fn test_self_outside_class() {
    assert_eq!(error_name(check_body("self;")), "SelfOutsideClass");
}

fn find_binary(program: &Program) -> Option<BinaryOp> {
    let mut found = None;
    program.clone().for_each_expr_mut(&mut |expr| {
        if let ExprKind::Binary { op, .. } = &expr.kind {
            found = Some(*op);
        }
    });
    found
}

#[test]
fn test_check_collects_concat_rewrite() {
    let mut program = parse_only("func main() void { var s : string = \"a\" + \"b\"; }");

    let rewrites = check(&program).unwrap();
    assert_eq!(rewrites.len(), 1);
    assert!(matches!(rewrites[0], Rewrite::Concat(_)));
    // Checking alone leaves the tree untouched.
    assert_eq!(find_binary(&program), Some(BinaryOp::Add));

    apply_rewrites(&mut program, &rewrites);
    assert_eq!(find_binary(&program), Some(BinaryOp::Concat));
}

#[test]
fn test_numeric_add_is_not_rewritten() {
    let program = check_body("var x : int = 1 + 2;").unwrap();

    assert_eq!(find_binary(&program), Some(BinaryOp::Add));
}

#[test]
fn test_failed_check_leaves_program_unchanged() {
    let mut program = parse_only("func main() void { var s : string = \"a\" + \"b\"; var x : int = \"c\"; }");
    let before = program.clone();

    assert!(super::type_checker::analyze(&mut program).is_err());
    assert_eq!(program, before);
}
