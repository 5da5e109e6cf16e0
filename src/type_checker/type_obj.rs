use std::fmt::Display;

use crate::ast::{ast::ReturnList, types::TypeExpr};

use super::primitives::{is_float_type, is_number_type, PrimitiveRegistry, FLOAT_LITERAL, INT_LITERAL};

/// Structural description of a type.
///
/// `name` is the base name (`int`, `Point`, `list`, `map`) and `full_name`
/// spells out the inner types as well (`[int]`, `map[string, int]`). Values
/// are built fresh wherever needed and compared with [`types_match`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeObj {
    pub full_name: String,
    pub name: String,
    pub is_literal: bool,
    pub is_number: bool,
    pub is_primitive: bool,
    pub is_container: bool,
    pub is_list: bool,
    pub is_map: bool,
    pub is_multi: bool,
    pub is_class: bool,
    pub is_enum: bool,
    pub is_typedef: bool,
    pub is_function: bool,
    pub inner: Vec<TypeObj>,
}

impl TypeObj {
    pub fn primitive(name: &str) -> Self {
        TypeObj {
            full_name: String::from(name),
            name: String::from(name),
            is_literal: name == INT_LITERAL || name == FLOAT_LITERAL,
            is_number: is_number_type(name),
            is_primitive: true,
            ..Default::default()
        }
    }

    pub fn class(name: &str) -> Self {
        TypeObj {
            full_name: String::from(name),
            name: String::from(name),
            is_class: true,
            ..Default::default()
        }
    }

    pub fn list(element: TypeObj) -> Self {
        TypeObj {
            full_name: format!("[{}]", element.full_name),
            name: String::from("list"),
            is_container: true,
            is_list: true,
            inner: vec![element],
            ..Default::default()
        }
    }

    /// Type of `[]`, which fits any list.
    pub fn empty_list() -> Self {
        TypeObj {
            full_name: String::from("[]"),
            name: String::from("list"),
            is_literal: true,
            is_container: true,
            is_list: true,
            ..Default::default()
        }
    }

    /// A generic container such as `map[K, V]`.
    pub fn container(name: &str, inner: Vec<TypeObj>) -> Self {
        TypeObj {
            full_name: format!("{}[{}]", name, join_names(&inner)),
            name: String::from(name),
            is_container: true,
            is_map: name == "map",
            inner,
            ..Default::default()
        }
    }

    /// An ordered set of types, one per value or result slot.
    pub fn multi(inner: Vec<TypeObj>) -> Self {
        TypeObj {
            full_name: format!("({})", join_names(&inner)),
            name: String::from("multi"),
            is_multi: true,
            inner,
            ..Default::default()
        }
    }

    /// Type of a function used as a value. The last inner type is the result list.
    pub fn function(params: Vec<TypeObj>, returns: TypeObj) -> Self {
        let full_name = format!("func({}) {}", join_names(&params), returns.full_name);
        let mut inner = params;
        inner.push(returns);

        TypeObj {
            full_name,
            name: String::from("func"),
            is_function: true,
            inner,
            ..Default::default()
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.full_name == name
    }

    pub fn is_int_literal(&self) -> bool {
        self.is_literal && self.name == INT_LITERAL
    }

    pub fn is_float_literal(&self) -> bool {
        self.is_literal && self.name == FLOAT_LITERAL
    }

    pub fn is_empty_list(&self) -> bool {
        self.is_literal && self.is_list
    }

    /// A result list holding only `void`.
    pub fn is_void_list(&self) -> bool {
        self.is_multi && self.inner.len() == 1 && self.inner[0].is_named("void")
    }
}

impl Display for TypeObj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

fn join_names(types: &[TypeObj]) -> String {
    types
        .iter()
        .map(|ty| ty.full_name.as_str())
        .collect::<Vec<&str>>()
        .join(", ")
}

/// Parameter and result types of something callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<TypeObj>,
    /// Always a multi, one inner type per result slot.
    pub returns: TypeObj,
}

impl Signature {
    pub fn new(params: Vec<TypeObj>, returns: Vec<TypeObj>) -> Self {
        Signature {
            params,
            returns: TypeObj::multi(returns),
        }
    }

    /// Type of a call: the single slot, or the whole multi.
    pub fn result(&self) -> TypeObj {
        match self.returns.inner.as_slice() {
            [single] => single.clone(),
            _ => self.returns.clone(),
        }
    }

    pub fn to_type_obj(&self) -> TypeObj {
        TypeObj::function(self.params.clone(), self.returns.clone())
    }
}

/// Converts an annotation without checking that class names exist.
///
/// Names found in the registry become primitives, every other name a class.
pub fn build_type_obj(ty: &TypeExpr, primitives: &PrimitiveRegistry) -> TypeObj {
    match ty {
        TypeExpr::Named { token } => primitives
            .get(&token.value)
            .unwrap_or_else(|| TypeObj::class(&token.value)),
        TypeExpr::List { inner, .. } => TypeObj::list(build_type_obj(inner, primitives)),
        TypeExpr::Generic { token, args } => TypeObj::container(
            &token.value,
            args.iter().map(|arg| build_type_obj(arg, primitives)).collect(),
        ),
    }
}

pub fn build_return_list(returns: &ReturnList, primitives: &PrimitiveRegistry) -> TypeObj {
    TypeObj::multi(
        returns
            .types
            .iter()
            .map(|ty| build_type_obj(ty, primitives))
            .collect(),
    )
}

pub fn build_type_list(types: Vec<TypeObj>) -> TypeObj {
    TypeObj::multi(types)
}

/// Structural compatibility, symmetric in its arguments.
pub fn types_match(a: &TypeObj, b: &TypeObj) -> bool {
    if (a.is_int_literal() && b.is_number) || (b.is_int_literal() && a.is_number) {
        return true;
    }

    if a.is_float_literal() || b.is_float_literal() {
        return a.is_number && b.is_number && is_float_type(&a.name) && is_float_type(&b.name);
    }

    if (a.is_named("nil") && (b.is_class || b.is_container)) || (b.is_named("nil") && (a.is_class || a.is_container)) {
        return true;
    }

    if (a.is_empty_list() && b.is_list) || (b.is_empty_list() && a.is_list) {
        return true;
    }

    if a.is_container && b.is_container {
        return a.name == b.name && inner_match(a, b);
    }

    if a.is_multi && b.is_multi {
        return inner_match(a, b);
    }

    a.full_name == b.full_name
}

/// Picks the type two matching operands share.
///
/// A concrete type wins over a literal, and a float literal over an int literal.
pub fn concrete_type(a: TypeObj, b: TypeObj) -> TypeObj {
    match (a.is_literal, b.is_literal) {
        (false, _) => a,
        (true, false) => b,
        (true, true) if b.is_float_literal() => b,
        (true, true) => a,
    }
}

fn inner_match(a: &TypeObj, b: &TypeObj) -> bool {
    a.inner.len() == b.inner.len() && a.inner.iter().zip(b.inner.iter()).all(|(x, y)| types_match(x, y))
}
