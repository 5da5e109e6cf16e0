//! Built-in primitive types and name classification.

use std::collections::HashMap;

use super::type_obj::TypeObj;

/// Type of an integer literal before it meets a concrete numeric type.
pub const INT_LITERAL: &str = "INT_LITERAL";
/// Type of a float literal. It fits float types but never integer ones.
pub const FLOAT_LITERAL: &str = "FLOAT_LITERAL";

static INTEGER_TYPES: [&str; 9] = ["int", "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64"];
static FLOAT_TYPES: [&str; 3] = ["float", "f32", "f64"];
static OTHER_PRIMITIVES: [&str; 4] = ["void", "bool", "string", "nil"];

pub fn is_integer_type(name: &str) -> bool {
    name == INT_LITERAL || INTEGER_TYPES.contains(&name)
}

pub fn is_float_type(name: &str) -> bool {
    name == FLOAT_LITERAL || FLOAT_TYPES.contains(&name)
}

pub fn is_number_type(name: &str) -> bool {
    is_integer_type(name) || is_float_type(name)
}

pub fn is_primitive_type(name: &str) -> bool {
    is_number_type(name) || OTHER_PRIMITIVES.contains(&name)
}

/// Names usable as a cast target, `float(x)`.
pub fn is_castable_type(name: &str) -> bool {
    is_primitive_type(name) && !matches!(name, "void" | "nil" | INT_LITERAL | FLOAT_LITERAL)
}

/// Descriptors for every primitive, built once per analysis.
#[derive(Debug, Clone)]
pub struct PrimitiveRegistry {
    types: HashMap<&'static str, TypeObj>,
}

impl PrimitiveRegistry {
    pub fn new() -> Self {
        let mut types = HashMap::new();

        for name in INTEGER_TYPES.iter().chain(FLOAT_TYPES.iter()).chain(OTHER_PRIMITIVES.iter()) {
            types.insert(*name, TypeObj::primitive(name));
        }
        for name in [INT_LITERAL, FLOAT_LITERAL] {
            types.insert(name, TypeObj::primitive(name));
        }

        PrimitiveRegistry { types }
    }

    pub fn get(&self, name: &str) -> Option<TypeObj> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn void(&self) -> TypeObj {
        TypeObj::primitive("void")
    }

    pub fn bool(&self) -> TypeObj {
        TypeObj::primitive("bool")
    }

    pub fn int(&self) -> TypeObj {
        TypeObj::primitive("int")
    }

    pub fn string(&self) -> TypeObj {
        TypeObj::primitive("string")
    }
}

impl Default for PrimitiveRegistry {
    fn default() -> Self {
        Self::new()
    }
}
