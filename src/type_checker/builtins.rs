//! Library functions every program can call, and the methods of the
//! built-in containers.

use std::collections::HashMap;

use super::{
    primitives::PrimitiveRegistry,
    type_obj::{Signature, TypeObj},
};

/// Free functions and container methods, rebuilt for every analysis.
#[derive(Debug, Clone)]
pub struct Builtins {
    functions: HashMap<&'static str, Signature>,
    primitives: PrimitiveRegistry,
}

impl Builtins {
    pub fn new(primitives: &PrimitiveRegistry) -> Self {
        let mut functions = HashMap::new();

        functions.insert("print", Signature::new(vec![primitives.string()], vec![primitives.void()]));
        functions.insert("println", Signature::new(vec![primitives.string()], vec![primitives.void()]));
        functions.insert("input", Signature::new(vec![], vec![primitives.string()]));

        Builtins {
            functions,
            primitives: primitives.clone(),
        }
    }

    pub fn function(&self, name: &str) -> Option<&Signature> {
        self.functions.get(name)
    }

    /// Method `member` of a list or map type.
    pub fn container_member(&self, container: &TypeObj, member: &str) -> Option<Signature> {
        if container.is_list {
            self.list_member(container, member)
        } else if container.is_map {
            self.map_member(container, member)
        } else {
            None
        }
    }

    fn list_member(&self, list: &TypeObj, member: &str) -> Option<Signature> {
        let void = self.primitives.void();

        if member == "length" {
            return Some(Signature::new(vec![], vec![self.primitives.int()]));
        }
        if member == "clear" {
            return Some(Signature::new(vec![], vec![void]));
        }

        // The rest need the element type, which `[]` does not have.
        let element = list.inner.first()?.clone();
        match member {
            "append" => Some(Signature::new(vec![element], vec![void])),
            "pop" => Some(Signature::new(vec![], vec![element])),
            _ => None,
        }
    }

    fn map_member(&self, map: &TypeObj, member: &str) -> Option<Signature> {
        let key = map.inner.first()?.clone();

        match member {
            "length" => Some(Signature::new(vec![], vec![self.primitives.int()])),
            "has" => Some(Signature::new(vec![key], vec![self.primitives.bool()])),
            "remove" => Some(Signature::new(vec![key], vec![self.primitives.void()])),
            "keys" => Some(Signature::new(vec![], vec![TypeObj::list(key)])),
            _ => None,
        }
    }
}
