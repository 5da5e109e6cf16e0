use std::collections::HashMap;

use tracing::debug;

use crate::ast::{ast::NodeId, types::TypeExpr};

/// Handle to a table inside a [`SymbolArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Class,
    Block,
}

/// Snapshot of the declaration a name refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable { ty: TypeExpr },
    Parameter { ty: TypeExpr },
    Function { params: Vec<TypeExpr>, returns: Vec<TypeExpr> },
    Class { members: ScopeId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Declaring node. The table never owns it.
    pub node: NodeId,
    pub line: u32,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn new(node: NodeId, line: u32, kind: SymbolKind) -> Self {
        Symbol { node, line, kind }
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, SymbolKind::Class { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable {
    entries: HashMap<String, Symbol>,
    parent: Option<ScopeId>,
    kind: ScopeKind,
}

impl SymbolTable {
    fn new(parent: Option<ScopeId>, kind: ScopeKind) -> Self {
        SymbolTable {
            entries: HashMap::new(),
            parent,
            kind,
        }
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

/// Owns every scope of one program.
///
/// Scope ids are indices into the arena, so they stay valid for as long as
/// the arena lives. Passing an id from another arena panics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolArena {
    tables: Vec<SymbolTable>,
}

impl SymbolArena {
    pub fn new() -> Self {
        SymbolArena { tables: vec![] }
    }

    pub fn push_scope(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.tables.len() as u32);
        self.tables.push(SymbolTable::new(parent, kind));

        debug!(scope = id.0, parent = ?parent.map(|p| p.0), ?kind, "scope opened");
        id
    }

    pub fn get(&self, scope: ScopeId) -> &SymbolTable {
        &self.tables[scope.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.get(scope).parent
    }

    /// Declares `name` in `scope`.
    ///
    /// Returns false and leaves the table untouched when the name is already
    /// visible from `scope`, so inner scopes cannot shadow outer names.
    pub fn insert(&mut self, scope: ScopeId, name: &str, symbol: Symbol) -> bool {
        if self.is_declared(scope, name) {
            return false;
        }

        debug!(scope = scope.0, name, line = symbol.line, "symbol declared");
        self.tables[scope.0 as usize]
            .entries
            .insert(String::from(name), symbol);
        true
    }

    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.get(scope).entries.get(name)
    }

    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let scope = self.scope_of(scope, name)?;
        self.lookup_local(scope, name)
    }

    pub fn is_declared(&self, scope: ScopeId, name: &str) -> bool {
        self.scope_of(scope, name).is_some()
    }

    /// The nearest scope, starting at `scope`, that declares `name`.
    pub fn scope_of(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);

        while let Some(id) = current {
            let table = self.get(id);
            if table.entries.contains_key(name) {
                return Some(id);
            }
            current = table.parent;
        }

        None
    }
}
