//! Lexical scopes for the parser and the type checker.
//!
//! Every scope lives in a [`symtable::SymbolArena`] owned by the program and is
//! addressed through a [`symtable::ScopeId`]. Each table points at its parent,
//! so lookups walk outwards until they reach the program scope.

pub mod symtable;
