//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a program tree and fills the program's symbol tables on the way.
//! It uses a Pratt parser for expressions with proper operator precedence
//! and handles:
//!
//! - Declarations (classes and functions)
//! - Statement parsing (variables, assignments, control flow, jumps)
//! - Expression parsing (binary ops, calls, indexing, member access, literals)
//! - Type parsing for type annotations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
