//! Type checking and semantic analysis module.
//!
//! This module walks a parsed program and proves it well typed:
//!
//! - Computing a structural [`type_obj::TypeObj`] for every expression
//! - Resolving variables, functions, classes and members through the
//!   parser's scope tables
//! - Checking call arguments, returns, conditions, casts and loops
//! - Recording the string concatenation rewrite for `+` on strings
//!
//! Checking stops at the first violation. Rewrites are only applied once
//! the whole program has been checked.

pub mod builtins;
pub mod expr;
pub mod primitives;
pub mod type_checker;
pub mod type_obj;

#[cfg(test)]
mod tests;
