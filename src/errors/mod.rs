//! Error types and error handling for the compiler.
//!
//! This module defines the error type shared by the lexer, the parser and the
//! type checker. It includes:
//!
//! - An error structure carrying the source position (file, offset, line)
//! - Specific error variants for syntax and semantic failures
//! - Error names and suggestions used when rendering diagnostics
//!
//! Every phase stops at the first error; there is no error collection.

pub mod errors;
