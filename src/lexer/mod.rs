//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Line tracking for error reporting
//! - Comments and whitespace handling
//!
//! The lexer is pull-based (`Lexer::next_token`); `tokenize` drains it into
//! a vector terminated by the EOF sentinel.

pub mod lexer;
pub mod tokens;
