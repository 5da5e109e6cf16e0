#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::analyze,
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod symtable;
pub mod type_checker;

extern crate regex;

/// A location in a source file: byte offset, 1-based line and file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(offset: u32, line: u32, file: Rc<String>) -> Self {
        Position { offset, line, file }
    }

    pub fn null() -> Self {
        Position::new(0, 0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Runs the whole front end on one source text: lex, parse, then type check.
///
/// The returned program is fully checked and has had its rewrites applied.
pub fn compile_source(source: &str, file: &str) -> Result<Program, Error> {
    let tokens = tokenize(source, Some(String::from(file)))?;
    let mut program = parse(tokens, Rc::new(String::from(file)))?;
    analyze(&mut program)?;
    Ok(program)
}

/// Finds the line containing `offset`.
///
/// Returns the 1-based line number, the line's text and the column of
/// `offset` inside that line.
pub fn get_line_at_position(source: &str, offset: u32) -> Option<(usize, String, usize)> {
    let pos = offset as usize;
    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // The EOF token sits one past the last character.
    let last = source.split_inclusive('\n').last().unwrap_or("");
    let count = source.split_inclusive('\n').count().max(1);
    Some((count, last.to_string(), last.len()))
}

/// Renders a diagnostic with the offending source line and a caret.
pub fn format_error(error: &Error, source: &str) -> String {
    /*
        Error: message
        -> file.knox
           |
        20 | var a : int = #;
           | --------------^
    */

    let position = error.get_position();
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!("Error: {} ({})\n", error.get_error_name(), error.get_tip()));
    }
    out.push_str(&format!("-> {}:{}\n", position.file, position.line));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.offset) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (String::from(&string[start..]), start)
}
