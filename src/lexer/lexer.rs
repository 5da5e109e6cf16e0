use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Handles one regex match at the lexer's position.
///
/// Returns `None` for text that produces no token (whitespace, comments).
pub type RegexHandler = fn(&mut Lexer, &str) -> Option<Token>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(&format!("^(?:{})", regex)).expect("lexer pattern must be a valid regex"),
        handler,
    }
}

lazy_static! {
    // Order matters: the first pattern that matches wins.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("[0-9]+\\.[0-9]+", float_handler),
        pattern("[0-9]+", int_handler),
        pattern("\\s+", skip_handler),
        pattern("\"(?:[^\"\\\\]|\\\\.)*\"", string_handler),
        pattern("//[^\\n]*", skip_handler),
        pattern("\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket)),
        pattern("\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket)),
        pattern("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly)),
        pattern("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly)),
        pattern("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen)),
        pattern("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen)),
        pattern("==", MK_DEFAULT_HANDLER!(TokenKind::Equals)),
        pattern("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals)),
        pattern("!", MK_DEFAULT_HANDLER!(TokenKind::Not)),
        pattern("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment)),
        pattern("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals)),
        pattern("<", MK_DEFAULT_HANDLER!(TokenKind::Less)),
        pattern(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals)),
        pattern(">", MK_DEFAULT_HANDLER!(TokenKind::Greater)),
        pattern("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or)),
        pattern("&&", MK_DEFAULT_HANDLER!(TokenKind::And)),
        pattern("\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot)),
        pattern(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon)),
        pattern(":", MK_DEFAULT_HANDLER!(TokenKind::Colon)),
        pattern(",", MK_DEFAULT_HANDLER!(TokenKind::Comma)),
        pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus)),
        pattern("-", MK_DEFAULT_HANDLER!(TokenKind::Dash)),
        pattern("/", MK_DEFAULT_HANDLER!(TokenKind::Slash)),
        pattern("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star)),
    ];
}

/// Pull-based lexer over one source text.
pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: &str, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            source: String::from(source),
            pos: 0,
            line: 1,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn position(&self) -> Position {
        Position::new(self.pos as u32, self.line, Rc::clone(&self.file))
    }

    /// Span of the next `len` bytes, all on the current line.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: self.position(),
            end: Position::new((self.pos + len) as u32, self.line, Rc::clone(&self.file)),
        }
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn count_lines(&mut self, text: &str) {
        self.line += text.matches('\n').count() as u32;
    }

    /// Produces the next token, or the EOF sentinel once the source is
    /// exhausted. Calling it again after EOF keeps returning EOF.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        loop {
            if self.at_eof() {
                return Ok(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), self.span_of(0)));
            }

            let remainder = &self.source[self.pos..];
            let found = PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(remainder)
                    .map(|found| (pattern.handler, String::from(found.as_str())))
            });

            match found {
                Some((handler, matched)) => {
                    if let Some(token) = handler(self, &matched) {
                        return Ok(token);
                    }
                }
                None => {
                    let token = remainder.chars().next().map(String::from).unwrap_or_default();
                    return Err(Error::new(ErrorImpl::UnrecognisedToken { token }, self.position()));
                }
            }
        }
    }
}

fn int_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let token = MK_TOKEN!(TokenKind::Int, String::from(matched), lexer.span_of(matched.len()));
    lexer.advance_n(matched.len());
    Some(token)
}

fn float_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let token = MK_TOKEN!(TokenKind::Float, String::from(matched), lexer.span_of(matched.len()));
    lexer.advance_n(matched.len());
    Some(token)
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    lexer.count_lines(matched);
    lexer.advance_n(matched.len());
    None
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let literal = unescape(&matched[1..matched.len() - 1]);
    let token = MK_TOKEN!(TokenKind::String, literal, lexer.span_of(matched.len()));

    lexer.count_lines(matched);
    lexer.advance_n(matched.len());
    Some(token)
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let kind = RESERVED_LOOKUP.get(matched).copied().unwrap_or(TokenKind::Identifier);
    let token = MK_TOKEN!(kind, String::from(matched), lexer.span_of(matched.len()));

    lexer.advance_n(matched.len());
    Some(token)
}

fn unescape(raw: &str) -> String {
    let mut result = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                chars.next();
                let mut hex = String::new();
                while hex.len() < 2 {
                    match chars.peek() {
                        Some(digit) if digit.is_ascii_hexdigit() => {
                            hex.push(*digit);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
            }
            // Unknown escapes keep their backslash.
            _ => result.push(ch),
        }
    }

    result
}

pub fn tokenize(source: &str, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token()?;
        trace!(%token, "lexed");

        let done = token.kind == TokenKind::EOF;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
