//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! Declarations and statements are parsed by recursive descent, expressions
//! and type annotations by a Pratt parser driven by NUD/LED lookup tables.
//!
//! While parsing, the parser keeps a stack of open scopes and registers every
//! declaration in the innermost one, so the returned program carries a
//! complete symbol arena.

use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::ast::{NodeId, Program},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    symtable::symtable::{ScopeId, ScopeKind, Symbol, SymbolArena, SymbolKind},
    Position, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_decl,
    types::{create_token_type_lookups, TypeLEDHandler, TypeLEDLookup, TypeNUDHandler, TypeNUDLookup},
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse, always ending in EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix and postfix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type null denotation handlers
    type_nud_lookup: TypeNUDLookup,
    /// Lookup table for type left denotation handlers
    type_led_lookup: TypeLEDLookup,
    /// Lookup table for type binding powers
    type_binding_power_lookup: BPLookup,
    /// Counter for node ids
    current_id: u32,
    /// Every scope opened so far
    symbols: SymbolArena,
    /// Scopes currently open, innermost last
    scopes: Vec<ScopeId>,
}

impl Parser {
    /// Creates a parser with the program scope already open.
    ///
    /// A missing EOF sentinel is appended, so the token stream can never
    /// run dry.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position::new(0, 1, Rc::clone(&file)));
            let span = Span { start: end.clone(), end };
            tokens.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
        }

        let mut symbols = SymbolArena::new();
        let root = symbols.push_scope(None, ScopeKind::Program);

        Parser {
            tokens,
            pos: 0,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            type_led_lookup: HashMap::new(),
            type_binding_power_lookup: HashMap::new(),
            current_id: 0,
            symbols,
            scopes: vec![root],
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Kind of the token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        self.tokens[(self.pos + 1).min(self.tokens.len() - 1)].kind
    }

    /// Advances to the next token and returns the previous one.
    ///
    /// The position never moves past the EOF token.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
        }
        token
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(&mut self, expected_kind: TokenKind, error: Option<Error>) -> Result<Token, Error> {
        if self.current_token_kind() == expected_kind {
            return Ok(self.advance());
        }

        match error {
            Some(error) => Err(error),
            None => Err(self.unexpected(expected_kind.describe())),
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Consumes the current token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_token_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// An unexpected-token error at the current token.
    pub fn unexpected(&self, expected: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                expected: String::from(expected),
                found: token.value.clone(),
            },
            token.span.start.clone(),
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Returns a reference to the type binding power lookup table.
    pub fn get_type_bp_lookup(&self) -> &BPLookup {
        &self.type_binding_power_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Returns a reference to the type LED lookup table.
    pub fn get_type_led_lookup(&self) -> &TypeLEDLookup {
        &self.type_led_lookup
    }

    /// Registers a left denotation (infix or postfix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Tokens such as `-` and `(` have both handlers, so this leaves the
    /// binding power table alone.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type left denotation handler.
    pub fn type_led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: TypeLEDHandler) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Hands out the next node id.
    pub fn advance_id(&mut self) -> NodeId {
        let id = NodeId(self.current_id);
        self.current_id += 1;
        id
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// The innermost open scope.
    pub fn current_scope(&self) -> ScopeId {
        self.scopes.last().copied().unwrap_or(ScopeId(0))
    }

    /// The scope enclosing the innermost one.
    pub fn parent_scope(&self) -> ScopeId {
        self.symbols.parent(self.current_scope()).unwrap_or(ScopeId(0))
    }

    /// Opens a child of the current scope and makes it current.
    pub fn open_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let scope = self.symbols.push_scope(Some(self.current_scope()), kind);
        self.scopes.push(scope);
        scope
    }

    /// Closes the innermost scope. The program scope stays open.
    pub fn close_scope(&mut self) {
        if self.scopes.len() > 1 {
            if let Some(scope) = self.scopes.pop() {
                debug!(scope = scope.0, "scope closed");
            }
        }
    }

    /// Declares `name` in the current scope.
    pub fn declare(&mut self, name: &Token, node: NodeId, kind: SymbolKind) -> Result<(), Error> {
        let scope = self.current_scope();
        self.declare_in(scope, name, node, kind)
    }

    /// Declares `name` in `scope`, failing if it is already visible there.
    pub fn declare_in(&mut self, scope: ScopeId, name: &Token, node: NodeId, kind: SymbolKind) -> Result<(), Error> {
        let symbol = Symbol::new(node, name.line(), kind);

        if !self.symbols.insert(scope, &name.value, symbol) {
            return Err(Error::new(
                ErrorImpl::SymbolAlreadyDeclared {
                    symbol: name.value.clone(),
                },
                name.span.start.clone(),
            ));
        }

        Ok(())
    }

    fn into_symbols(self) -> SymbolArena {
        self.symbols
    }
}

/// Parses a stream of tokens into a program.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses declarations until EOF. The
/// first error aborts parsing and no partial tree is returned.
#[tracing::instrument(level = "debug", skip_all, fields(file = %file))]
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let scope = parser.current_scope();
    let mut declarations = vec![];

    while parser.has_tokens() {
        declarations.push(parse_decl(&mut parser)?);
    }

    let id = parser.advance_id();
    debug!(declarations = declarations.len(), "parsed program");

    Ok(Program {
        id,
        scope,
        declarations,
        symbols: parser.into_symbols(),
    })
}
