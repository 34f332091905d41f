//! Lexer, grammars and CST→AST visitors.
//!
//! Both grammars share one lexer and one recovery discipline: on a grammar
//! violation the parser records a positioned diagnostic and resynchronizes at
//! the next statement start, so a single call reports every syntax error in
//! the input. Callers must treat a non-empty error list as fatal; the partial
//! tree exists only to keep the parser moving.

pub(crate) mod cst;
pub(crate) mod document;
pub(crate) mod lex;
pub(crate) mod patch;
pub(crate) mod patch_visit;
pub(crate) mod visit;

use crate::error::SyntaxError;
use lex::{Tok, Token};

/// Token stream cursor shared by both parsers.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    pub errors: Vec<SyntaxError>,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|t| &t.tok)
    }

    pub fn peek_at(&self, offset: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + offset).map(|t| &t.tok)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Position of the current token, or of the end of input.
    pub fn here(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| (t.line, t.column))
            .unwrap_or((1, 1))
    }

    pub fn error_here(&mut self, message: impl Into<String>) {
        let (line, column) = self.here();
        self.errors.push(SyntaxError::new(message, line, column));
    }

    fn found(&self) -> String {
        match self.peek() {
            Some(tok) => tok.describe(),
            None => "end of input".into(),
        }
    }

    /// Consumes the expected token or records a diagnostic and stays put.
    pub fn expect(&mut self, expected: &Tok, context: &str) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            return true;
        }
        let message = format!(
            "Expected {} {}, found {}",
            expected.describe(),
            context,
            self.found()
        );
        self.error_here(message);
        false
    }

    pub fn eat(&mut self, expected: &Tok) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            return true;
        }
        false
    }

    pub fn expect_ident(&mut self, what: &str) -> Option<String> {
        match self.peek() {
            Some(Tok::Ident(_)) => {
                let Some(Token {
                    tok: Tok::Ident(id), ..
                }) = self.advance()
                else {
                    unreachable!("peeked identifier disappeared");
                };
                Some(id)
            }
            _ => {
                let message = format!("Expected {what}, found {}", self.found());
                self.error_here(message);
                None
            }
        }
    }

    pub fn expect_string(&mut self, what: &str) -> Option<String> {
        match self.peek() {
            Some(Tok::Str(_)) => {
                let Some(Token {
                    tok: Tok::Str(s), ..
                }) = self.advance()
                else {
                    unreachable!("peeked string disappeared");
                };
                Some(s)
            }
            _ => {
                let message = format!("Expected {what}, found {}", self.found());
                self.error_here(message);
                None
            }
        }
    }

    /// Skips ahead to the next plausible document statement start: `@`, an
    /// identifier followed by `->`, or end of input. Does not advance when
    /// already at one; callers that errored *at* a statement start must
    /// consume it themselves before resynchronizing.
    pub fn synchronize(&mut self) {
        loop {
            match self.peek() {
                None | Some(Tok::At) => return,
                Some(Tok::Ident(_)) if self.peek_at(1) == Some(&Tok::Arrow) => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Patch-grammar recovery: skips to the next `@` or end of input.
    pub fn recover_to_command(&mut self) {
        loop {
            match self.peek() {
                None | Some(Tok::At) => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
