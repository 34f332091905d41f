//! Shared lexer for the document and patch grammars.
//!
//! Byte-level scanner with line/column bookkeeping. Identifiers permit
//! letters, digits, `_` and `-`, so hyphenated ids and UUID-shaped ids lex as
//! one token instead of splitting at the hyphen. Keywords and direction
//! literals win over identifiers only for the exact word.

use crate::error::{Error, Result};
use crate::model::Direction;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Tok {
    Canvas,
    Schema,
    End,
    Update,
    Delete,
    Add,
    Connect,
    Disconnect,
    Move,
    Resize,
    Direction(Direction),
    At,
    Dollar,
    Arrow,
    Colon,
    Comma,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Str(String),
    Num(f64),
    Bool(bool),
    Ident(String),
}

impl Tok {
    /// Human-readable name used in syntax diagnostics.
    pub(crate) fn describe(&self) -> String {
        match self {
            Tok::Canvas => "`canvas`".into(),
            Tok::Schema => "`schema`".into(),
            Tok::End => "`end`".into(),
            Tok::Update => "`update`".into(),
            Tok::Delete => "`delete`".into(),
            Tok::Add => "`add`".into(),
            Tok::Connect => "`connect`".into(),
            Tok::Disconnect => "`disconnect`".into(),
            Tok::Move => "`move`".into(),
            Tok::Resize => "`resize`".into(),
            Tok::Direction(d) => format!("direction `{d}`"),
            Tok::At => "`@`".into(),
            Tok::Dollar => "`$`".into(),
            Tok::Arrow => "`->`".into(),
            Tok::Colon => "`:`".into(),
            Tok::Comma => "`,`".into(),
            Tok::LBrace => "`{`".into(),
            Tok::RBrace => "`}`".into(),
            Tok::LParen => "`(`".into(),
            Tok::RParen => "`)`".into(),
            Tok::LBracket => "`[`".into(),
            Tok::RBracket => "`]`".into(),
            Tok::Str(s) => format!("string \"{s}\""),
            Tok::Num(n) => format!("number `{n}`"),
            Tok::Bool(b) => format!("`{b}`"),
            Tok::Ident(id) => format!("`{id}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub tok: Tok,
    pub line: usize,
    pub column: usize,
}

struct Lexer<'input> {
    input: &'input [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'input> Lexer<'input> {
    fn new(input: &'input str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if b & 0xC0 != 0x80 {
            // UTF-8 continuation bytes do not advance the column.
            self.column += 1;
        }
        Some(b)
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\r' || b == b'\n' {
                self.bump();
                continue;
            }
            break;
        }
    }

    fn slice(&self, start: usize) -> &'input str {
        // The scanner only splits at ASCII delimiters, so this stays on
        // UTF-8 boundaries.
        std::str::from_utf8(&self.input[start..self.pos]).unwrap_or_default()
    }
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn classify(word: &str) -> Tok {
    match word {
        "canvas" => Tok::Canvas,
        "schema" => Tok::Schema,
        "end" => Tok::End,
        "update" => Tok::Update,
        "delete" => Tok::Delete,
        "add" => Tok::Add,
        "connect" => Tok::Connect,
        "disconnect" => Tok::Disconnect,
        "move" => Tok::Move,
        "resize" => Tok::Resize,
        "true" => Tok::Bool(true),
        "false" => Tok::Bool(false),
        "LR" => Tok::Direction(Direction::LR),
        "RL" => Tok::Direction(Direction::RL),
        "TB" => Tok::Direction(Direction::TB),
        "BT" => Tok::Direction(Direction::BT),
        _ => Tok::Ident(word.to_string()),
    }
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>> {
    let mut lx = Lexer::new(input);
    let mut tokens: Vec<Token> = Vec::new();

    loop {
        lx.skip_ws();
        let Some(b) = lx.peek() else {
            break;
        };
        let (line, column) = (lx.line, lx.column);
        let start = lx.pos;

        let tok = match b {
            b'@' => {
                lx.bump();
                Tok::At
            }
            b'$' => {
                lx.bump();
                Tok::Dollar
            }
            b':' => {
                lx.bump();
                Tok::Colon
            }
            b',' => {
                lx.bump();
                Tok::Comma
            }
            b'{' => {
                lx.bump();
                Tok::LBrace
            }
            b'}' => {
                lx.bump();
                Tok::RBrace
            }
            b'(' => {
                lx.bump();
                Tok::LParen
            }
            b')' => {
                lx.bump();
                Tok::RParen
            }
            b'[' => {
                lx.bump();
                Tok::LBracket
            }
            b']' => {
                lx.bump();
                Tok::RBracket
            }
            b'"' => {
                lx.bump();
                let content_start = lx.pos;
                loop {
                    match lx.peek() {
                        Some(b'"') => break,
                        Some(_) => {
                            lx.bump();
                        }
                        None => return Err(Error::UnterminatedString { line, column }),
                    }
                }
                let content = lx.slice(content_start).to_string();
                lx.bump();
                Tok::Str(content)
            }
            b'-' => {
                if lx.peek_at(1) == Some(b'>') {
                    lx.bump();
                    lx.bump();
                    Tok::Arrow
                } else if lx.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
                    lx.bump();
                    scan_number(&mut lx, start, line, column)?
                } else {
                    return Err(Error::Lex {
                        line,
                        column,
                        found: '-',
                    });
                }
            }
            b if b.is_ascii_digit() => scan_number(&mut lx, start, line, column)?,
            b if is_word_start(b) => {
                while lx.peek().is_some_and(is_word_byte) {
                    lx.bump();
                }
                classify(lx.slice(start))
            }
            other => {
                return Err(Error::Lex {
                    line,
                    column,
                    found: char::from(other),
                });
            }
        };

        tokens.push(Token { tok, line, column });
    }

    Ok(tokens)
}

/// Scans digits (and one fraction) from the current position. A digit run
/// that continues with identifier characters is a digit-leading identifier
/// (`550e8400-e29b-...`), not a number.
fn scan_number(lx: &mut Lexer<'_>, start: usize, line: usize, column: usize) -> Result<Tok> {
    while lx.peek().is_some_and(|b| b.is_ascii_digit()) {
        lx.bump();
    }

    let mut saw_fraction = false;
    if lx.peek() == Some(b'.') && lx.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
        saw_fraction = true;
        lx.bump();
        while lx.peek().is_some_and(|b| b.is_ascii_digit()) {
            lx.bump();
        }
    }

    if lx.peek().is_some_and(is_word_byte) {
        let negative = lx.input[start] == b'-';
        if saw_fraction || negative {
            return Err(Error::Lex {
                line,
                column: lx.column,
                found: char::from(lx.peek().unwrap_or(b'?')),
            });
        }
        while lx.peek().is_some_and(is_word_byte) {
            lx.bump();
        }
        return Ok(classify(lx.slice(start)));
    }

    let text = lx.slice(start);
    let value: f64 = text.parse().map_err(|_| Error::Lex {
        line,
        column,
        found: text.chars().next().unwrap_or('?'),
    })?;
    Ok(Tok::Num(value))
}
