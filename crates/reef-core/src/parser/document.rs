//! Document grammar.
//!
//! `canvas DIRECTION` followed by any mix of schema, block and edge
//! statements. A block whose type is in the group-type set opens a nested
//! body terminated by `@end`; container-ness is registry knowledge, so the
//! parser receives the set of group block-type names instead of guessing
//! from syntax.

use super::cst::{
    BlockCst, CustomValueCst, DocumentCst, EdgeAnnotation, EdgeCst, EntryCst, ItemCst, PropsCst,
    SchemaCst, ValueCst,
};
use super::lex::{Tok, Token};
use super::Cursor;
use crate::error::SyntaxError;
use crate::model::Direction;
use rustc_hash::FxHashSet;

pub(crate) fn parse(
    tokens: &[Token],
    group_types: &FxHashSet<String>,
) -> (DocumentCst, Vec<SyntaxError>) {
    let mut c = Cursor::new(tokens);

    let direction = parse_header(&mut c);
    let items = parse_items(&mut c, group_types, false);

    (DocumentCst { direction, items }, c.errors)
}

fn parse_header(c: &mut Cursor<'_>) -> Direction {
    c.expect(&Tok::Canvas, "at the start of the document");
    match c.peek() {
        Some(&Tok::Direction(direction)) => {
            c.advance();
            direction
        }
        _ => {
            c.error_here(format!(
                "Expected a direction (`LR`, `RL`, `TB` or `BT`) after `canvas`, found {}",
                c.peek().map(|t| t.describe()).unwrap_or("end of input".into())
            ));
            Direction::default()
        }
    }
}

/// Statement loop shared by the document body and group-block bodies. When
/// `in_body` is set the loop is terminated by `@end`; at the top level a
/// stray `@end` is a diagnostic.
fn parse_items(c: &mut Cursor<'_>, group_types: &FxHashSet<String>, in_body: bool) -> Vec<ItemCst> {
    let mut items: Vec<ItemCst> = Vec::new();

    loop {
        match c.peek() {
            None => {
                if in_body {
                    c.error_here("Expected `@end` to close the group block, found end of input");
                }
                return items;
            }
            Some(Tok::At) => match c.peek_at(1) {
                Some(Tok::End) => {
                    c.advance();
                    c.advance();
                    if in_body {
                        return items;
                    }
                    c.error_here("`@end` without an open group block");
                }
                Some(Tok::Schema) => {
                    if in_body {
                        c.error_here("Schema definitions are only allowed at document scope");
                    }
                    if let Some(schema) = parse_schema(c) {
                        if !in_body {
                            items.push(ItemCst::Schema(schema));
                        }
                    }
                }
                Some(Tok::Ident(_)) => {
                    if let Some(block) = parse_block(c, group_types) {
                        items.push(ItemCst::Block(block));
                    }
                }
                other => {
                    c.error_here(format!(
                        "Expected `schema`, a block type or `end` after `@`, found {}",
                        other.map(|t| t.describe()).unwrap_or("end of input".into())
                    ));
                    c.advance();
                    c.synchronize();
                }
            },
            Some(Tok::Ident(_)) if c.peek_at(1) == Some(&Tok::Arrow) => {
                if let Some(edge) = parse_edge(c) {
                    items.push(ItemCst::Edge(edge));
                }
            }
            Some(tok) => {
                c.error_here(format!(
                    "Expected `@` or an edge declaration, found {}",
                    tok.describe()
                ));
                c.synchronize();
            }
        }
    }
}

fn parse_schema(c: &mut Cursor<'_>) -> Option<SchemaCst> {
    c.advance(); // @
    c.advance(); // schema
    let id = match c.expect_ident("a schema id after `@schema`") {
        Some(id) => id,
        None => {
            c.synchronize();
            return None;
        }
    };
    let props = if c.peek() == Some(&Tok::LBrace) {
        parse_props(c, true)
    } else {
        c.error_here(format!(
            "Expected `{{` after `@schema {id}`, found {}",
            c.peek().map(|t| t.describe()).unwrap_or("end of input".into())
        ));
        PropsCst::default()
    };
    Some(SchemaCst { id, props })
}

fn parse_block(c: &mut Cursor<'_>, group_types: &FxHashSet<String>) -> Option<BlockCst> {
    c.advance(); // @
    let Some(Token {
        tok: Tok::Ident(block_type),
        ..
    }) = c.advance()
    else {
        unreachable!("caller peeked a block type identifier");
    };

    let id = match c.expect_ident(&format!("a block id after `@{block_type}`")) {
        Some(id) => id,
        None => {
            c.synchronize();
            return None;
        }
    };

    let label = match c.peek() {
        Some(Tok::Str(_)) => {
            let Some(Token {
                tok: Tok::Str(label),
                ..
            }) = c.advance()
            else {
                unreachable!("peeked string disappeared");
            };
            Some(label)
        }
        _ => None,
    };

    let props = if c.peek() == Some(&Tok::LBrace) {
        Some(parse_props(c, true))
    } else {
        None
    };

    let children = if group_types.contains(&block_type) {
        parse_items(c, group_types, true)
    } else {
        Vec::new()
    };

    Some(BlockCst {
        block_type,
        id,
        label,
        props,
        children,
    })
}

fn parse_edge(c: &mut Cursor<'_>) -> Option<EdgeCst> {
    let Some(Token {
        tok: Tok::Ident(source),
        ..
    }) = c.advance()
    else {
        unreachable!("caller peeked an edge source identifier");
    };
    c.advance(); // ->

    let target = match c.expect_ident(&format!("a target node id after `{source} ->`")) {
        Some(id) => id,
        None => {
            c.synchronize();
            return None;
        }
    };

    let annotation = if c.eat(&Tok::Colon) {
        match c.peek() {
            Some(Tok::Str(_)) => {
                let Some(Token {
                    tok: Tok::Str(label),
                    ..
                }) = c.advance()
                else {
                    unreachable!("peeked string disappeared");
                };
                Some(EdgeAnnotation::Label(label))
            }
            Some(Tok::Ident(_)) => {
                let Some(Token {
                    tok: Tok::Ident(edge_type),
                    ..
                }) = c.advance()
                else {
                    unreachable!("peeked identifier disappeared");
                };
                Some(EdgeAnnotation::EdgeType(edge_type))
            }
            other => {
                c.error_here(format!(
                    "Expected a label string or edge type after `:`, found {}",
                    other.map(|t| t.describe()).unwrap_or("end of input".into())
                ));
                None
            }
        }
    } else {
        None
    };

    let props = if c.peek() == Some(&Tok::LBrace) {
        Some(parse_props(c, false))
    } else {
        None
    };

    Some(EdgeCst {
        source,
        target,
        annotation,
        props,
    })
}

/// Parses a `{ ... }` properties block. `allow_custom` gates `$`-prefixed
/// entries; edge data blocks only carry regular properties.
pub(super) fn parse_props(c: &mut Cursor<'_>, allow_custom: bool) -> PropsCst {
    let mut props = PropsCst::default();
    c.advance(); // {

    if c.eat(&Tok::RBrace) {
        return props;
    }

    loop {
        if let Some(entry) = parse_entry(c, allow_custom) {
            props.entries.push(entry);
        }

        match c.peek() {
            Some(Tok::Comma) => {
                c.advance();
            }
            Some(Tok::RBrace) => {
                c.advance();
                return props;
            }
            None => {
                c.error_here("Expected `}` to close the properties block, found end of input");
                return props;
            }
            Some(tok) => {
                c.error_here(format!(
                    "Expected `,` or `}}` in properties block, found {}",
                    tok.describe()
                ));
                c.advance();
                if c.at_end() {
                    return props;
                }
            }
        }
    }
}

fn parse_entry(c: &mut Cursor<'_>, allow_custom: bool) -> Option<EntryCst> {
    match c.peek() {
        Some(Tok::Dollar) => {
            if !allow_custom {
                c.error_here("Custom properties are not allowed in this properties block");
            }
            c.advance();
            let key = c.expect_ident("a custom property name after `$`")?;
            c.expect(&Tok::Colon, &format!("after custom property `${key}`"));
            let value = parse_custom_value(c)?;
            allow_custom.then_some(EntryCst::Custom { key, value })
        }
        Some(Tok::Ident(_)) => {
            let Some(Token {
                tok: Tok::Ident(key),
                ..
            }) = c.advance()
            else {
                unreachable!("peeked identifier disappeared");
            };
            c.expect(&Tok::Colon, &format!("after property `{key}`"));
            let value = parse_value(c)?;
            Some(EntryCst::Regular { key, value })
        }
        other => {
            c.error_here(format!(
                "Expected a property name, found {}",
                other.map(|t| t.describe()).unwrap_or("end of input".into())
            ));
            skip_entry(c);
            None
        }
    }
}

/// A custom value is either a plain value or a type-function call
/// `typeName(value, { options })`.
fn parse_custom_value(c: &mut Cursor<'_>) -> Option<CustomValueCst> {
    if let (Some(Tok::Ident(_)), Some(Tok::LParen)) = (c.peek(), c.peek_at(1)) {
        let Some(Token {
            tok: Tok::Ident(type_name),
            ..
        }) = c.advance()
        else {
            unreachable!("peeked identifier disappeared");
        };
        c.advance(); // (
        let value = parse_value(c)?;
        let mut options: Vec<(String, ValueCst)> = Vec::new();
        if c.eat(&Tok::Comma) {
            if c.peek() == Some(&Tok::LBrace) {
                options = parse_options_object(c);
            } else {
                c.error_here(format!(
                    "Expected an options object after `,` in `{type_name}(...)`, found {}",
                    c.peek().map(|t| t.describe()).unwrap_or("end of input".into())
                ));
            }
        }
        c.expect(&Tok::RParen, &format!("to close `{type_name}(...)`"));
        return Some(CustomValueCst::TypeFunction {
            type_name,
            value,
            options,
        });
    }

    parse_value(c).map(CustomValueCst::Plain)
}

/// Options objects only carry regular `key: value` pairs.
fn parse_options_object(c: &mut Cursor<'_>) -> Vec<(String, ValueCst)> {
    let mut options: Vec<(String, ValueCst)> = Vec::new();
    c.advance(); // {

    if c.eat(&Tok::RBrace) {
        return options;
    }

    loop {
        if let Some(key) = c.expect_ident("an option name") {
            c.expect(&Tok::Colon, &format!("after option `{key}`"));
            if let Some(value) = parse_value(c) {
                options.push((key, value));
            }
        } else {
            skip_entry(c);
        }

        match c.peek() {
            Some(Tok::Comma) => {
                c.advance();
            }
            Some(Tok::RBrace) => {
                c.advance();
                return options;
            }
            _ => {
                c.error_here("Expected `,` or `}` in options object");
                return options;
            }
        }
    }
}

pub(super) fn parse_value(c: &mut Cursor<'_>) -> Option<ValueCst> {
    match c.peek() {
        Some(Tok::Str(_)) => {
            let Some(Token {
                tok: Tok::Str(s), ..
            }) = c.advance()
            else {
                unreachable!("peeked string disappeared");
            };
            Some(ValueCst::Str(s))
        }
        Some(&Tok::Num(n)) => {
            c.advance();
            Some(ValueCst::Num(n))
        }
        Some(&Tok::Bool(b)) => {
            c.advance();
            Some(ValueCst::Bool(b))
        }
        Some(Tok::Ident(_)) => {
            let Some(Token {
                tok: Tok::Ident(id),
                ..
            }) = c.advance()
            else {
                unreachable!("peeked identifier disappeared");
            };
            Some(ValueCst::Ident(id))
        }
        // Direction literals are ordinary identifier values in property
        // position (`direction: TB` inside a container).
        Some(&Tok::Direction(d)) => {
            c.advance();
            Some(ValueCst::Ident(d.as_str().to_string()))
        }
        Some(Tok::LBracket) => {
            c.advance();
            let mut values: Vec<ValueCst> = Vec::new();
            if c.eat(&Tok::RBracket) {
                return Some(ValueCst::Array(values));
            }
            loop {
                if let Some(value) = parse_value(c) {
                    values.push(value);
                }
                match c.peek() {
                    Some(Tok::Comma) => {
                        c.advance();
                    }
                    Some(Tok::RBracket) => {
                        c.advance();
                        return Some(ValueCst::Array(values));
                    }
                    _ => {
                        c.error_here("Expected `,` or `]` in array literal");
                        return Some(ValueCst::Array(values));
                    }
                }
            }
        }
        other => {
            c.error_here(format!(
                "Expected a value, found {}",
                other.map(|t| t.describe()).unwrap_or("end of input".into())
            ));
            None
        }
    }
}

/// Skips to the end of a malformed properties entry.
fn skip_entry(c: &mut Cursor<'_>) {
    loop {
        match c.peek() {
            None | Some(Tok::Comma) | Some(Tok::RBrace) => return,
            _ => {
                c.advance();
            }
        }
    }
}
