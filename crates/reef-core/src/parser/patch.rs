//! Patch grammar: one or more `@`-prefixed mutation commands.

use super::cst::{CommandCst, PatchCst};
use super::document::parse_props;
use super::lex::{Tok, Token};
use super::Cursor;
use crate::error::SyntaxError;

pub(crate) fn parse(tokens: &[Token]) -> (PatchCst, Vec<SyntaxError>) {
    let mut c = Cursor::new(tokens);
    let mut commands: Vec<CommandCst> = Vec::new();

    loop {
        match c.peek() {
            None => break,
            Some(Tok::At) => {
                let (line, column) = c.here();
                c.advance();
                if let Some(command) = parse_command(&mut c, line, column) {
                    commands.push(command);
                }
            }
            Some(tok) => {
                c.error_here(format!(
                    "Expected `@` to start a patch command, found {}",
                    tok.describe()
                ));
                c.recover_to_command();
            }
        }
    }

    (PatchCst { commands }, c.errors)
}

fn parse_command(c: &mut Cursor<'_>, line: usize, column: usize) -> Option<CommandCst> {
    match c.peek() {
        Some(Tok::Update) => {
            c.advance();
            let target = c.expect_ident("a node id after `@update`").or_sync(c)?;
            let props = optional_props(c, true);
            Some(CommandCst::Update { target, props })
        }
        Some(Tok::Delete) => {
            c.advance();
            let target = c.expect_ident("a node id after `@delete`").or_sync(c)?;
            Some(CommandCst::Delete { target })
        }
        Some(Tok::Add) => {
            c.advance();
            c.expect(&Tok::LBracket, "after `@add`");
            let node_type = c.expect_ident("a block type in `@add [type:id]`").or_sync(c)?;
            c.expect(&Tok::Colon, "between type and id in `@add [type:id]`");
            let id = c.expect_ident("a node id in `@add [type:id]`").or_sync(c)?;
            c.expect(&Tok::RBracket, "to close `@add [type:id]`");
            let label = c.expect_string("a label string after `@add [type:id]`").or_sync(c)?;
            let props = optional_props(c, true);
            Some(CommandCst::Add {
                node_type,
                id,
                label,
                props,
            })
        }
        Some(Tok::Connect) => {
            c.advance();
            let source = c.expect_ident("a source node id after `@connect`").or_sync(c)?;
            c.expect(&Tok::Arrow, &format!("after `@connect {source}`"));
            let target = c
                .expect_ident(&format!("a target node id after `@connect {source} ->`"))
                .or_sync(c)?;
            let label = if c.eat(&Tok::Colon) {
                c.expect_string("a label string after `:`")
            } else {
                None
            };
            let props = optional_props(c, false);
            Some(CommandCst::Connect {
                source,
                target,
                label,
                props,
            })
        }
        Some(Tok::Disconnect) => {
            c.advance();
            let source = c
                .expect_ident("a source node id after `@disconnect`")
                .or_sync(c)?;
            let target = if c.eat(&Tok::Arrow) {
                c.expect_ident(&format!("a target node id after `@disconnect {source} ->`"))
            } else {
                None
            };
            Some(CommandCst::Disconnect { source, target })
        }
        Some(Tok::Move) => {
            c.advance();
            let target = c.expect_ident("a node id after `@move`").or_sync(c)?;
            let props = required_props(c, &target, "@move")?;
            Some(CommandCst::Move {
                target,
                props,
                line,
                column,
            })
        }
        Some(Tok::Resize) => {
            c.advance();
            let target = c.expect_ident("a node id after `@resize`").or_sync(c)?;
            let props = required_props(c, &target, "@resize")?;
            Some(CommandCst::Resize {
                target,
                props,
                line,
                column,
            })
        }
        other => {
            c.error_here(format!(
                "Expected a patch command (`update`, `delete`, `add`, `connect`, `disconnect`, `move` or `resize`) after `@`, found {}",
                other.map(|t| t.describe()).unwrap_or("end of input".into())
            ));
            c.recover_to_command();
            None
        }
    }
}

fn optional_props(c: &mut Cursor<'_>, allow_custom: bool) -> Option<super::cst::PropsCst> {
    if c.peek() == Some(&Tok::LBrace) {
        Some(parse_props(c, allow_custom))
    } else {
        None
    }
}

fn required_props(
    c: &mut Cursor<'_>,
    target: &str,
    command: &str,
) -> Option<super::cst::PropsCst> {
    if c.peek() == Some(&Tok::LBrace) {
        return Some(parse_props(c, false));
    }
    c.error_here(format!(
        "Expected `{{` after `{command} {target}`, found {}",
        c.peek().map(|t| t.describe()).unwrap_or("end of input".into())
    ));
    c.recover_to_command();
    None
}

/// Small helper so a failed mandatory token aborts the command and skips to
/// the next one in a single expression.
trait OrSync<T> {
    fn or_sync(self, c: &mut Cursor<'_>) -> Option<T>;
}

impl<T> OrSync<T> for Option<T> {
    fn or_sync(self, c: &mut Cursor<'_>) -> Option<T> {
        if self.is_none() {
            c.recover_to_command();
        }
        self
    }
}
