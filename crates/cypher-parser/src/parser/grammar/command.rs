//! Client commands: `:help`, `:save "my file"`, …
//!
//! Commands are not lexed as Cypher. After the leading `:`, the rest of
//! the line is a name and whitespace-separated arguments; double-quoted
//! strings honor escapes, anything else is a bare word. A newline (not a
//! semicolon) terminates the command.

use crate::ast::NodeId;
use crate::lexer::{Token, TokenKind, T};
use crate::parser::grammar::unescape_string;
use crate::parser::Parser;

pub(crate) fn command(p: &mut Parser) -> NodeId {
    let start = p.start();
    p.expect(T![:], "':'");

    let name = match next_word(p) {
        Some(word) => word,
        None => {
            let position = p.last_end();
            p.err_at(position, "expected a command name".to_string());
            let range = p.span(start);
            p.arena.error(range)
        }
    };

    let mut args = Vec::new();
    while let Some(arg) = next_word(p) {
        args.push(arg);
    }

    p.arena.command(name, args, p.span(start))
}

/// The next word or quoted argument on the command line, as a `String`
/// node.
fn next_word(p: &mut Parser) -> Option<NodeId> {
    let token: Token = p.lexer_mut().command_word()?;
    p.note_command_token(&token);
    let value = match token.kind() {
        TokenKind::StringValue => unescape_string(token.data()),
        _ => token.data().to_string(),
    };
    Some(p.arena.string(value, token.range()))
}
