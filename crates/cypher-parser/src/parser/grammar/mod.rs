//! Grammar productions, one module per area of the language.
//!
//! Every production takes the parser and returns the built node, or `None`
//! after recording an error at the point of failure. Callers either
//! propagate the failure or recover (`Parser::recover`), which turns the
//! skipped input into an `Error` node so the tree stays well formed.

pub(crate) mod command;
pub(crate) mod expression;
pub(crate) mod match_;
pub(crate) mod merge;
pub(crate) mod pattern;
pub(crate) mod query;
pub(crate) mod statement;

use crate::ast::{NodeId, NodeKind};
use crate::lexer::{Token, TokenKind, T};
use crate::parser::Parser;

/// True if `kind` can serve as an identifier: a plain or quoted name, or a
/// soft keyword.
pub(crate) fn is_name(kind: TokenKind) -> bool {
    match kind {
        TokenKind::Name | TokenKind::QuotedName => true,
        TokenKind::Keyword(keyword) => !keyword.is_reserved(),
        _ => false,
    }
}

/// True if `kind` can serve as a label, relationship type or property
/// name. These positions are unambiguous (they always follow `:` or `.`),
/// so even reserved keywords are allowed.
pub(crate) fn is_symbolic_name(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Name | TokenKind::QuotedName | TokenKind::Keyword(_)
    )
}

/// The identifier text of a name token, with backquote quoting removed.
pub(crate) fn name_text(token: &Token) -> String {
    match token.kind() {
        TokenKind::QuotedName => unquote_name(token.data()),
        _ => token.data().to_string(),
    }
}

/// Strip the backquotes of a quoted identifier and collapse doubled
/// backquotes.
fn unquote_name(data: &str) -> String {
    let inner = data
        .strip_prefix('`')
        .map(|rest| rest.strip_suffix('`').unwrap_or(rest))
        .unwrap_or(data);
    inner.replace("``", "`")
}

/// Decode the escapes of a quoted string token into its value. The quotes
/// themselves (and, for unterminated strings, the missing closer) are
/// handled here; invalid escapes were already reported by the lexer and
/// are passed through verbatim.
pub(crate) fn unescape_string(data: &str) -> String {
    let mut chars = data.chars();
    let Some(quote) = chars.next() else {
        return String::new();
    };
    let mut value = String::with_capacity(data.len());
    while let Some(c) = chars.next() {
        if c == quote {
            break;
        }
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => value.push('\\'),
            Some('\'') => value.push('\''),
            Some('"') => value.push('"'),
            Some('b') => value.push('\u{8}'),
            Some('f') => value.push('\u{c}'),
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some(c @ ('u' | 'U')) => {
                let len = if c == 'u' { 4 } else { 8 };
                let hex: String = chars.clone().take(len).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == len => {
                        value.push(decoded);
                        for _ in 0..len {
                            chars.next();
                        }
                    }
                    _ => {
                        value.push('\\');
                        value.push(c);
                    }
                }
            }
            Some(c) => {
                value.push('\\');
                value.push(c);
            }
            None => break,
        }
    }
    value
}

/// Parse a required identifier, recording an error if missing.
pub(crate) fn identifier(p: &mut Parser) -> Option<NodeId> {
    if !is_name(p.peek()) {
        p.err_expected("an identifier");
        return None;
    }
    let token = p.pop();
    let text = name_text(&token);
    Some(p.arena.identifier(&text, token.range()))
}

/// Parse an identifier if one is present.
pub(crate) fn opt_identifier(p: &mut Parser) -> Option<NodeId> {
    if is_name(p.peek()) {
        identifier(p)
    } else {
        None
    }
}

/// Parse a symbolic name into the given leaf kind (`Label`, `RelType`,
/// `PropName`, `FunctionName`, `IndexName` or `ProcName`).
pub(crate) fn symbolic_name(p: &mut Parser, kind: NodeKind, what: &str) -> Option<NodeId> {
    if !is_symbolic_name(p.peek()) {
        p.err_expected(what);
        return None;
    }
    let token = p.pop();
    let text = name_text(&token);
    Some(p.arena.name_node(kind, &text, token.range()))
}

/// Parse `:Name` into a `Label` node.
pub(crate) fn label(p: &mut Parser) -> Option<NodeId> {
    if !p.expect(T![:], "':'") {
        return None;
    }
    symbolic_name(p, NodeKind::Label, "a label name")
}

/// Parse a string literal token into a `String` node carrying its
/// unescaped value.
pub(crate) fn string_literal(p: &mut Parser) -> Option<NodeId> {
    if !p.at(TokenKind::StringValue) {
        p.err_expected("a string");
        return None;
    }
    let token = p.pop();
    let value = unescape_string(token.data());
    Some(p.arena.string(value, token.range()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unescapes_simple_escapes() {
        assert_eq!(unescape_string(r#"'it\'s'"#), "it's");
        assert_eq!(unescape_string(r#""a\tb\nc""#), "a\tb\nc");
        assert_eq!(unescape_string(r#""back\\slash""#), "back\\slash");
    }

    #[test]
    fn unescapes_unicode() {
        assert_eq!(unescape_string(r#"'\u0041'"#), "A");
        assert_eq!(unescape_string(r#"'\U0001F600'"#), "\u{1F600}");
    }

    #[test]
    fn passes_bad_escapes_through() {
        assert_eq!(unescape_string(r#"'a\qb'"#), "a\\qb");
    }

    #[test]
    fn unterminated_string_value() {
        assert_eq!(unescape_string("'abc"), "abc");
    }

    #[test]
    fn unquotes_backquoted_names() {
        assert_eq!(unquote_name("`a b`"), "a b");
        assert_eq!(unquote_name("`tick``mark`"), "tick`mark");
    }
}
