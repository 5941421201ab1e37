use crate::lexer::{InputPosition, InputRange, TokenKind};
use std::fmt;

/// A lexed token.
///
/// `data` borrows the raw input covered by the token, quotes and all. A
/// token produced from malformed input (unterminated string, bad escape,
/// stray character) still covers as much input as possible and carries the
/// problem in `error`, so the parser can report it and keep going.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub(crate) kind: TokenKind,
    pub(crate) data: &'a str,
    pub(crate) start: InputPosition,
    pub(crate) end: InputPosition,
    pub(crate) error: Option<&'static str>,
}

impl<'a> Token<'a> {
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The raw source text of the token.
    pub fn data(&self) -> &'a str {
        self.data
    }

    pub fn range(&self) -> InputRange {
        InputRange::new(self.start, self.end)
    }

    /// The byte offset the token starts at.
    pub fn index(&self) -> usize {
        self.start.offset
    }

    /// The lexical problem found while scanning this token, if any.
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}@{}:{} {:?}",
            self.kind, self.start.offset, self.end.offset, self.data
        )?;
        if let Some(error) = self.error {
            write!(f, " !{error}")?;
        }
        Ok(())
    }
}
