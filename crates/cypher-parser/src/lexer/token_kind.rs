use crate::lexer::Keyword;

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier that is not in the keyword set.
    Name,
    /// A back-quoted identifier; `data` includes the quotes.
    QuotedName,
    /// A member of the closed keyword set, case-folded.
    Keyword(Keyword),
    Int,
    Float,
    /// A single- or double-quoted string; `data` includes the quotes.
    StringValue,
    /// `$name` or `$123`; `data` includes the `$`.
    Parameter,
    LineComment,
    BlockComment,
    Whitespace,

    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LCurly,   // {
    RCurly,   // }
    Comma,    // ,
    Semicolon, // ;
    Colon,    // :
    Dot,      // .
    DotDot,   // ..
    Plus,     // +
    PlusEq,   // +=
    Minus,    // -
    Star,     // *
    Slash,    // /
    Percent,  // %
    Caret,    // ^
    Eq,       // =
    RegexEq,  // =~
    Neq,      // <>
    Lt,       // <
    Gt,       // >
    Lte,      // <=
    Gte,      // >=
    Pipe,     // |

    /// A character no token can start with.
    Unknown,
    Eof,
}

impl TokenKind {
    pub(crate) fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

/// Shorthand for punctuation [`TokenKind`]s, in the style of rust-analyzer.
macro_rules! T {
    ['('] => { $crate::lexer::TokenKind::LParen };
    [')'] => { $crate::lexer::TokenKind::RParen };
    ['['] => { $crate::lexer::TokenKind::LBracket };
    [']'] => { $crate::lexer::TokenKind::RBracket };
    ['{'] => { $crate::lexer::TokenKind::LCurly };
    ['}'] => { $crate::lexer::TokenKind::RCurly };
    [,] => { $crate::lexer::TokenKind::Comma };
    [;] => { $crate::lexer::TokenKind::Semicolon };
    [:] => { $crate::lexer::TokenKind::Colon };
    [.] => { $crate::lexer::TokenKind::Dot };
    [..] => { $crate::lexer::TokenKind::DotDot };
    [+] => { $crate::lexer::TokenKind::Plus };
    [+=] => { $crate::lexer::TokenKind::PlusEq };
    [-] => { $crate::lexer::TokenKind::Minus };
    [*] => { $crate::lexer::TokenKind::Star };
    [/] => { $crate::lexer::TokenKind::Slash };
    [%] => { $crate::lexer::TokenKind::Percent };
    [^] => { $crate::lexer::TokenKind::Caret };
    [=] => { $crate::lexer::TokenKind::Eq };
    [=~] => { $crate::lexer::TokenKind::RegexEq };
    [<>] => { $crate::lexer::TokenKind::Neq };
    [<] => { $crate::lexer::TokenKind::Lt };
    [>] => { $crate::lexer::TokenKind::Gt };
    [<=] => { $crate::lexer::TokenKind::Lte };
    [>=] => { $crate::lexer::TokenKind::Gte };
    [|] => { $crate::lexer::TokenKind::Pipe };
}

pub(crate) use T;
