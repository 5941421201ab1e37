mod cursor;
mod keyword;
mod location;
mod token;
mod token_kind;

use cursor::Cursor;

pub use keyword::Keyword;
pub use location::{InputPosition, InputRange};
pub use token::Token;
pub use token_kind::TokenKind;
pub(crate) use token_kind::T;

/// An on-demand lexer over a Cypher input.
///
/// The lexer is an iterator: the parser pulls the next token only when it
/// needs one. Cloning the lexer is cheap and acts as a checkpoint, which is
/// how the parser implements arbitrary lookahead and speculative matching.
///
/// A final [`TokenKind::Eof`] token is produced before the iterator ends.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_position(input, InputPosition::START)
    }

    pub(crate) fn with_position(input: &'a str, initial: InputPosition) -> Self {
        Self {
            cursor: Cursor::new(input, initial),
            finished: false,
        }
    }

    /// Position of the next unconsumed byte.
    pub(crate) fn position(&self) -> InputPosition {
        self.cursor.position()
    }

    pub(crate) fn source(&self) -> &'a str {
        self.cursor.source()
    }

    fn token(
        &self,
        kind: TokenKind,
        start: InputPosition,
        from: usize,
        error: Option<&'static str>,
    ) -> Token<'a> {
        Token {
            kind,
            data: self.cursor.slice_from(from),
            start,
            end: self.cursor.position(),
            error,
        }
    }

    fn advance(&mut self) -> Token<'a> {
        let start = self.cursor.position();
        let from = self.cursor.index();
        // Unwrap is fine: advance() is only called when not at EOF.
        let first = self.cursor.first().unwrap_or('\0');

        match first {
            c if c.is_whitespace() => {
                self.cursor.eat_while(char::is_whitespace);
                self.token(TokenKind::Whitespace, start, from, None)
            }
            '/' if self.cursor.second() == Some('/') => self.line_comment(start, from),
            '/' if self.cursor.second() == Some('*') => self.block_comment(start, from),
            '\'' | '"' => self.string_value(start, from, false),
            '`' => self.quoted_name(start, from),
            '$' => self.parameter(start, from),
            c if c.is_ascii_digit() => self.number(start, from),
            '.' if self.cursor.second().is_some_and(|c| c.is_ascii_digit()) => {
                self.number(start, from)
            }
            c if is_name_start(c) => self.name(start, from),
            _ => self.punctuation(start, from),
        }
    }

    fn line_comment(&mut self, start: InputPosition, from: usize) -> Token<'a> {
        self.cursor.bump();
        self.cursor.bump();
        self.cursor.eat_while(|c| c != '\n' && c != '\r');
        self.token(TokenKind::LineComment, start, from, None)
    }

    /// Block comments nest: every `/*` must be balanced by a `*/`.
    fn block_comment(&mut self, start: InputPosition, from: usize) -> Token<'a> {
        self.cursor.bump();
        self.cursor.bump();
        let mut depth = 1usize;
        while let Some(c) = self.cursor.bump() {
            match c {
                '*' if self.cursor.first() == Some('/') => {
                    self.cursor.bump();
                    depth -= 1;
                    if depth == 0 {
                        return self.token(TokenKind::BlockComment, start, from, None);
                    }
                }
                '/' if self.cursor.first() == Some('*') => {
                    self.cursor.bump();
                    depth += 1;
                }
                _ => {}
            }
        }
        self.token(
            TokenKind::BlockComment,
            start,
            from,
            Some("unterminated block comment"),
        )
    }

    /// Scan a quoted string. Recognized escapes: `\\` `\'` `\"` `\b` `\f`
    /// `\n` `\r` `\t` `\uXXXX` `\UXXXXXXXX`.
    ///
    /// An unterminated string still produces a token covering the rest of
    /// the input (or, with `line_bounded`, the rest of the line) so parsing
    /// can continue past it.
    fn string_value(
        &mut self,
        start: InputPosition,
        from: usize,
        line_bounded: bool,
    ) -> Token<'a> {
        let quote = self.cursor.bump().unwrap_or('"');
        let mut error = None;
        loop {
            match self.cursor.first() {
                None => {
                    error = error.or(Some("unterminated string"));
                    break;
                }
                Some(c) if line_bounded && (c == '\n' || c == '\r') => {
                    error = error.or(Some("unterminated string"));
                    break;
                }
                Some(c) if c == quote => {
                    self.cursor.bump();
                    break;
                }
                Some('\\') => {
                    self.cursor.bump();
                    if let Some(problem) = self.escape_sequence() {
                        error = error.or(Some(problem));
                    }
                }
                Some(_) => {
                    self.cursor.bump();
                }
            }
        }
        self.token(TokenKind::StringValue, start, from, error)
    }

    fn escape_sequence(&mut self) -> Option<&'static str> {
        match self.cursor.bump() {
            None => Some("unterminated string"),
            Some('\\' | '\'' | '"' | 'b' | 'f' | 'n' | 'r' | 't') => None,
            Some('u') => self.hex_digits(4),
            Some('U') => self.hex_digits(8),
            Some(_) => Some("invalid escape sequence"),
        }
    }

    fn hex_digits(&mut self, count: usize) -> Option<&'static str> {
        for _ in 0..count {
            match self.cursor.first() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.cursor.bump();
                }
                _ => return Some("invalid unicode escape sequence"),
            }
        }
        None
    }

    /// `` `quoted identifier` ``, with doubled backquotes as the escape.
    fn quoted_name(&mut self, start: InputPosition, from: usize) -> Token<'a> {
        self.cursor.bump();
        loop {
            match self.cursor.bump() {
                None => {
                    return self.token(
                        TokenKind::QuotedName,
                        start,
                        from,
                        Some("unterminated quoted identifier"),
                    );
                }
                Some('`') => {
                    if self.cursor.first() == Some('`') {
                        self.cursor.bump();
                    } else {
                        return self.token(TokenKind::QuotedName, start, from, None);
                    }
                }
                Some(_) => {}
            }
        }
    }

    fn parameter(&mut self, start: InputPosition, from: usize) -> Token<'a> {
        self.cursor.bump();
        let mut error = None;
        match self.cursor.first() {
            Some(c) if c.is_ascii_digit() => {
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
            Some(c) if is_name_start(c) => {
                self.cursor.eat_while(is_name_continue);
            }
            _ => error = Some("expected a parameter name"),
        }
        self.token(TokenKind::Parameter, start, from, error)
    }

    fn number(&mut self, start: InputPosition, from: usize) -> Token<'a> {
        let mut error = None;
        let mut kind = TokenKind::Int;

        if self.cursor.first() == Some('0')
            && matches!(self.cursor.second(), Some('x') | Some('X'))
        {
            self.cursor.bump();
            self.cursor.bump();
            if !self.cursor.first().is_some_and(|c| c.is_ascii_hexdigit()) {
                error = Some("invalid hexadecimal integer");
            }
            self.cursor.eat_while(|c| c.is_ascii_hexdigit());
        } else {
            self.cursor.eat_while(|c| c.is_ascii_digit());
            if self.cursor.first() == Some('.')
                && self.cursor.second().is_some_and(|c| c.is_ascii_digit())
            {
                kind = TokenKind::Float;
                self.cursor.bump();
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
            if matches!(self.cursor.first(), Some('e') | Some('E')) {
                let after_sign = match self.cursor.second() {
                    Some('+') | Some('-') => self.cursor.nth(2),
                    other => other,
                };
                if after_sign.is_some_and(|c| c.is_ascii_digit()) {
                    kind = TokenKind::Float;
                    self.cursor.bump();
                    if matches!(self.cursor.first(), Some('+') | Some('-')) {
                        self.cursor.bump();
                    }
                    self.cursor.eat_while(|c| c.is_ascii_digit());
                }
            }
        }

        // "12abc" is a malformed literal, not an integer and a name.
        if self.cursor.first().is_some_and(is_name_continue) {
            self.cursor.eat_while(is_name_continue);
            error = error.or(Some("invalid number literal"));
        }
        self.token(kind, start, from, error)
    }

    fn name(&mut self, start: InputPosition, from: usize) -> Token<'a> {
        self.cursor.eat_while(is_name_continue);
        let data = self.cursor.slice_from(from);
        let kind = match Keyword::lookup(data) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Name,
        };
        self.token(kind, start, from, None)
    }

    fn punctuation(&mut self, start: InputPosition, from: usize) -> Token<'a> {
        let first = self.cursor.bump().unwrap_or('\0');
        let kind = match first {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LCurly,
            '}' => TokenKind::RCurly,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '|' => TokenKind::Pipe,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '^' => TokenKind::Caret,
            '-' => TokenKind::Minus,
            '.' => {
                if self.cursor.eat('.') {
                    TokenKind::DotDot
                } else {
                    TokenKind::Dot
                }
            }
            '+' => {
                if self.cursor.eat('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '=' => {
                if self.cursor.eat('~') {
                    TokenKind::RegexEq
                } else {
                    TokenKind::Eq
                }
            }
            '<' => {
                if self.cursor.eat('=') {
                    TokenKind::Lte
                } else if self.cursor.eat('>') {
                    TokenKind::Neq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.cursor.eat('=') {
                    TokenKind::Gte
                } else {
                    TokenKind::Gt
                }
            }
            _ => {
                return self.token(
                    TokenKind::Unknown,
                    start,
                    from,
                    Some("unexpected character"),
                );
            }
        };
        self.token(kind, start, from, None)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.finished {
            return None;
        }
        if self.cursor.is_eof() {
            self.finished = true;
            let position = self.cursor.position();
            return Some(Token {
                kind: TokenKind::Eof,
                data: "",
                start: position,
                end: position,
                error: None,
            });
        }
        Some(self.advance())
    }
}

/// Client-command scanning. Commands are not lexed as Cypher: after the
/// leading `:`, a command is a name followed by whitespace-separated
/// arguments, where only double-quoted strings are structured and
/// everything else is a bare word. A newline ends the command.
impl<'a> Lexer<'a> {
    /// Scan the next word or quoted argument on the command line, or
    /// `None` at the end of the line (or input).
    pub(crate) fn command_word(&mut self) -> Option<Token<'a>> {
        self.cursor
            .eat_while(|c| c.is_whitespace() && c != '\n' && c != '\r');
        let start = self.cursor.position();
        let from = self.cursor.index();
        match self.cursor.first() {
            None | Some('\n') | Some('\r') => None,
            Some('"') => Some(self.string_value(start, from, true)),
            Some(_) => {
                self.cursor.eat_while(|c| !c.is_whitespace());
                Some(self.token(TokenKind::Name, start, from, None))
            }
        }
    }

    /// Consume the newline terminating a command. Returns `false` at EOF,
    /// meaning the terminator was implicit.
    pub(crate) fn eat_command_terminator(&mut self) -> bool {
        match self.cursor.first() {
            Some('\r') => {
                self.cursor.bump();
                if self.cursor.first() == Some('\n') {
                    self.cursor.bump();
                }
                true
            }
            Some('\n') => {
                self.cursor.bump();
                true
            }
            _ => false,
        }
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .filter(|token| !token.kind().is_trivia())
            .map(|token| token.kind())
            .collect()
    }

    #[test]
    fn lexes_a_simple_query() {
        use Keyword::*;
        assert_eq!(
            kinds("MATCH (n:Person) RETURN n;"),
            vec![
                TokenKind::Keyword(Match),
                TokenKind::LParen,
                TokenKind::Name,
                TokenKind::Colon,
                TokenKind::Name,
                TokenKind::RParen,
                TokenKind::Keyword(Return),
                TokenKind::Name,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_fold_case() {
        assert_eq!(
            kinds("match MATCH Match"),
            vec![
                TokenKind::Keyword(Keyword::Match),
                TokenKind::Keyword(Keyword::Match),
                TokenKind::Keyword(Keyword::Match),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn multi_char_operators() {
        assert_eq!(
            kinds("<= >= <> =~ += .. ."),
            vec![
                TokenKind::Lte,
                TokenKind::Gte,
                TokenKind::Neq,
                TokenKind::RegexEq,
                TokenKind::PlusEq,
                TokenKind::DotDot,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("1 12.5 .5 1e10 2E-3 0x1F 017"),
            vec![
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Int,
                TokenKind::Int,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn subscript_range_is_not_a_float() {
        assert_eq!(
            kinds("[1..2]"),
            vec![
                TokenKind::LBracket,
                TokenKind::Int,
                TokenKind::DotDot,
                TokenKind::Int,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        let tokens: Vec<_> = Lexer::new(r#"'it\'s' "aéb""#).collect();
        assert_eq!(tokens[0].kind(), TokenKind::StringValue);
        assert_eq!(tokens[0].data(), r#"'it\'s'"#);
        assert_eq!(tokens[0].error(), None);
        assert_eq!(tokens[2].kind(), TokenKind::StringValue);
        assert_eq!(tokens[2].error(), None);
    }

    #[test]
    fn unterminated_string_covers_rest_of_input() {
        let tokens: Vec<_> = Lexer::new("'abc").collect();
        assert_eq!(tokens[0].kind(), TokenKind::StringValue);
        assert_eq!(tokens[0].data(), "'abc");
        assert_eq!(tokens[0].error(), Some("unterminated string"));
        assert_eq!(tokens[1].kind(), TokenKind::Eof);
    }

    #[test]
    fn invalid_escape_is_reported_but_string_continues() {
        let tokens: Vec<_> = Lexer::new(r#"'a\qb' x"#).collect();
        assert_eq!(tokens[0].kind(), TokenKind::StringValue);
        assert_eq!(tokens[0].data(), r#"'a\qb'"#);
        assert_eq!(tokens[0].error(), Some("invalid escape sequence"));
    }

    #[test]
    fn block_comments_nest() {
        let tokens: Vec<_> = Lexer::new("/* a /* b */ c */x").collect();
        assert_eq!(tokens[0].kind(), TokenKind::BlockComment);
        assert_eq!(tokens[0].data(), "/* a /* b */ c */");
        assert_eq!(tokens[0].error(), None);
        assert_eq!(tokens[1].kind(), TokenKind::Name);
    }

    #[test]
    fn unterminated_block_comment_covers_to_eof() {
        let tokens: Vec<_> = Lexer::new("/* a /* b */").collect();
        assert_eq!(tokens[0].kind(), TokenKind::BlockComment);
        assert_eq!(tokens[0].error(), Some("unterminated block comment"));
        assert_eq!(tokens[1].kind(), TokenKind::Eof);
    }

    #[test]
    fn parameters() {
        let tokens: Vec<_> = Lexer::new("$name $0").collect();
        assert_eq!(tokens[0].kind(), TokenKind::Parameter);
        assert_eq!(tokens[0].data(), "$name");
        assert_eq!(tokens[2].kind(), TokenKind::Parameter);
        assert_eq!(tokens[2].data(), "$0");
    }

    #[test]
    fn quoted_names() {
        let tokens: Vec<_> = Lexer::new("`a b``c`").collect();
        assert_eq!(tokens[0].kind(), TokenKind::QuotedName);
        assert_eq!(tokens[0].data(), "`a b``c`");
        assert_eq!(tokens[0].error(), None);
    }

    #[test]
    fn command_words() {
        let mut lexer = Lexer::new("help foo \"bar baz\"\nnext");
        let word = lexer.command_word().unwrap();
        assert_eq!(word.data(), "help");
        let word = lexer.command_word().unwrap();
        assert_eq!(word.data(), "foo");
        let word = lexer.command_word().unwrap();
        assert_eq!(word.kind(), TokenKind::StringValue);
        assert_eq!(word.data(), "\"bar baz\"");
        assert!(lexer.command_word().is_none());
        assert!(lexer.eat_command_terminator());
        let word = lexer.command_word().unwrap();
        assert_eq!(word.data(), "next");
        assert!(!lexer.eat_command_terminator());
    }

    #[test]
    fn token_positions_track_lines() {
        let tokens: Vec<_> = Lexer::new("a\nbb").collect();
        assert_eq!(tokens[0].range().start, InputPosition::new(1, 1, 0));
        assert_eq!(tokens[2].range().start, InputPosition::new(2, 1, 2));
        assert_eq!(tokens[2].range().end, InputPosition::new(2, 3, 4));
    }
}
