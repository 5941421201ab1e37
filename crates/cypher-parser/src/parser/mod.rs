pub(crate) mod grammar;

use crate::ast::{Arena, NodeId, NodeKind};
use crate::error::{context_excerpt, ParseError};
use crate::lexer::{InputPosition, InputRange, Keyword, Lexer, Token, TokenKind};
use crate::render::Colorization;
use crate::LimitTracker;

/// Grammar productions nest at most this deep by default. Queries written
/// by people never get anywhere close; machine-generated expression
/// nesting can, and would otherwise overflow the stack.
const DEFAULT_RECURSION_LIMIT: usize = 500;

/// Parse Cypher statements and client commands into a typed AST.
///
/// The parser is configured in builder style and then consumed by one of
/// the entry points:
///
/// ```rust
/// use cypher_parser::{NodeKind, Parser};
///
/// let result = Parser::new("MATCH (n:Person) RETURN n.name;").parse();
/// assert_eq!(0, result.errors().count());
///
/// let statement = result.directives().next().unwrap();
/// assert_eq!(statement.kind(), NodeKind::Statement);
/// ```
///
/// Syntax errors do not abort parsing: the parser records every problem
/// with its exact position and context, skips to a synchronization point,
/// and keeps going. Callers check [`ParseResult::errors`].
///
/// [`ParseResult::errors`]: crate::ParseResult::errors
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// One-token lookahead buffer; deeper lookahead clones the lexer.
    current_token: Option<Token<'a>>,
    /// The in-progress arena for the current segment.
    pub(crate) arena: Arena,
    /// Comment nodes awaiting attachment as segment roots.
    pub(crate) pending_comments: Vec<NodeId>,
    /// Errors of the current segment.
    pub(crate) errors: Vec<ParseError>,
    recursion_limit: LimitTracker,
    /// Cleared once a resource limit fires, so the early termination does
    /// not spray follow-on errors that aren't real.
    accept_errors: bool,
    limit_reached: bool,
    /// End of the most recently consumed token.
    prev_end: InputPosition,
    source: &'a str,
    base_offset: usize,
    pub(crate) only_statements: bool,
    pub(crate) single: bool,
    pub(crate) initial_ordinal: u32,
    pub(crate) colorization: &'static Colorization,
}

impl<'a> Parser<'a> {
    /// Create a parser over `input` with default options.
    pub fn new(input: &'a str) -> Self {
        let initial = InputPosition::START;
        Self {
            lexer: Lexer::with_position(input, initial),
            current_token: None,
            arena: Arena::default(),
            pending_comments: Vec::new(),
            errors: Vec::new(),
            recursion_limit: LimitTracker::new(DEFAULT_RECURSION_LIMIT),
            accept_errors: true,
            limit_reached: false,
            prev_end: initial,
            source: input,
            base_offset: initial.offset,
            only_statements: false,
            single: false,
            initial_ordinal: 0,
            colorization: Colorization::none(),
        }
    }

    /// Base for all reported positions, as if the input had been preceded
    /// by unparsed text up to this point. Defaults to `(1, 1, 0)`.
    pub fn initial_position(mut self, position: InputPosition) -> Self {
        self.lexer = Lexer::with_position(self.source, position);
        self.prev_end = position;
        self.base_offset = position.offset;
        self
    }

    /// Starting ordinal for AST node numbering. Defaults to 0.
    pub fn initial_ordinal(mut self, ordinal: u32) -> Self {
        self.initial_ordinal = ordinal;
        self
    }

    /// Disable client-command recognition: a leading `:` is then a syntax
    /// error rather than the start of a command, and only `;` terminates
    /// segments.
    pub fn only_statements(mut self, only_statements: bool) -> Self {
        self.only_statements = only_statements;
        self
    }

    /// Stop after the first directive instead of parsing to the end of
    /// the input.
    pub fn single(mut self, single: bool) -> Self {
        self.single = single;
        self
    }

    /// Configure the recursion limit to use while parsing.
    pub fn recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = LimitTracker::new(recursion_limit);
        self
    }

    /// Colorization scheme applied when rendering errors from the result.
    pub fn colorization(mut self, colorization: &'static Colorization) -> Self {
        self.colorization = colorization;
        self
    }
}

/// Token access.
impl<'a> Parser<'a> {
    fn eof_token(&self) -> Token<'a> {
        let position = self.lexer.position();
        Token {
            kind: TokenKind::Eof,
            data: "",
            start: position,
            end: position,
            error: None,
        }
    }

    /// Pull the next significant token from the lexer, turning comments
    /// into pending AST roots on the way.
    fn next_significant(&mut self) -> Token<'a> {
        loop {
            let Some(token) = self.lexer.next() else {
                return self.eof_token();
            };
            match token.kind {
                TokenKind::Whitespace => {}
                TokenKind::LineComment | TokenKind::BlockComment => self.comment_node(token),
                _ => return token,
            }
        }
    }

    fn comment_node(&mut self, token: Token<'a>) {
        if let Some(problem) = token.error {
            self.err_at(token.start, problem.to_string());
        }
        let (kind, text) = match token.kind {
            TokenKind::LineComment => (NodeKind::LineComment, &token.data[2..]),
            _ => {
                let text = token
                    .data
                    .strip_prefix("/*")
                    .map(|text| text.strip_suffix("*/").unwrap_or(text))
                    .unwrap_or(token.data);
                (NodeKind::BlockComment, text)
            }
        };
        let id = self.arena.comment(kind, text, token.range());
        self.pending_comments.push(id);
    }

    /// Peek the next significant token.
    pub(crate) fn peek_token(&mut self) -> &Token<'a> {
        if self.current_token.is_none() {
            self.current_token = Some(self.next_significant());
        }
        self.current_token.as_ref().expect("token was just buffered")
    }

    /// Peek the next significant token's kind.
    pub(crate) fn peek(&mut self) -> TokenKind {
        self.peek_token().kind
    }

    /// Peek significant token `n` (1-based; `peek_n(1)` is `peek()`).
    pub(crate) fn peek_n(&mut self, n: usize) -> TokenKind {
        self.peek_token_n(n)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn peek_token_n(&mut self, n: usize) -> Option<Token<'a>> {
        self.peek_token();
        self.current_token
            .iter()
            .copied()
            .chain(
                self.lexer
                    .clone()
                    .filter(|token| !token.kind.is_trivia()),
            )
            .nth(n - 1)
    }

    /// Consume the next significant token.
    pub(crate) fn pop(&mut self) -> Token<'a> {
        let token = match self.current_token.take() {
            Some(token) => token,
            None => self.next_significant(),
        };
        if token.kind != TokenKind::Eof {
            self.prev_end = token.end;
        }
        if let Some(problem) = token.error {
            self.err_at(token.start, problem.to_string());
        }
        token
    }

    /// Consume the next token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pop();
            true
        } else {
            false
        }
    }

    pub(crate) fn at(&mut self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    pub(crate) fn at_kw(&mut self, keyword: Keyword) -> bool {
        self.peek() == TokenKind::Keyword(keyword)
    }

    /// True if the next two significant tokens are these keywords.
    pub(crate) fn at_kws(&mut self, first: Keyword, second: Keyword) -> bool {
        self.at_kw(first) && self.peek_n(2) == TokenKind::Keyword(second)
    }

    pub(crate) fn eat_kw(&mut self, keyword: Keyword) -> bool {
        if self.at_kw(keyword) {
            self.pop();
            true
        } else {
            false
        }
    }

    /// Consume the next token if it is `kind`, or record an error naming
    /// the expected construct.
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.err_expected(what);
        false
    }

    pub(crate) fn expect_kw(&mut self, keyword: Keyword, what: &str) -> bool {
        if self.eat_kw(keyword) {
            return true;
        }
        self.err_expected(what);
        false
    }

    /// Start position of the next significant token; used as the start of
    /// the range for the node about to be parsed.
    pub(crate) fn start(&mut self) -> InputPosition {
        self.peek_token().start
    }

    /// End position of the last consumed token.
    pub(crate) fn last_end(&self) -> InputPosition {
        self.prev_end
    }

    /// The range from `start` to the end of the last consumed token.
    pub(crate) fn span(&self, start: InputPosition) -> InputRange {
        if self.prev_end.offset < start.offset {
            InputRange::new(start, start)
        } else {
            InputRange::new(start, self.prev_end)
        }
    }

    pub(crate) fn lexer_mut(&mut self) -> &mut Lexer<'a> {
        debug_assert!(
            self.current_token.is_none(),
            "raw lexer access with a buffered token"
        );
        &mut self.lexer
    }

    /// Consume the newline ending a command; false means the terminator
    /// was implicit (EOF).
    pub(crate) fn eat_command_terminator(&mut self) -> bool {
        debug_assert!(self.current_token.is_none());
        let terminated = self.lexer.eat_command_terminator();
        if terminated {
            self.prev_end = self.lexer.position();
        }
        terminated
    }

    /// The lexer's current position. Only meaningful while no token is
    /// buffered.
    pub(crate) fn lexer_position(&self) -> InputPosition {
        self.lexer.position()
    }

    pub(crate) fn into_lexer(self) -> Lexer<'a> {
        debug_assert!(self.current_token.is_none());
        self.lexer
    }

    /// Account for a token consumed through the raw command-mode lexer,
    /// which bypasses [`pop`](Self::pop).
    pub(crate) fn note_command_token(&mut self, token: &Token<'a>) {
        self.prev_end = token.end;
        if let Some(problem) = token.error {
            self.err_at(token.start, problem.to_string());
        }
    }
}

/// Errors, recovery, limits.
impl<'a> Parser<'a> {
    /// Record an error at a given position.
    pub(crate) fn err_at(&mut self, position: InputPosition, message: String) {
        if !self.accept_errors {
            return;
        }
        let index = position.offset.saturating_sub(self.base_offset);
        let (context, context_offset) = context_excerpt(self.source, index);
        self.errors
            .push(ParseError::new(message, position, context, context_offset));
    }

    /// Record an "expected X, found Y" error at the current token.
    pub(crate) fn err_expected(&mut self, what: &str) {
        let token = *self.peek_token();
        let message = match token.kind {
            TokenKind::Eof => format!("expected {what}, found end of input"),
            _ => format!("expected {what}, found '{}'", token.data),
        };
        self.err_at(token.start, message);
    }

    /// Record an error and skip to a synchronization point: the nearest
    /// clause-initial keyword, `;`, end of input, or (inside a bracketed
    /// construct) the balanced close of `closer`. Produces an error node
    /// covering everything from `start` through the skipped input, so the
    /// tree stays well formed.
    pub(crate) fn err_recover(
        &mut self,
        what: &str,
        start: InputPosition,
        closer: Option<TokenKind>,
    ) -> NodeId {
        self.err_expected(what);
        self.recover(start, closer)
    }

    /// Skip to a synchronization point without recording a new error.
    pub(crate) fn recover(
        &mut self,
        start: InputPosition,
        closer: Option<TokenKind>,
    ) -> NodeId {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::Eof | TokenKind::Semicolon => break,
                TokenKind::Keyword(keyword) if depth == 0 && keyword.starts_clause() => break,
                kind => {
                    if let Some(closer) = closer {
                        if depth == 0 && kind == closer {
                            break;
                        }
                    }
                    match kind {
                        TokenKind::LParen | TokenKind::LBracket | TokenKind::LCurly => {
                            depth += 1;
                        }
                        TokenKind::RParen | TokenKind::RBracket | TokenKind::RCurly => {
                            if depth == 0 {
                                break;
                            }
                            depth -= 1;
                        }
                        _ => {}
                    }
                    self.pop();
                }
            }
        }
        self.error_node_over(start)
    }

    /// Skip everything up to the next `;` or end of input. Used at the
    /// dispatcher level where the segment boundary is the only viable
    /// synchronization point left.
    pub(crate) fn recover_to_delimiter(&mut self, start: InputPosition) -> NodeId {
        while !matches!(self.peek(), TokenKind::Eof | TokenKind::Semicolon) {
            self.pop();
        }
        self.error_node_over(start)
    }

    /// An error placeholder covering `start` to the current point. The
    /// parser's end position is advanced over the node so enclosing
    /// constructs contain it even when nothing was skipped.
    fn error_node_over(&mut self, start: InputPosition) -> NodeId {
        let range = self.span(start);
        if range.end.offset > self.prev_end.offset {
            self.prev_end = range.end;
        }
        log::trace!("recovered over {range}");
        self.arena.error(range)
    }

    /// Enter a nested production; returns false once the recursion limit
    /// is hit, after recording a single resource error.
    pub(crate) fn enter(&mut self) -> bool {
        self.recursion_limit.consume();
        if self.recursion_limit.limited() {
            if self.accept_errors {
                let position = self.peek_token().start;
                self.err_at(position, "parser recursion limit reached".to_string());
            }
            self.accept_errors = false;
            self.limit_reached = true;
            return false;
        }
        true
    }

    pub(crate) fn leave(&mut self) {
        self.recursion_limit.release();
    }

    /// True once a resource limit has fired; the dispatcher stops after
    /// the current segment.
    pub(crate) fn limit_reached(&self) -> bool {
        self.limit_reached
    }
}
