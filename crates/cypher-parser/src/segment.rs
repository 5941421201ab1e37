//! The segment dispatcher: the per-segment loop shared by the streaming,
//! batched and quick entry points, plus the result types.
//!
//! A segment is a contiguous span of input holding at most one directive
//! (a statement or client command) plus surrounding comments and
//! whitespace. Statements end at `;`, commands at a newline; the final
//! segment may instead end at EOF, which sets its `eof` flag. Comments
//! and whitespace after a delimiter belong to the preceding segment, so
//! segment ranges tile the consumed input exactly.

use crate::ast::{Arena, Node, NodeId, NodeKind};
use crate::error::{Error, ParseError};
use crate::lexer::{InputPosition, InputRange, Lexer, TokenKind, T};
use crate::parser::{grammar, Parser};
use crate::render::{self, Colorization};
use std::fmt;
use std::io::Read;
use std::ops::ControlFlow;
use triomphe::Arc;

#[derive(Debug)]
struct SegmentInner {
    arena: Arena,
    range: InputRange,
    roots: Vec<NodeId>,
    directive: Option<NodeId>,
    errors: Vec<ParseError>,
    eof: bool,
    nnodes: usize,
}

/// One parsed segment.
///
/// Cloning a segment retains the AST arena behind it (a reference-count
/// bump); the arena is freed when the last clone is dropped. Segments
/// handed to a [`Parser::parse_each`] callback are otherwise released
/// when the callback returns.
#[derive(Clone)]
pub struct Segment {
    inner: Arc<SegmentInner>,
}

impl Segment {
    /// The input span this segment covers, including its delimiter and
    /// any trailing comments and whitespace.
    pub fn range(&self) -> InputRange {
        self.inner.range
    }

    /// All AST roots of the segment in source order: the directive plus
    /// any comments and error placeholders.
    pub fn roots(&self) -> impl Iterator<Item = Node<'_>> {
        self.inner
            .roots
            .iter()
            .map(|&id| Node::new(&self.inner.arena, id))
    }

    /// The directive of this segment (its statement or command), if one
    /// was parsed.
    pub fn directive(&self) -> Option<Node<'_>> {
        self.inner
            .directive
            .map(|id| Node::new(&self.inner.arena, id))
    }

    pub fn errors(&self) -> impl ExactSizeIterator<Item = &ParseError> {
        self.inner.errors.iter()
    }

    /// True when the segment ended at end of input rather than at its
    /// delimiter.
    pub fn eof(&self) -> bool {
        self.inner.eof
    }

    /// Total number of AST nodes in this segment's trees.
    pub fn nnodes(&self) -> usize {
        self.inner.nnodes
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::render_segment(self, f, 0, Colorization::none())
    }
}

/// The outcome of a batched parse: every segment, in order.
pub struct ParseResult {
    segments: Vec<Segment>,
    last: InputPosition,
    colorization: &'static Colorization,
}

impl ParseResult {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// All AST roots across all segments, in source order.
    pub fn roots(&self) -> impl Iterator<Item = Node<'_>> {
        self.segments.iter().flat_map(Segment::roots)
    }

    /// The parsed statements and commands, in order.
    pub fn directives(&self) -> impl Iterator<Item = Node<'_>> {
        self.segments.iter().filter_map(Segment::directive)
    }

    /// Every error found, in source order.
    pub fn errors(&self) -> impl Iterator<Item = &ParseError> {
        self.segments.iter().flat_map(Segment::errors)
    }

    /// Total number of AST nodes parsed, across all segments.
    pub fn nnodes(&self) -> usize {
        self.segments.iter().map(Segment::nnodes).sum()
    }

    /// True when the last directive was terminated by end of input
    /// instead of its delimiter.
    pub fn eof(&self) -> bool {
        self.segments.last().is_some_and(Segment::eof)
    }

    /// The position parsing stopped at.
    pub fn last(&self) -> InputPosition {
        self.last
    }

    /// Render the AST node tables for all segments to `w`. `width` caps
    /// the description column (0 means unlimited).
    pub fn render_ast(&self, w: &mut impl fmt::Write, width: usize) -> fmt::Result {
        for segment in &self.segments {
            render::render_segment(segment, w, width, self.colorization)?;
        }
        Ok(())
    }

    /// Render caret diagnostics for every error to `w`.
    pub fn render_errors(&self, w: &mut impl fmt::Write) -> fmt::Result {
        for error in self.errors() {
            render::render_error(error, w, self.colorization)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            render::render_segment(segment, f, 0, Colorization::none())?;
        }
        Ok(())
    }
}

/// A segment found by the quick parser: boundaries and raw text only, no
/// AST. Boundaries are byte-for-byte the same as the full parser's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickSegment<'a> {
    text: &'a str,
    range: InputRange,
    is_command: bool,
    eof: bool,
}

impl<'a> QuickSegment<'a> {
    /// The raw text of the segment.
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn range(&self) -> InputRange {
        self.range
    }

    /// True if the segment holds a client command rather than a
    /// statement.
    pub fn is_command(&self) -> bool {
        self.is_command
    }

    pub fn eof(&self) -> bool {
        self.eof
    }
}

impl<'a> Parser<'a> {
    /// Parse the whole input, collecting every segment into one result.
    pub fn parse(self) -> ParseResult {
        let colorization = self.colorization;
        let mut segments = Vec::new();
        let last = self.parse_each(|segment| {
            segments.push(segment);
            ControlFlow::Continue(())
        });
        ParseResult {
            segments,
            last,
            colorization,
        }
    }

    /// Parse segment by segment, invoking `callback` as each one
    /// completes. The callback can return [`ControlFlow::Break`] to stop
    /// mid-input. Returns the position parsing stopped at.
    pub fn parse_each(
        mut self,
        mut callback: impl FnMut(Segment) -> ControlFlow<()>,
    ) -> InputPosition {
        let mut next_ordinal = self.initial_ordinal;
        let mut segment_start = self.lexer_position();

        loop {
            let first = self.peek();
            if first == TokenKind::Eof {
                let end = self.peek_token().start;
                if !self.pending_comments.is_empty()
                    || !self.errors.is_empty()
                    || end.offset > segment_start.offset
                {
                    let segment =
                        self.seal_segment(segment_start, end, None, Vec::new(), true, &mut next_ordinal);
                    let _ = callback(segment);
                }
                return end;
            }

            let mut extra_roots = Vec::new();
            let directive;
            let terminated;
            if first == T![:] && !self.only_statements {
                directive = grammar::command::command(&mut self);
                terminated = self.eat_command_terminator();
            } else {
                directive = grammar::statement::statement(&mut self);
                if self.eat(T![;]) {
                    terminated = true;
                } else if self.at(TokenKind::Eof) {
                    terminated = false;
                } else {
                    let garbage_start = self.start();
                    self.err_expected("';'");
                    extra_roots.push(self.recover_to_delimiter(garbage_start));
                    terminated = self.eat(T![;]);
                }
            }

            // In single-directive mode the input after the delimiter is
            // left untouched; otherwise trailing trivia joins this
            // segment and the next one starts at its directive.
            let end = if self.single {
                self.last_end()
            } else {
                self.peek_token().start
            };

            let segment = self.seal_segment(
                segment_start,
                end,
                Some(directive),
                extra_roots,
                !terminated,
                &mut next_ordinal,
            );
            let flow = callback(segment);
            segment_start = end;
            if flow.is_break() || self.single || !terminated || self.limit_reached() {
                return end;
            }
        }
    }

    /// Parse a single expression, exposed for tooling that works below
    /// the statement level. The expression becomes the sole root of a
    /// one-segment result.
    pub fn parse_expression(mut self) -> ParseResult {
        let colorization = self.colorization;
        let mut next_ordinal = self.initial_ordinal;
        let segment_start = self.lexer_position();

        let start = self.start();
        let expression = grammar::expression::expression(&mut self)
            .unwrap_or_else(|| self.recover(start, None));
        if !self.at(TokenKind::Eof) {
            self.err_expected("end of input");
        }
        let end = self.peek_token().start;
        let segment = self.seal_segment(
            segment_start,
            end,
            Some(expression),
            Vec::new(),
            true,
            &mut next_ordinal,
        );
        ParseResult {
            segments: vec![segment],
            last: end,
            colorization,
        }
    }

    fn seal_segment(
        &mut self,
        start: InputPosition,
        end: InputPosition,
        directive: Option<NodeId>,
        extra_roots: Vec<NodeId>,
        eof: bool,
        next_ordinal: &mut u32,
    ) -> Segment {
        let mut roots = std::mem::take(&mut self.pending_comments);
        roots.extend(extra_roots);
        roots.extend(directive);
        // A directive slot is only a statement or command; a bare error
        // root stays in `roots` but is not a directive.
        let directive = directive.filter(|&id| {
            matches!(self.arena.kind(id), NodeKind::Statement | NodeKind::Command)
        });
        {
            let arena = &self.arena;
            roots.sort_by_key(|&id| arena.node(id).range.start.offset);
        }
        let mut arena = std::mem::take(&mut self.arena);
        let nnodes = arena.assign_ordinals(&roots, next_ordinal);
        let errors = std::mem::take(&mut self.errors);
        let range = InputRange::new(start, end);
        log::debug!(
            "segment {range}: {} roots, {} nodes, {} errors{}",
            roots.len(),
            nnodes,
            errors.len(),
            if eof { ", eof" } else { "" }
        );
        Segment {
            inner: Arc::new(SegmentInner {
                arena,
                range,
                roots,
                directive,
                errors,
                eof,
                nnodes,
            }),
        }
    }
}

/// Quick parsing: segment boundaries without AST construction.
impl<'a> Parser<'a> {
    /// Find segment boundaries without building an AST, invoking
    /// `callback` per segment. Boundaries are identical to what the full
    /// parser produces for the same input and flags.
    pub fn quick_parse_each(
        self,
        mut callback: impl FnMut(QuickSegment<'a>) -> ControlFlow<()>,
    ) -> InputPosition {
        let only_statements = self.only_statements;
        let single = self.single;
        let mut lexer = self.into_lexer();
        let source = lexer.source();
        let base = lexer.position().offset;
        let mut segment_start = lexer.position();

        loop {
            let first = next_significant(&mut lexer);
            if first.kind() == TokenKind::Eof {
                let end = first.range().start;
                if end.offset > segment_start.offset {
                    let segment = QuickSegment {
                        text: &source[segment_start.offset - base..end.offset - base],
                        range: InputRange::new(segment_start, end),
                        is_command: false,
                        eof: true,
                    };
                    let _ = callback(segment);
                }
                return end;
            }

            let is_command = first.kind() == T![:] && !only_statements;
            let terminated = if is_command {
                while lexer.command_word().is_some() {}
                lexer.eat_command_terminator()
            } else if first.kind() == TokenKind::Semicolon {
                true
            } else {
                loop {
                    match lexer.next() {
                        Some(token) if token.kind() == TokenKind::Semicolon => break true,
                        Some(token) if token.kind() == TokenKind::Eof => break false,
                        Some(_) => {}
                        None => break false,
                    }
                }
            };

            let end = if single {
                lexer.position()
            } else {
                loop {
                    let probe = lexer.clone();
                    match lexer.next() {
                        Some(token) if token.kind().is_trivia() => {}
                        Some(token) => {
                            lexer = probe;
                            break token.range().start;
                        }
                        None => break lexer.position(),
                    }
                }
            };

            let segment = QuickSegment {
                text: &source[segment_start.offset - base..end.offset - base],
                range: InputRange::new(segment_start, end),
                is_command,
                eof: !terminated,
            };
            let flow = callback(segment);
            segment_start = end;
            if flow.is_break() || single || !terminated {
                return end;
            }
        }
    }

    /// Collect all quick-parse segments.
    pub fn quick_parse(self) -> Vec<QuickSegment<'a>> {
        let mut segments = Vec::new();
        self.quick_parse_each(|segment| {
            segments.push(segment);
            ControlFlow::Continue(())
        });
        segments
    }
}

fn next_significant<'a>(lexer: &mut Lexer<'a>) -> crate::lexer::Token<'a> {
    loop {
        match lexer.next() {
            Some(token) if token.kind().is_trivia() => {}
            Some(token) => return token,
            None => unreachable!("the lexer yields an EOF token before ending"),
        }
    }
}

/// Read all input from `reader` and parse it with default options.
///
/// Equivalent to [`Parser::parse`] over the buffered text; the only
/// errors surfaced here are I/O failures.
pub fn parse_reader(mut reader: impl Read) -> Result<ParseResult, Error> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(Parser::new(&input).parse())
}
