use crate::lexer::InputPosition;
use std::fmt;

/// How many bytes of input to show on either side of an error position.
const CONTEXT_WINDOW: usize = 40;

/// A problem found while parsing.
///
/// Errors are recorded and parsing continues; a parse only "fails" in the
/// sense that its result carries a non-empty error list. Each error knows
/// its exact input position, a user-friendly message, and an excerpt of the
/// offending line suitable for caret diagnostics:
///
/// ```text
/// expected ')', found end of input (line 1, column 9 (offset 8))
/// MATCH (n
///         ^
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ParseError {
    pub(crate) position: InputPosition,
    pub(crate) message: String,
    pub(crate) context: String,
    pub(crate) context_offset: usize,
}

impl ParseError {
    pub(crate) fn new(
        message: impl Into<String>,
        position: InputPosition,
        context: String,
        context_offset: usize,
    ) -> Self {
        Self {
            position,
            message: message.into(),
            context,
            context_offset,
        }
    }

    /// Where the error begins in the input.
    pub fn position(&self) -> InputPosition {
        self.position
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// A short excerpt of the line the error occurred on, bounded to
    /// roughly forty bytes on either side with `...` marking truncation.
    /// Control characters are replaced with printable placeholders.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Byte index into [`context`](Self::context) of the offending input,
    /// typically rendered as a caret on the following line.
    pub fn context_offset(&self) -> usize {
        self.context_offset
    }
}

impl fmt::Debug for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ERROR@{} {:?} in {:?} at {}",
            self.position.offset, self.message, self.context, self.context_offset
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.position)
    }
}

/// A failure that prevents parsing from producing a result at all.
///
/// Syntax problems never surface here; they are recorded as
/// [`ParseError`]s on the result. This only covers failures of the
/// surrounding machinery, such as reading from a stream.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to read parse input: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the context excerpt for an error at byte `index` of `source`.
///
/// Scans back to the start of the line or up to [`CONTEXT_WINDOW`] bytes,
/// whichever comes first, and likewise forward to the end of the line.
/// Returns the excerpt and the offset of `index` within it.
pub(crate) fn context_excerpt(source: &str, index: usize) -> (String, usize) {
    let index = index.min(source.len());

    let line_start = source[..index]
        .rfind(['\n', '\r'])
        .map(|i| i + 1)
        .unwrap_or(0);
    let mut back = line_start.max(index.saturating_sub(CONTEXT_WINDOW));
    while !source.is_char_boundary(back) {
        back += 1;
    }
    let truncated_back = back > line_start;

    let line_end = source[index..]
        .find(['\n', '\r'])
        .map(|i| index + i)
        .unwrap_or(source.len());
    let mut forward = line_end.min(index + CONTEXT_WINDOW);
    while !source.is_char_boundary(forward) {
        forward -= 1;
    }
    let truncated_forward = forward < line_end;

    let mut context = String::new();
    if truncated_back {
        context.push_str("...");
    }
    let offset = context.len() + (index - back);
    for c in source[back..forward].chars() {
        context.push(match c {
            '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        });
    }
    if truncated_forward {
        context.push_str("...");
    }

    (context, offset)
}
