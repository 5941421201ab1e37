use std::fmt;

/// A point in the parser input.
///
/// `line` and `column` are 1-based, `offset` is a 0-based byte offset. The
/// origin is configurable via [`Parser::initial_position`]: all positions
/// reported in ranges and errors are offset from it, as if the input had
/// been preceded by unparsed text up to that point.
///
/// [`Parser::initial_position`]: crate::Parser::initial_position
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputPosition {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl InputPosition {
    /// The default origin: line 1, column 1, offset 0.
    pub const START: InputPosition = InputPosition {
        line: 1,
        column: 1,
        offset: 0,
    };

    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Debug for InputPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {} (offset {})",
            self.line, self.column, self.offset
        )
    }
}

impl fmt::Display for InputPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {} (offset {})",
            self.line, self.column, self.offset
        )
    }
}

/// A half-open span of input: `start` is inclusive, `end` exclusive.
///
/// Every AST node carries the range of input it was parsed from.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputRange {
    pub start: InputPosition,
    pub end: InputPosition,
}

impl InputRange {
    pub fn new(start: InputPosition, end: InputPosition) -> Self {
        Self { start, end }
    }

    /// True if `other` lies entirely within this range.
    pub fn contains(&self, other: &InputRange) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }

    /// Length of the range in bytes.
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for InputRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.offset, self.end.offset)
    }
}

impl fmt::Display for InputRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.offset, self.end.offset)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn range_containment() {
        let outer = InputRange::new(
            InputPosition::new(1, 1, 0),
            InputPosition::new(1, 10, 9),
        );
        let inner = InputRange::new(
            InputPosition::new(1, 3, 2),
            InputPosition::new(1, 7, 6),
        );
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.contains(&outer));
        assert_eq!(outer.len(), 9);
    }
}
