//! Source locations carried on the parser's span stack.
//!
//! The engine never looks inside a location; it only combines them through
//! [`Merge`]. Two ready-made location types are provided: [`Span`], a
//! line/column range produced by text scanners, and `Range<usize>` for
//! byte-offset ranges.
//!
//! # Examples
//!
//! ```rust
//! # use lrdrive::{Merge, Position, Span, span};
//! let ident = span!(0, 4, 0, 9);
//! let semi = span!(0, 10, 0, 11);
//! let stmt = ident.merge(&semi);
//! assert_eq!(stmt.start, Position::new(0, 4));
//! assert_eq!(stmt.end, Position::new(0, 11));
//! ```

use std::fmt;
use std::ops::Range;

/// A location that can be joined with a location that follows it.
///
/// `first.merge(&last)` must return a location that starts where `first`
/// starts and ends where `last` ends. The engine builds the location of a
/// reduced rule as `first_rhs.merge(&last_rhs)`, and the location of an empty
/// rule as `next_token.merge(&previous_token)`, so the latter starts after
/// the previous token and ends before the next one.
pub trait Merge {
    fn merge(&self, last: &Self) -> Self;
}

impl Merge for Range<usize> {
    #[inline]
    fn merge(&self, last: &Self) -> Self {
        self.start..last.end
    }
}

/// A 0-based line/column position in source text.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 0-based line number.
    pub line: usize,
    /// 0-based column number (character position in the line).
    pub column: usize,
}

impl Position {
    /// Creates a new `Position`.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Moves past `text`, counting a newline as the start of the next line.
    pub fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }
}

impl fmt::Display for Position {
    /// Formats the position 1-based, the way editors show it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A half-open source range: `[start, end)`.
///
/// `Span` marks the region of source text that a token or a reduced rule
/// covers. The span of an empty rule sits between two tokens and may have
/// `start > end` when whitespace separates them; merging it with its
/// neighbours still yields the right covering range.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Creates a new `Span`.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// An empty span at `at`.
    #[inline]
    pub const fn point(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Is this span empty (start == end)?
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the inclusive line range spanned by this `Span`.
    #[inline]
    pub fn line_range(&self) -> (usize, usize) {
        (self.start.line, self.end.line)
    }
}

impl Merge for Span {
    #[inline]
    fn merge(&self, last: &Self) -> Self {
        Span {
            start: self.start,
            end: last.end,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Build a [`Span`] inline from 0-based line/column coordinates.
///
/// # Examples
///
/// ```rust
/// # use lrdrive::span;
/// let s = span!(0, 0, 1, 4);
/// assert_eq!(s.end.column, 4);
/// ```
#[macro_export]
macro_rules! span {
    ($line_start:expr, $col_start:expr, $line_end:expr, $col_end:expr) => {
        $crate::Span {
            start: $crate::Position {
                line: $line_start,
                column: $col_start,
            },
            end: $crate::Position {
                line: $line_end,
                column: $col_end,
            },
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_runs_from_first_start_to_last_end() {
        let a = span!(0, 0, 0, 3);
        let b = span!(2, 1, 2, 7);
        assert_eq!(a.merge(&b), span!(0, 0, 2, 7));
    }

    #[test]
    fn merge_of_adjacent_tokens_in_reverse_is_empty() {
        // previous token ends at column 10, next starts at column 10
        let previous = span!(0, 6, 0, 10);
        let next = span!(0, 10, 0, 12);
        let gap = next.merge(&previous);
        assert!(gap.is_empty());
        assert_eq!(gap, Span::point(Position::new(0, 10)));
    }

    #[test]
    fn empty_span_between_separated_tokens_is_inverted_but_merges_cleanly() {
        let word = span!(0, 0, 0, 3);
        let next = span!(0, 5, 0, 6);
        let gap = next.merge(&word);
        assert!(gap.start > gap.end);
        assert_eq!(word.merge(&gap), word);
    }

    #[test]
    fn range_merge() {
        assert_eq!((3..5).merge(&(8..13)), 3..13);
        assert_eq!((10..12).merge(&(4..10)), 10..10);
    }

    #[test]
    fn position_advances_over_newlines() {
        let mut p = Position::default();
        p.advance("ab\ncd");
        assert_eq!(p, Position::new(1, 2));
        p.advance("\n");
        assert_eq!(p, Position::new(2, 0));
    }

    #[test]
    fn display_is_one_based() {
        assert_eq!(span!(0, 0, 1, 4).to_string(), "1:1-2:5");
        assert_eq!(span!(3, 2, 3, 2).line_range(), (3, 3));
    }
}
