//! Source locations inside a formula expression.
//!
//! Every token, AST node and diagnostic carries a [`Span`] so messages can be
//! attributed to the sub-expression that caused them.

use std::fmt;

/// A region of expression text, identified by its starting position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, counted in characters).
    pub col: u32,
    /// Length in characters.
    pub len: u32,
}

impl Span {
    /// Create a new span from a line, column, and length.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The length of this span in characters.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// Spans on different lines keep the start of the earlier one and add up
    /// the lengths; expressions rarely span lines so this stays approximate.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        let (first, second) = if (other.line, other.col) < (self.line, self.col) {
            (other, self)
        } else {
            (self, other)
        };

        if first.line == second.line {
            let end = (second.col + second.len).max(first.col + first.len);
            Span {
                line: first.line,
                col: first.col,
                len: end - first.col,
            }
        } else {
            Span {
                line: first.line,
                col: first.col,
                len: first.len + second.len,
            }
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
