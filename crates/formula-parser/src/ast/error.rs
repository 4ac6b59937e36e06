//! Parse error types for the formula parser.
//!
//! Provides error reporting with source location tracking.

use formula_core::Span;
use std::fmt;

/// A parse error with location and diagnostic information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The type of error that occurred.
    pub kind: ParseErrorKind,
    /// The location in the expression where the error occurred.
    pub span: Span,
    /// Additional context or message.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Format the error with source context for display.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = String::new();

        let line = self.span.line;
        let column = self.span.col;

        output.push_str(&format!("Error at {}:{}: {}\n", line, column, self.kind));

        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }

        // Show the relevant line with a caret under the error
        if let Some(line_text) = Self::get_line(source, line) {
            output.push_str("  |\n");
            output.push_str(&format!("{:>3} | {}\n", line, line_text));

            let indent = " ".repeat(column.saturating_sub(1) as usize);
            let pointer = if self.span.len <= 1 {
                "^".to_string()
            } else {
                "^".to_string() + &"~".repeat((self.span.len - 1) as usize)
            };
            output.push_str(&format!("  | {}{}\n", indent, pointer));
        }

        output
    }

    /// Get the text of a specific line (1-indexed).
    fn get_line(source: &str, line_num: u32) -> Option<&str> {
        source.lines().nth(line_num.checked_sub(1)? as usize)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:?}", self.kind, self.span)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Expected a specific token but found something else.
    ExpectedToken,
    /// Unexpected token in this context, including input after a complete expression.
    UnexpectedToken,
    /// Expected an expression.
    ExpectedExpression,
    /// The lexer could not form a token.
    InvalidToken,
    /// Sub-expressions nest deeper than the configured limit.
    NestingTooDeep,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::InvalidToken => "invalid token",
            ParseErrorKind::NestingTooDeep => "expression nested too deeply",
        };
        write!(f, "{}", s)
    }
}
