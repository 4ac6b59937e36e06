//! Lexical errors.

use formula_core::Span;
use thiserror::Error;

/// The kind of lexical error that occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexerErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid escape sequence '\\{0}' (only \\\" and \\\\ are allowed)")]
    InvalidEscape(char),

    /// A number followed by letters that are not a three-letter currency code.
    #[error("'{0}' is not a three-letter currency code")]
    InvalidCurrencySuffix(String),
}

/// A lexical error with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct LexerError {
    pub kind: LexerErrorKind,
    pub span: Span,
}

impl LexerError {
    pub fn new(kind: LexerErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn unexpected_char(c: char, span: Span) -> Self {
        Self::new(LexerErrorKind::UnexpectedChar(c), span)
    }

    pub fn unterminated_string(span: Span) -> Self {
        Self::new(LexerErrorKind::UnterminatedString, span)
    }

    pub fn invalid_escape(c: char, span: Span) -> Self {
        Self::new(LexerErrorKind::InvalidEscape(c), span)
    }

    pub fn invalid_currency_suffix(suffix: &str, span: Span) -> Self {
        Self::new(LexerErrorKind::InvalidCurrencySuffix(suffix.to_string()), span)
    }
}
