//! Main lexer implementation for the formula language.
//!
//! The [`Lexer`] converts expression text into a stream of [`Token`]s.
//! It uses direct dispatch based on the first character.
//!
//! Number literals are locale-dependent: the locale decides the decimal
//! separator and the optional grouping separator. A number immediately
//! followed by letters is a money literal; anything but exactly three
//! letters is reported as an error token.
//!
//! The lexer copies all token text into the arena, allowing the expression
//! text to be freed after lexing completes.

use bumpalo::Bump;
use formula_core::{Locale, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::error::LexerError;
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for formula expressions.
///
/// The `'src` lifetime is the text being lexed (temporary).
/// The `'ast` lifetime is the arena where token lexemes are allocated (persists).
pub struct Lexer<'src, 'ast> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// Arena for allocating token lexemes.
    arena: &'ast Bump,
    /// Number format.
    locale: Locale,
    /// Accumulated errors.
    errors: Vec<LexerError>,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    /// Create a new lexer for the given text.
    pub fn new(source: &'src str, locale: Locale, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            locale,
            errors: Vec::new(),
        }
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Token<'ast> {
        self.scan_token()
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    /// Scan the next token.
    fn scan_token(&mut self) -> Token<'ast> {
        self.skip_whitespace();

        let start_line = self.cursor.line();
        let start_col = self.cursor.column();
        let start_offset = self.cursor.offset();

        let Some(c) = self.cursor.peek() else {
            return self.make_eof();
        };

        // Dispatch based on first character
        match c {
            '"' => self.scan_string(start_line, start_col, start_offset),
            c if c.is_ascii_digit() => self.scan_number(start_line, start_col, start_offset),
            c if is_ident_start(c) => self.scan_identifier(start_line, start_col, start_offset),
            _ => self.scan_operator(start_line, start_col, start_offset),
        }
    }

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(char::is_whitespace);
    }

    /// Create an EOF token.
    fn make_eof(&self) -> Token<'ast> {
        let line = self.cursor.line();
        let col = self.cursor.column();
        Token::new(TokenKind::Eof, "", Span::point(line, col))
    }

    /// Create a token from start position to current position.
    /// Copies the lexeme into the arena.
    fn make_token(
        &self,
        kind: TokenKind,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'ast> {
        let src_lexeme = self.cursor.slice_from(start_offset);
        let span = Span::new(start_line, start_col, src_lexeme.chars().count() as u32);
        let lexeme = self.arena.alloc_str(src_lexeme);
        Token::new(kind, lexeme, span)
    }

    /// Span from the start position to the current position.
    fn span_from(&self, start_line: u32, start_col: u32, start_offset: u32) -> Span {
        let len = self.cursor.slice_from(start_offset).chars().count() as u32;
        Span::new(start_line, start_col, len)
    }

    /// Create an error token and record the error.
    fn make_error(&mut self, error: LexerError) -> Token<'ast> {
        let span = error.span;
        self.errors.push(error);
        Token::new(TokenKind::Error, "", span)
    }

    // =========================================
    // Scanning: Strings
    // =========================================

    /// Scan a double-quoted string literal.
    ///
    /// The lexeme keeps its quotes and escapes; only `\"` and `\\` are valid.
    fn scan_string(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        self.cursor.advance(); // consume opening quote
        let mut bad_escape = None;

        loop {
            match self.cursor.peek() {
                None => {
                    let span = self.span_from(start_line, start_col, start_offset);
                    return self.make_error(LexerError::unterminated_string(span));
                }
                Some('\\') => {
                    let line = self.cursor.line();
                    let col = self.cursor.column();
                    self.cursor.advance();
                    match self.cursor.advance() {
                        Some('"' | '\\') => {}
                        Some(other) => {
                            bad_escape.get_or_insert(LexerError::invalid_escape(
                                other,
                                Span::new(line, col, 2),
                            ));
                        }
                        None => {}
                    }
                }
                Some('"') => {
                    self.cursor.advance();
                    if let Some(error) = bad_escape {
                        return self.make_error(error);
                    }
                    return self.make_token(
                        TokenKind::StringLiteral,
                        start_line,
                        start_col,
                        start_offset,
                    );
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // =========================================
    // Scanning: Numbers
    // =========================================

    /// Scan an integer, decimal or money literal.
    fn scan_number(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        self.consume_grouped_digits();

        let mut kind = TokenKind::IntegerLiteral;

        // Fractional part
        if self.cursor.peek() == Some(self.locale.decimal_separator)
            && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance(); // consume separator
            self.cursor.eat_while(|c| c.is_ascii_digit());
            kind = TokenKind::DecimalLiteral;
        }

        // Currency suffix
        if self.cursor.check(char::is_alphabetic) {
            let suffix_line = self.cursor.line();
            let suffix_col = self.cursor.column();
            let suffix = self.cursor.eat_while(char::is_alphabetic);
            if suffix.len() != 3 || !suffix.chars().all(|c| c.is_ascii_alphabetic()) {
                let span = Span::new(suffix_line, suffix_col, suffix.chars().count() as u32);
                return self.make_error(LexerError::invalid_currency_suffix(suffix, span));
            }
            kind = TokenKind::MoneyLiteral;
        }

        self.make_token(kind, start_line, start_col, start_offset)
    }

    /// Consume digits, allowing the grouping separator between two digits.
    fn consume_grouped_digits(&mut self) {
        loop {
            self.cursor.eat_while(|c| c.is_ascii_digit());
            let grouped = self
                .locale
                .grouping_separator
                .is_some_and(|g| self.cursor.peek() == Some(g))
                && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit());
            if !grouped {
                break;
            }
            self.cursor.advance(); // consume grouping separator
        }
    }

    // =========================================
    // Scanning: Identifiers and keywords
    // =========================================

    /// Scan an identifier or boolean keyword.
    fn scan_identifier(
        &mut self,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'ast> {
        self.cursor.eat_while(is_ident_continue);

        let lexeme = self.cursor.slice_from(start_offset);
        let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);

        self.make_token(kind, start_line, start_col, start_offset)
    }

    // =========================================
    // Scanning: Operators
    // =========================================

    /// Scan an operator or punctuation token.
    fn scan_operator(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        let Some(c) = self.cursor.advance() else {
            return self.make_eof();
        };
        let next = self.cursor.peek();

        let kind = match (c, next) {
            ('(', _) => TokenKind::LeftParen,
            (')', _) => TokenKind::RightParen,
            (',', _) => TokenKind::Comma,
            (';', _) => TokenKind::Semicolon,
            ('+', _) => TokenKind::Plus,
            ('-', _) => TokenKind::Minus,
            ('*', _) => TokenKind::Star,
            ('/', _) => TokenKind::Slash,
            ('=', _) => TokenKind::Equal,

            ('!', Some('=')) => { self.cursor.advance(); TokenKind::BangEqual }
            ('!', _) => TokenKind::Bang,

            ('<', Some('=')) => { self.cursor.advance(); TokenKind::LessEqual }
            ('<', _) => TokenKind::Less,

            ('>', Some('=')) => { self.cursor.advance(); TokenKind::GreaterEqual }
            ('>', _) => TokenKind::Greater,

            ('&', Some('&')) => { self.cursor.advance(); TokenKind::AmpAmp }
            ('|', Some('|')) => { self.cursor.advance(); TokenKind::PipePipe }

            // Unrecognized character
            _ => {
                let span = self.span_from(start_line, start_col, start_offset);
                return self.make_error(LexerError::unexpected_char(c, span));
            }
        };

        self.make_token(kind, start_line, start_col, start_offset)
    }
}

/// Implement Iterator for convenient token streaming.
impl<'src, 'ast> Iterator for Lexer<'src, 'ast> {
    type Item = Token<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::error::LexerErrorKind;

    /// Helper to collect all tokens.
    fn tokenize(source: &str, locale: Locale) -> Vec<(TokenKind, String)> {
        let arena = Bump::new();
        Lexer::new(source, locale, &arena)
            .map(|t| (t.kind, t.lexeme.to_string()))
            .collect()
    }

    /// Helper to get token kinds only.
    fn token_kinds(source: &str) -> Vec<TokenKind> {
        let arena = Bump::new();
        Lexer::new(source, Locale::ENGLISH, &arena).map(|t| t.kind).collect()
    }

    fn first_error(source: &str, locale: Locale) -> LexerError {
        let arena = Bump::new();
        let mut lexer = Lexer::new(source, locale, &arena);
        while lexer.next_token().kind != TokenKind::Eof {}
        lexer.take_errors().remove(0)
    }

    // =========================================
    // Basic tokens
    // =========================================

    #[test]
    fn empty_source() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("", Locale::ENGLISH, &arena);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert!(!lexer.has_errors());
    }

    #[test]
    fn whitespace_only() {
        assert!(token_kinds("  \t\n ").is_empty());
    }

    #[test]
    fn operators() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("+ - * / = != < <= > >= && || ! ( ) , ;"),
            vec![
                Plus, Minus, Star, Slash, Equal, BangEqual, Less, LessEqual, Greater,
                GreaterEqual, AmpAmp, PipePipe, Bang, LeftParen, RightParen, Comma, Semicolon,
            ]
        );
    }

    #[test]
    fn single_ampersand_is_an_error() {
        let error = first_error("a & b", Locale::ENGLISH);
        assert_eq!(error.kind, LexerErrorKind::UnexpectedChar('&'));
        assert_eq!(error.span, Span::new(1, 3, 1));
    }

    // =========================================
    // Numbers
    // =========================================

    #[test]
    fn numbers_english() {
        assert_eq!(
            tokenize("42 10.8 10.80EUR 5JPY", Locale::ENGLISH),
            vec![
                (TokenKind::IntegerLiteral, "42".into()),
                (TokenKind::DecimalLiteral, "10.8".into()),
                (TokenKind::MoneyLiteral, "10.80EUR".into()),
                (TokenKind::MoneyLiteral, "5JPY".into()),
            ]
        );
    }

    #[test]
    fn numbers_german() {
        assert_eq!(
            tokenize("1.234,5 10,80EUR 7", Locale::GERMAN),
            vec![
                (TokenKind::DecimalLiteral, "1.234,5".into()),
                (TokenKind::MoneyLiteral, "10,80EUR".into()),
                (TokenKind::IntegerLiteral, "7".into()),
            ]
        );
    }

    #[test]
    fn comma_between_arguments_in_english() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("MAX(1,2)"),
            vec![Identifier, LeftParen, IntegerLiteral, Comma, IntegerLiteral, RightParen]
        );
    }

    #[test]
    fn trailing_decimal_separator_is_not_part_of_number() {
        let error = first_error("10.", Locale::ENGLISH);
        assert_eq!(error.kind, LexerErrorKind::UnexpectedChar('.'));
    }

    #[test]
    fn currency_suffix_must_have_three_letters() {
        let error = first_error("10.80EU", Locale::ENGLISH);
        assert_eq!(error.kind, LexerErrorKind::InvalidCurrencySuffix("EU".into()));
        assert_eq!(error.span, Span::new(1, 6, 2));

        let error = first_error("3EURO", Locale::ENGLISH);
        assert_eq!(error.kind, LexerErrorKind::InvalidCurrencySuffix("EURO".into()));
    }

    // =========================================
    // Strings
    // =========================================

    #[test]
    fn string_literal_keeps_quotes() {
        assert_eq!(
            tokenize(r#""a \"b\" \\""#, Locale::ENGLISH),
            vec![(TokenKind::StringLiteral, r#""a \"b\" \\""#.into())]
        );
    }

    #[test]
    fn unterminated_string() {
        let error = first_error("\"abc", Locale::ENGLISH);
        assert_eq!(error.kind, LexerErrorKind::UnterminatedString);
        assert_eq!(error.span, Span::new(1, 1, 4));
    }

    #[test]
    fn invalid_escape() {
        let error = first_error(r#""a\nb""#, Locale::ENGLISH);
        assert_eq!(error.kind, LexerErrorKind::InvalidEscape('n'));
        assert_eq!(error.span, Span::new(1, 3, 2));
    }

    // =========================================
    // Identifiers and keywords
    // =========================================

    #[test]
    fn identifiers_with_paths() {
        assert_eq!(
            tokenize("policy.coverages[0].sum Gender.MALE", Locale::ENGLISH),
            vec![
                (TokenKind::Identifier, "policy.coverages[0].sum".into()),
                (TokenKind::Identifier, "Gender.MALE".into()),
            ]
        );
    }

    #[test]
    fn booleans_any_case() {
        assert_eq!(
            token_kinds("true FALSE True trueish"),
            vec![TokenKind::True, TokenKind::False, TokenKind::True, TokenKind::Identifier]
        );
    }

    #[test]
    fn spans_track_lines() {
        let arena = Bump::new();
        let tokens: Vec<_> = Lexer::new("a +\n  b", Locale::ENGLISH, &arena).collect();
        assert_eq!(tokens[0].span, Span::new(1, 1, 1));
        assert_eq!(tokens[1].span, Span::new(1, 3, 1));
        assert_eq!(tokens[2].span, Span::new(2, 3, 1));
    }
}
