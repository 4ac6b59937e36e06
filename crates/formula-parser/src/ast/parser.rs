//! Parser state, token navigation and entry points.

use bumpalo::Bump;
use formula_core::{CompilerSettings, Locale, Span};

use crate::ast::error::{ParseError, ParseErrorKind};
use crate::ast::expr::Expr;
use crate::lexer::{Lexer, LexerError, Token, TokenKind};

/// Locale and limits the parser works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Number format of literals; also decides the argument separator.
    pub locale: Locale,
    /// Maximum nesting of sub-expressions.
    pub max_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            locale: Locale::ENGLISH,
            max_depth: CompilerSettings::DEFAULT_MAX_DEPTH,
        }
    }
}

impl From<&CompilerSettings> for ParseOptions {
    fn from(settings: &CompilerSettings) -> Self {
        Self {
            locale: settings.locale,
            max_depth: settings.max_depth,
        }
    }
}

/// Expression parser.
///
/// The whole text is lexed up front; the parser then walks the token buffer.
/// All AST nodes are allocated in the arena.
pub struct Parser<'ast> {
    /// Arena for AST nodes.
    pub(crate) arena: &'ast Bump,
    /// All tokens, ending with `Eof`.
    pub(crate) buffer: Vec<Token<'ast>>,
    /// Index of the current token.
    pub(crate) position: usize,
    /// Errors behind the `Error` tokens in the buffer.
    lexer_errors: Vec<LexerError>,
    /// `,` or `;` depending on the locale.
    pub(crate) argument_separator: TokenKind,
    /// Current nesting depth.
    pub(crate) depth: u32,
    /// Maximum nesting depth.
    pub(crate) max_depth: u32,
}

impl<'ast> Parser<'ast> {
    /// Create a parser over `source`.
    pub fn new(source: &str, options: &ParseOptions, arena: &'ast Bump) -> Self {
        let mut lexer = Lexer::new(source, options.locale, arena);
        let mut buffer = Vec::new();
        loop {
            let token = lexer.next_token();
            buffer.push(token);
            if token.kind == TokenKind::Eof {
                break;
            }
        }

        let argument_separator = if options.locale.argument_separator() == ';' {
            TokenKind::Semicolon
        } else {
            TokenKind::Comma
        };

        Self {
            arena,
            buffer,
            position: 0,
            lexer_errors: lexer.take_errors(),
            argument_separator,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    /// Parse a complete expression.
    ///
    /// Never fails: malformed text yields [`Expr::Invalid`] carrying the first
    /// error.
    ///
    /// # Example
    ///
    /// ```
    /// use bumpalo::Bump;
    /// use formula_parser::{ParseOptions, Parser};
    ///
    /// let arena = Bump::new();
    /// let expr = Parser::parse("1 + 2 * premium", &ParseOptions::default(), &arena);
    /// assert_eq!(expr.to_string(), "(1 + (2 * premium))");
    ///
    /// let expr = Parser::parse("1 +", &ParseOptions::default(), &arena);
    /// assert!(expr.parse_error().is_some());
    /// ```
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(source: &str, options: &ParseOptions, arena: &'ast Bump) -> Expr<'ast> {
        match Self::try_parse(source, options, arena) {
            Ok(expr) => expr.clone(),
            Err(error) => Expr::Invalid(error),
        }
    }

    /// Parse a complete expression, returning the first error.
    pub fn try_parse(
        source: &str,
        options: &ParseOptions,
        arena: &'ast Bump,
    ) -> Result<&'ast Expr<'ast>, ParseError> {
        let mut parser = Parser::new(source, options, arena);
        let expr = parser.parse_expr(0)?;
        parser.expect_eof()?;
        Ok(expr)
    }

    // =========================================
    // Token navigation
    // =========================================

    /// The current token.
    pub(crate) fn peek(&self) -> &Token<'ast> {
        self.peek_nth(0)
    }

    /// The token `n` positions ahead; `Eof` past the end.
    pub(crate) fn peek_nth(&self, n: usize) -> &Token<'ast> {
        let last = self.buffer.len() - 1;
        &self.buffer[(self.position + n).min(last)]
    }

    /// Check the kind of the current token.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume and return the current token. `Eof` is never consumed.
    pub(crate) fn advance(&mut self) -> Token<'ast> {
        let token = *self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of the given kind or fail.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let token = *self.peek();
        if let Some(error) = self.lexer_error(&token) {
            return Err(error);
        }
        Err(ParseError::new(
            ParseErrorKind::ExpectedToken,
            token.span,
            format!("expected {}, found {}", kind, token.kind),
        ))
    }

    /// Fail unless all input was consumed.
    pub(crate) fn expect_eof(&mut self) -> Result<(), ParseError> {
        let token = *self.peek();
        if token.kind == TokenKind::Eof {
            return Ok(());
        }
        Err(self.unexpected(&token))
    }

    /// Error for a token that cannot appear here.
    pub(crate) fn unexpected(&self, token: &Token<'ast>) -> ParseError {
        self.lexer_error(token).unwrap_or_else(|| {
            ParseError::new(
                ParseErrorKind::UnexpectedToken,
                token.span,
                format!("unexpected {}", token.kind),
            )
        })
    }

    /// The lexer's error for an `Error` token.
    fn lexer_error(&self, token: &Token<'ast>) -> Option<ParseError> {
        if token.kind != TokenKind::Error {
            return None;
        }
        let error = self.lexer_errors.iter().find(|e| e.span == token.span)?;
        Some(ParseError::new(
            ParseErrorKind::InvalidToken,
            error.span,
            error.kind.to_string(),
        ))
    }

    /// Enter one nesting level.
    pub(crate) fn descend(&mut self, span: Span) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep,
                span,
                format!("expression nests deeper than {} levels", self.max_depth),
            ));
        }
        Ok(())
    }
}
