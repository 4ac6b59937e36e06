//! Token types of the formula language.

use formula_core::Span;
use std::fmt;

/// A token from the expression text.
///
/// The `'ast` lifetime refers to the arena where the lexeme string is allocated.
/// The expression text may be freed after lexing, since all string content is
/// copied into the arena.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    /// The type of token.
    pub kind: TokenKind,
    /// The text of this token (allocated in arena).
    pub lexeme: &'ast str,
    /// Location in the expression text.
    pub span: Span,
}

impl<'ast> Token<'ast> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All token types of the formula language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// Integer literal: `42`, `1.234` (German grouping)
    IntegerLiteral,
    /// Decimal literal: `10.8`, `10,8` (German)
    DecimalLiteral,
    /// Money literal: `10.80EUR`, `5JPY`
    MoneyLiteral,
    /// String literal: `"hello"`
    StringLiteral,
    /// `true`, in any letter case
    True,
    /// `false`, in any letter case
    False,

    // =========================================
    // Identifiers
    // =========================================
    /// Identifier or function name: `policy.premium`, `ABS`
    Identifier,

    // =========================================
    // Operators
    // =========================================
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `=`
    Equal,
    /// `!=`
    BangEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `!`
    Bang,

    // =========================================
    // Delimiters
    // =========================================
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,

    // =========================================
    // Special
    // =========================================
    /// End of input
    Eof,
    /// Lexing error
    Error,
}

impl TokenKind {
    /// Check if this token is a literal.
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntegerLiteral | DecimalLiteral | MoneyLiteral | StringLiteral | True | False
        )
    }

    /// Check if this token is an operator.
    pub fn is_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Plus | Minus
                | Star
                | Slash
                | Equal
                | BangEqual
                | Less
                | LessEqual
                | Greater
                | GreaterEqual
                | AmpAmp
                | PipePipe
                | Bang
        )
    }

    /// Get the string representation of this token kind for error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            IntegerLiteral => "integer literal",
            DecimalLiteral => "decimal literal",
            MoneyLiteral => "money literal",
            StringLiteral => "string literal",
            True => "'true'",
            False => "'false'",
            Identifier => "identifier",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Equal => "'='",
            BangEqual => "'!='",
            Less => "'<'",
            LessEqual => "'<='",
            Greater => "'>'",
            GreaterEqual => "'>='",
            AmpAmp => "'&&'",
            PipePipe => "'||'",
            Bang => "'!'",
            LeftParen => "'('",
            RightParen => "')'",
            Comma => "','",
            Semicolon => "';'",
            Eof => "end of input",
            Error => "error",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Map a word to its keyword [`TokenKind`], or `None` if not a keyword.
///
/// Boolean literals are recognized in any letter case.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    if ident.eq_ignore_ascii_case("true") {
        Some(TokenKind::True)
    } else if ident.eq_ignore_ascii_case("false") {
        Some(TokenKind::False)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup() {
        assert_eq!(lookup_keyword("true"), Some(TokenKind::True));
        assert_eq!(lookup_keyword("FALSE"), Some(TokenKind::False));
        assert_eq!(lookup_keyword("True"), Some(TokenKind::True));
        assert_eq!(lookup_keyword("truth"), None);
    }

    #[test]
    fn token_categories() {
        assert!(TokenKind::MoneyLiteral.is_literal());
        assert!(TokenKind::False.is_literal());
        assert!(!TokenKind::Identifier.is_literal());
        assert!(TokenKind::AmpAmp.is_operator());
        assert!(!TokenKind::Comma.is_operator());
    }

    #[test]
    fn token_debug_format() {
        let token = Token::new(TokenKind::Identifier, "premium", Span::new(1, 5, 7));
        assert_eq!(format!("{:?}", token), "Identifier(\"premium\" @ 1:5)");
    }

    #[test]
    fn token_kind_description() {
        assert_eq!(TokenKind::BangEqual.to_string(), "'!='");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
