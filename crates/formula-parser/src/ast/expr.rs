//! Expression AST nodes.
//!
//! # Expression Precedence
//!
//! The parser uses Pratt parsing with the following precedence levels,
//! lowest first; all binary operators are left-associative:
//! 1. Logical OR (`||`)
//! 2. Logical AND (`&&`)
//! 3. Equality (`=`, `!=`)
//! 4. Relational (`<`, `<=`, `>`, `>=`)
//! 5. Additive (`+`, `-`)
//! 6. Multiplicative (`*`, `/`)
//! 7. Prefix unary (`-`, `+`, `!`)
//! 8. Parentheses and function calls

use std::fmt;

use formula_core::{BinaryOp, Datatype, Span, UnaryOp};

use crate::ast::error::ParseError;

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr<'ast>),
    /// Identifier reference
    Ident(IdentExpr<'ast>),
    /// Unary prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Function call
    Call(&'ast CallExpr<'ast>),
    /// Text that could not be parsed
    Invalid(ParseError),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Call(e) => e.span,
            Self::Invalid(e) => e.span,
        }
    }

    /// The parse error, if this expression could not be parsed.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Invalid(error) => Some(error),
            _ => None,
        }
    }
}

/// A literal, kept as its source text.
///
/// Converting the text into a value needs the locale and the currency table,
/// so it happens during compilation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    /// The literal kind
    pub kind: LiteralKind,
    /// The literal text, including quotes for strings
    pub text: &'ast str,
    /// Source location
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    Decimal,
    Money,
    Boolean,
    String,
}

impl LiteralKind {
    /// The datatype a literal of this kind has.
    pub fn datatype(self) -> Datatype {
        match self {
            LiteralKind::Integer => Datatype::Integer,
            LiteralKind::Decimal => Datatype::Decimal,
            LiteralKind::Money => Datatype::Money,
            LiteralKind::Boolean => Datatype::Boolean,
            LiteralKind::String => Datatype::String,
        }
    }
}

/// An identifier expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    /// The full identifier text, e.g. `policy.premium`
    pub name: &'ast str,
    /// Source location
    pub span: Span,
}

/// A unary prefix operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    /// Operator
    pub op: UnaryOp,
    /// Operand
    pub operand: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// Left operand
    pub left: &'ast Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Operator location
    pub op_span: Span,
    /// Right operand
    pub right: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A function call `NAME(arg, ...)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// The function name as written
    pub name: &'ast str,
    /// Location of the name
    pub name_span: Span,
    /// Arguments
    pub args: &'ast [&'ast Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// Fully parenthesized rendering, e.g. `(1 + (2 * 3))`.
impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => f.write_str(lit.text),
            Expr::Ident(ident) => f.write_str(ident.name),
            Expr::Unary(un) => write!(f, "({}{})", un.op, un.operand),
            Expr::Binary(bin) => write!(f, "({} {} {})", bin.left, bin.op, bin.right),
            Expr::Call(call) => {
                write!(f, "{}(", call.name)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Expr::Invalid(_) => f.write_str("<invalid>"),
        }
    }
}
