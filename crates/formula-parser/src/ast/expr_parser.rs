//! Expression parsing using Pratt parsing (precedence climbing).
//!
//! This module implements expression parsing with proper operator precedence
//! and associativity using the Pratt parsing algorithm.

use super::parser::Parser;
use crate::ast::error::{ParseError, ParseErrorKind};
use crate::ast::expr::*;
use crate::ast::ops::{
    PREFIX_BINDING_POWER, binary_op_from_token, binding_power, unary_op_from_token,
};
use crate::lexer::{Token, TokenKind};

impl<'ast> Parser<'ast> {
    /// Parse an expression with a minimum binding power.
    ///
    /// This is the core of the Pratt parser. It handles operator precedence
    /// by only consuming operators with sufficient binding power.
    ///
    /// Only sub-expressions count as nesting: parenthesized groups, prefix
    /// operands, call arguments and right operands. Operators folded into the
    /// left-hand side form a flat chain of any length.
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<&'ast Expr<'ast>, ParseError> {
        let entry_depth = self.depth;
        let result = self.parse_expr_inner(min_bp);
        self.depth = entry_depth;
        result
    }

    fn parse_expr_inner(&mut self, min_bp: u8) -> Result<&'ast Expr<'ast>, ParseError> {
        self.descend(self.peek().span)?;

        // Parse the prefix expression (literals, identifiers, unary ops, etc.)
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some(bin_op) = binary_op_from_token(self.peek().kind) else {
                break;
            };

            let (l_bp, r_bp) = binding_power(bin_op);
            if l_bp < min_bp {
                break;
            }

            let op_token = self.advance();
            let rhs = self.parse_expr(r_bp)?;
            let span = lhs.span().merge(rhs.span());
            lhs = self.arena.alloc(Expr::Binary(self.arena.alloc(BinaryExpr {
                left: lhs,
                op: bin_op,
                op_span: op_token.span,
                right: rhs,
                span,
            })));
        }

        Ok(lhs)
    }

    /// Parse a prefix expression (the start of an expression).
    fn parse_prefix(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let token = *self.peek();

        match token.kind {
            // Literals
            TokenKind::IntegerLiteral => Ok(self.literal(LiteralKind::Integer)),
            TokenKind::DecimalLiteral => Ok(self.literal(LiteralKind::Decimal)),
            TokenKind::MoneyLiteral => Ok(self.literal(LiteralKind::Money)),
            TokenKind::StringLiteral => Ok(self.literal(LiteralKind::String)),
            TokenKind::True | TokenKind::False => Ok(self.literal(LiteralKind::Boolean)),

            // Parenthesized expression
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expr(0)?;
                self.expect(TokenKind::RightParen)?;
                Ok(expr)
            }

            // Identifier or function call
            TokenKind::Identifier => {
                self.advance();
                if self.check(TokenKind::LeftParen) {
                    self.parse_call(token)
                } else {
                    Ok(self.arena.alloc(Expr::Ident(IdentExpr {
                        name: token.lexeme,
                        span: token.span,
                    })))
                }
            }

            // Unary prefix operators
            kind => {
                let Some(op) = unary_op_from_token(kind) else {
                    return Err(self.expected_expression(&token));
                };
                self.advance();
                let operand = self.parse_expr(PREFIX_BINDING_POWER)?;
                let span = token.span.merge(operand.span());
                Ok(self.arena.alloc(Expr::Unary(self.arena.alloc(UnaryExpr {
                    op,
                    operand,
                    span,
                }))))
            }
        }
    }

    /// Consume the current token as a literal of the given kind.
    fn literal(&mut self, kind: LiteralKind) -> &'ast Expr<'ast> {
        let token = self.advance();
        self.arena.alloc(Expr::Literal(LiteralExpr {
            kind,
            text: token.lexeme,
            span: token.span,
        }))
    }

    /// Parse the argument list of a call to `name`.
    fn parse_call(&mut self, name: Token<'ast>) -> Result<&'ast Expr<'ast>, ParseError> {
        self.expect(TokenKind::LeftParen)?;

        let mut args = bumpalo::collections::Vec::new_in(self.arena);

        if !self.check(TokenKind::RightParen) {
            args.push(self.parse_expr(0)?);

            while self.eat(self.argument_separator).is_some() {
                args.push(self.parse_expr(0)?);
            }
        }

        if !self.check(TokenKind::RightParen) {
            let token = *self.peek();
            if matches!(token.kind, TokenKind::Comma | TokenKind::Semicolon) {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedToken,
                    token.span,
                    format!(
                        "arguments are separated by {} in this locale, found {}",
                        self.argument_separator, token.kind
                    ),
                ));
            }
        }
        let close = self.expect(TokenKind::RightParen)?;

        Ok(self.arena.alloc(Expr::Call(self.arena.alloc(CallExpr {
            name: name.lexeme,
            name_span: name.span,
            args: args.into_bump_slice(),
            span: name.span.merge(close.span),
        }))))
    }

    fn expected_expression(&self, token: &Token<'ast>) -> ParseError {
        if token.kind == TokenKind::Error {
            return self.unexpected(token);
        }
        ParseError::new(
            ParseErrorKind::ExpectedExpression,
            token.span,
            format!("expected expression, found {}", token.kind),
        )
    }
}
