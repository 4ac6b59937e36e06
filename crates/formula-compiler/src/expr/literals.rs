//! Literal expression compilation.
//!
//! The parser keeps literals as text; here they become typed constants.

use formula_core::{CompilationResult, Datatype, Message, MessageCode, Span};
use formula_parser::ast::LiteralExpr;

use super::ExprCompiler;

/// Compile a literal into a constant of its datatype.
pub(super) fn compile_literal(
    compiler: &ExprCompiler<'_>,
    lit: &LiteralExpr<'_>,
) -> CompilationResult {
    parse(compiler, &lit.kind.datatype(), lit.text, lit.span)
}

/// Compile `-lit` as one negative Integer constant spanning the sign.
pub(super) fn compile_negative_integer(
    compiler: &ExprCompiler<'_>,
    lit: &LiteralExpr<'_>,
    span: Span,
) -> CompilationResult {
    let text = format!("-{}", lit.text);
    parse(compiler, &Datatype::Integer, &text, span)
}

fn parse(
    compiler: &ExprCompiler<'_>,
    datatype: &Datatype,
    text: &str,
    span: Span,
) -> CompilationResult {
    match datatype.parse_literal(text, &compiler.settings.locale) {
        Ok(value) => CompilationResult::constant(value),
        Err(error) => CompilationResult::failed(
            Message::error(MessageCode::InvalidLiteral, format!("invalid literal {text}: {error}"))
                .with_span(span),
        ),
    }
}
