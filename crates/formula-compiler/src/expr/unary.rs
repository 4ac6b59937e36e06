//! Unary operator compilation.

use formula_core::{CompilationResult, UnaryOp};
use formula_parser::ast::UnaryExpr;
use formula_parser::{Expr, LiteralKind};

use super::{ExprCompiler, literals};

/// Compile a prefix operation.
///
/// A minus written directly before an integer literal belongs to the
/// literal, so the most negative Integer can be spelled out.
pub(super) fn compile_unary(
    compiler: &ExprCompiler<'_>,
    expr: &UnaryExpr<'_>,
) -> CompilationResult {
    if expr.op == UnaryOp::Neg
        && let Expr::Literal(lit) = expr.operand
        && lit.kind == LiteralKind::Integer
    {
        return literals::compile_negative_integer(compiler, lit, expr.span);
    }

    let operand = compiler.compile(expr.operand);
    let Some(datatype) = operand.datatype().filter(|_| operand.succeeded()) else {
        return operand;
    };

    match compiler.registry.resolve_unary(expr.op, datatype) {
        Ok(found) => found.operation.compile(operand, &compiler.settings.numeric),
        Err(message) => CompilationResult::from_messages(operand.messages().clone())
            .with_message(message.with_span(expr.span)),
    }
}
