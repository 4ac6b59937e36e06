//! Binary operator compilation.
//!
//! Both operands are compiled first. The operator is then bound through the
//! operation registry, which may widen either operand.
//!
//! Operator chains like `a + b + c + ...` are left-nested to any length, so
//! the left spine is walked with a loop instead of recursion.

use formula_core::CompilationResult;
use formula_parser::Expr;
use formula_parser::ast::BinaryExpr;

use super::{ExprCompiler, collect_messages};

/// Compile a binary expression.
pub(super) fn compile_binary<'a>(
    compiler: &ExprCompiler<'_>,
    expr: &BinaryExpr<'a>,
) -> CompilationResult {
    let mut spine = vec![expr];
    let mut leftmost = expr.left;
    while let Expr::Binary(inner) = leftmost {
        spine.push(*inner);
        leftmost = inner.left;
    }

    let mut left = compiler.compile(leftmost);
    for node in spine.into_iter().rev() {
        let right = compiler.compile(node.right);
        left = bind(compiler, node, left, right);
    }
    left
}

/// Bind the operator of `expr` to its compiled operands.
fn bind(
    compiler: &ExprCompiler<'_>,
    expr: &BinaryExpr<'_>,
    left: CompilationResult,
    right: CompilationResult,
) -> CompilationResult {
    let (Some(left_type), Some(right_type)) = (left.datatype(), right.datatype()) else {
        return CompilationResult::from_messages(collect_messages([&left, &right]));
    };
    if left.failed_to_compile() || right.failed_to_compile() {
        return CompilationResult::from_messages(collect_messages([&left, &right]));
    }

    match compiler.registry.resolve_binary(expr.op, left_type, right_type) {
        Ok(found) => found.operation.compile(left, right, &compiler.settings.numeric),
        Err(message) => CompilationResult::from_messages(collect_messages([&left, &right]))
            .with_message(message.with_span(expr.span)),
    }
}
