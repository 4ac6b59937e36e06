//! Identifier expression compilation.

use tracing::trace;

use formula_core::CompilationResult;
use formula_parser::ast::IdentExpr;

use super::ExprCompiler;

/// Ask the identifier resolver what `ident` means.
pub(super) fn compile_ident(
    compiler: &ExprCompiler<'_>,
    ident: &IdentExpr<'_>,
) -> CompilationResult {
    let context = compiler.context(ident.span);
    let result = compiler
        .identifiers
        .resolve(ident.name, &context)
        .with_span_if_missing(ident.span);
    trace!(
        name = ident.name,
        datatype = ?result.datatype(),
        succeeded = result.succeeded(),
        "resolved identifier"
    );
    result
}
