//! Function call compilation.

use tracing::trace;

use formula_core::{CompilationResult, Message, MessageCode};
use formula_parser::ast::CallExpr;

use super::{ExprCompiler, collect_messages};

/// Compile a call.
///
/// All arguments are compiled left to right. If any failed, the call fails
/// with their messages and no resolver is asked. Otherwise the function
/// resolvers are tried in registration order and the first answer wins.
pub(super) fn compile_call(compiler: &ExprCompiler<'_>, call: &CallExpr<'_>) -> CompilationResult {
    let args: Vec<CompilationResult> = call.args.iter().map(|arg| compiler.compile(arg)).collect();
    let messages = collect_messages(&args);
    if messages.contains_error_msg() {
        return CompilationResult::from_messages(messages);
    }

    let context = compiler.context(call.span);
    for resolver in compiler.functions {
        if let Some(result) = resolver.try_resolve(call.name, &args, &context) {
            return result
                .with_span_if_missing(call.span)
                .with_leading_messages(messages);
        }
    }

    trace!(function = call.name, arity = args.len(), "unknown function");
    CompilationResult::from_messages(messages).with_message(
        Message::error(
            MessageCode::UnknownFunction,
            format!("unknown function '{}'", call.name),
        )
        .with_span(call.name_span),
    )
}
