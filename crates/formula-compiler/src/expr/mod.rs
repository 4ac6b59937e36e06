//! Expression compiler.
//!
//! The [`ExprCompiler`] walks the AST bottom-up. Every node yields a new
//! [`CompilationResult`]; nothing is compiled in place. Children are always
//! compiled, so independent errors in siblings are all reported. A node whose
//! children failed fails with their messages and is not resolved itself.

mod binary;
mod calls;
mod identifiers;
mod literals;
mod unary;

use formula_core::{CompilationResult, CompilerSettings, Message, MessageCode, MessageList, Span};
use formula_parser::{Expr, ParseError};
use formula_registry::OperationRegistry;

use crate::resolve::{FunctionResolver, IdentifierResolver, ResolveContext};

/// Compiles one expression tree against a registry and resolvers.
pub(crate) struct ExprCompiler<'c> {
    settings: &'c CompilerSettings,
    registry: &'c OperationRegistry,
    identifiers: &'c dyn IdentifierResolver,
    functions: &'c [Box<dyn FunctionResolver>],
}

impl<'c> ExprCompiler<'c> {
    pub(crate) fn new(
        settings: &'c CompilerSettings,
        registry: &'c OperationRegistry,
        identifiers: &'c dyn IdentifierResolver,
        functions: &'c [Box<dyn FunctionResolver>],
    ) -> Self {
        Self {
            settings,
            registry,
            identifiers,
            functions,
        }
    }

    /// Compile `expr` and everything below it.
    pub(crate) fn compile(&self, expr: &Expr<'_>) -> CompilationResult {
        match expr {
            Expr::Literal(lit) => literals::compile_literal(self, lit),
            Expr::Ident(ident) => identifiers::compile_ident(self, ident),
            Expr::Unary(un) => unary::compile_unary(self, un),
            Expr::Binary(bin) => binary::compile_binary(self, bin),
            Expr::Call(call) => calls::compile_call(self, call),
            Expr::Invalid(error) => syntax_error(error),
        }
    }

    /// Resolver context for the node at `span`.
    fn context(&self, span: Span) -> ResolveContext {
        ResolveContext {
            locale: self.settings.locale,
            numeric: self.settings.numeric,
            span,
        }
    }
}

/// The failed result of unparseable text.
pub(crate) fn syntax_error(error: &ParseError) -> CompilationResult {
    CompilationResult::failed(
        Message::error(
            MessageCode::SyntaxError,
            format!("{}: {}", error.kind, error.message),
        )
        .with_span(error.span),
    )
}

/// Messages of all `results`, in order.
fn collect_messages<'r>(results: impl IntoIterator<Item = &'r CompilationResult>) -> MessageList {
    results
        .into_iter()
        .flat_map(|result| result.messages().iter().cloned())
        .collect()
}
