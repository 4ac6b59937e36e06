//! Identifier and function resolution.
//!
//! The compiler does not know what a name means. It asks an
//! [`IdentifierResolver`] for every identifier occurrence and the registered
//! [`FunctionResolver`]s, in order, for every call.

mod chain;
mod enums;
mod parameters;

pub use chain::ResolverChain;
pub use enums::EnumValueResolver;
pub use parameters::ParameterResolver;

use formula_core::{CompilationResult, Datatype, Locale, Message, MessageCode, NumericConfig, Span};

/// What a resolver may need to know about the expression being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveContext {
    /// Literal format of the expression text.
    pub locale: Locale,
    /// Numeric configuration compiled code runs with.
    pub numeric: NumericConfig,
    /// Location of the identifier or call being resolved.
    pub span: Span,
}

/// Resolves identifiers to compiled code.
///
/// Called once per identifier occurrence. An unknown name is answered with a
/// result carrying an `UNDEFINED_IDENTIFIER` error, see
/// [`undefined_identifier`].
pub trait IdentifierResolver: Send + Sync {
    fn resolve(&self, name: &str, context: &ResolveContext) -> CompilationResult;
}

/// Resolves function calls.
///
/// `args` are the compiled arguments, all of which succeeded. Returns `None`
/// when the function is unknown to this resolver, so the next one is asked.
pub trait FunctionResolver: Send + Sync {
    fn try_resolve(
        &self,
        name: &str,
        args: &[CompilationResult],
        context: &ResolveContext,
    ) -> Option<CompilationResult>;
}

/// The failed result for a name no resolver knows.
pub fn undefined_identifier(name: &str, context: &ResolveContext) -> CompilationResult {
    CompilationResult::failed(
        Message::error(
            MessageCode::UndefinedIdentifier,
            format!("undefined identifier '{name}'"),
        )
        .with_span(context.span),
    )
}

/// Datatypes of compiled arguments.
pub fn argument_types(args: &[CompilationResult]) -> Vec<Datatype> {
    args.iter().filter_map(|arg| arg.datatype().cloned()).collect()
}

#[cfg(test)]
pub(crate) fn test_context() -> ResolveContext {
    ResolveContext {
        locale: Locale::ENGLISH,
        numeric: NumericConfig::default(),
        span: Span::new(1, 1, 1),
    }
}
