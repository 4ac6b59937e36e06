//! The compiler facade and its builder.

use bumpalo::Bump;
use tracing::debug;

use formula_core::{
    CompilationResult, CompilerSettings, Datatype, EnumType, Message, MessageCode, Span,
};
use formula_parser::{ParseOptions, Parser};
use formula_registry::{BinaryOperation, OperationRegistry, UnaryOperation};

use crate::error::CompilerError;
use crate::expr::ExprCompiler;
use crate::functions::StandardFunctions;
use crate::resolve::{
    EnumValueResolver, FunctionResolver, IdentifierResolver, ParameterResolver, ResolverChain,
};

/// Compiles formula text into typed, executable fragments.
///
/// Built once through [`CompilerBuilder`]; afterwards it has no mutating API
/// and may be shared between threads.
pub struct Compiler {
    settings: CompilerSettings,
    registry: OperationRegistry,
    identifiers: ResolverChain,
    functions: Vec<Box<dyn FunctionResolver>>,
}

impl Compiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Compile `text`.
    ///
    /// Never fails: problems are reported as messages of the result, which
    /// then has no executable code.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&self, text: &str) -> CompilationResult {
        self.compile_root(text, None)
    }

    /// Compile `text` and convert the result to `expected`.
    ///
    /// The result is widened if its datatype implicitly converts to
    /// `expected`; otherwise an `INCOMPATIBLE_RESULT_TYPE` error is added.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_expecting(&self, text: &str, expected: &Datatype) -> CompilationResult {
        self.compile_root(text, Some(expected))
    }

    fn compile_root(&self, text: &str, expected: Option<&Datatype>) -> CompilationResult {
        debug!(expression = text, expected = ?expected, "compiling");

        let arena = Bump::new();
        let expr = Parser::parse(text, &ParseOptions::from(&self.settings), &arena);
        let driver = ExprCompiler::new(
            &self.settings,
            &self.registry,
            &self.identifiers,
            &self.functions,
        );

        let mut result = driver.compile(&expr);
        if let Some(expected) = expected {
            result = convert_result(result, expected, expr.span());
        }

        debug!(
            expression = text,
            datatype = ?result.datatype(),
            messages = result.messages().len(),
            succeeded = result.succeeded(),
            "compiled"
        );
        result
    }
}

impl Default for Compiler {
    /// Default settings, built-in operations and the standard functions.
    fn default() -> Self {
        Self {
            settings: CompilerSettings::default(),
            registry: OperationRegistry::with_builtins(),
            identifiers: ResolverChain::new(),
            functions: vec![Box::new(StandardFunctions)],
        }
    }
}

/// Widen a successful root result to `expected`.
fn convert_result(
    result: CompilationResult,
    expected: &Datatype,
    span: Span,
) -> CompilationResult {
    let Some(actual) = result.datatype().filter(|_| result.succeeded()).cloned() else {
        return result;
    };
    if actual.boxed() == expected.boxed() {
        return result;
    }

    let (fragment, _, messages) = result.into_parts();
    if actual.can_coerce_to(expected) && !actual.coercion_needs_currency(expected) {
        return CompilationResult::new(fragment.coerced(&actual, expected), expected.clone())
            .with_messages(messages);
    }

    CompilationResult::from_messages(messages).with_message(
        Message::error(
            MessageCode::IncompatibleResultType,
            format!("expected a result of type {expected}, found {actual}"),
        )
        .with_span(span),
    )
}

/// Collects settings, operations and resolvers for a [`Compiler`].
///
/// Identifiers are resolved by the declared parameters first, then by the
/// registered enum types, then by the added resolvers in order. Functions
/// are resolved by the standard functions first, then by the added
/// resolvers in order.
///
/// # Example
///
/// ```
/// use formula_compiler::Compiler;
/// use formula_core::{Datatype, EnumType};
///
/// let compiler = Compiler::builder()
///     .parameter("premium", Datatype::Money)
///     .enum_type(EnumType::new("Gender", ["MALE", "FEMALE"]))
///     .build()
///     .unwrap();
///
/// let result = compiler.compile("IF(gender = Gender.MALE, premium * 1.1, premium)");
/// assert!(result.failed_to_compile()); // `gender` is not declared
///
/// let result = compiler.compile("premium * 1.1");
/// assert_eq!(result.datatype(), Some(&Datatype::Money));
/// ```
pub struct CompilerBuilder {
    settings: CompilerSettings,
    parameters: ParameterResolver,
    enum_types: Vec<EnumType>,
    identifiers: ResolverChain,
    functions: Vec<Box<dyn FunctionResolver>>,
    binary_operations: Vec<BinaryOperation>,
    unary_operations: Vec<UnaryOperation>,
    standard_functions: bool,
}

impl CompilerBuilder {
    pub fn new() -> Self {
        Self {
            settings: CompilerSettings::default(),
            parameters: ParameterResolver::new(),
            enum_types: Vec::new(),
            identifiers: ResolverChain::new(),
            functions: Vec::new(),
            binary_operations: Vec::new(),
            unary_operations: Vec::new(),
            standard_functions: true,
        }
    }

    pub fn settings(mut self, settings: CompilerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Declare an identifier bound at evaluation time.
    pub fn parameter(mut self, name: impl Into<String>, datatype: Datatype) -> Self {
        self.parameters.declare(name, datatype);
        self
    }

    /// Register an enum type: `=`/`!=` on its values and `Type.MEMBER`
    /// references.
    pub fn enum_type(mut self, enum_type: EnumType) -> Self {
        self.enum_types.push(enum_type);
        self
    }

    pub fn identifier_resolver(mut self, resolver: impl IdentifierResolver + 'static) -> Self {
        self.identifiers.push(resolver);
        self
    }

    pub fn function_resolver(mut self, resolver: impl FunctionResolver + 'static) -> Self {
        self.functions.push(Box::new(resolver));
        self
    }

    pub fn binary_operation(mut self, operation: BinaryOperation) -> Self {
        self.binary_operations.push(operation);
        self
    }

    pub fn unary_operation(mut self, operation: UnaryOperation) -> Self {
        self.unary_operations.push(operation);
        self
    }

    /// Leave out [`StandardFunctions`].
    pub fn without_standard_functions(mut self) -> Self {
        self.standard_functions = false;
        self
    }

    /// Validate the settings and register everything collected.
    pub fn build(self) -> Result<Compiler, CompilerError> {
        self.settings.validate()?;

        let mut registry = OperationRegistry::with_builtins();
        for operation in self.binary_operations {
            registry.register_binary(operation)?;
        }
        for operation in self.unary_operations {
            registry.register_unary(operation)?;
        }
        for enum_type in &self.enum_types {
            registry.register_enum_type(enum_type.clone())?;
        }

        let mut identifiers = ResolverChain::new()
            .with(self.parameters)
            .with(EnumValueResolver::from_iter(self.enum_types));
        identifiers.extend(self.identifiers);

        let mut functions: Vec<Box<dyn FunctionResolver>> = Vec::new();
        if self.standard_functions {
            functions.push(Box::new(StandardFunctions));
        }
        functions.extend(self.functions);

        debug!(
            operations = registry.binary_operations().count(),
            identifier_resolvers = identifiers.len(),
            function_resolvers = functions.len(),
            "compiler built"
        );
        Ok(Compiler {
            settings: self.settings,
            registry,
            identifiers,
            functions,
        })
    }
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolveContext;
    use formula_core::{Fragment, Locale, NativeFunction, Value};
    use pretty_assertions::assert_eq;

    fn compiler() -> Compiler {
        Compiler::builder()
            .parameter("a", Datatype::Decimal)
            .parameter("b", Datatype::PrimitiveInteger)
            .parameter("premium", Datatype::Money)
            .enum_type(EnumType::new("Gender", ["MALE", "FEMALE"]))
            .build()
            .unwrap()
    }

    fn codes(result: &CompilationResult) -> Vec<MessageCode> {
        result.messages().codes()
    }

    #[test]
    fn compiler_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Compiler>();
    }

    #[test]
    fn literals_become_constants() {
        let result = compiler().compile("10.80EUR");
        assert_eq!(result.datatype(), Some(&Datatype::Money));
        assert_eq!(
            result.fragment().as_const().map(ToString::to_string),
            Some("10.80EUR".to_string())
        );
        assert_eq!(compiler().compile("7").datatype(), Some(&Datatype::Integer));
        assert_eq!(compiler().compile("TRUE").datatype(), Some(&Datatype::Boolean));
    }

    #[test]
    fn invalid_literal_is_localized() {
        let result = compiler().compile("1 + 10.805EUR");
        assert_eq!(codes(&result), vec![MessageCode::InvalidLiteral]);
        let span = result.messages().iter().next().and_then(|m| m.span());
        assert_eq!(span, Some(Span::new(1, 5, 9)));

        let result = compiler().compile("2.00XYZ");
        assert_eq!(codes(&result), vec![MessageCode::InvalidLiteral]);
    }

    #[test]
    fn minus_before_integer_literal_is_part_of_it() {
        let result = compiler().compile("-9223372036854775808");
        assert_eq!(result.fragment().as_const(), Some(&Value::Integer(i64::MIN)));
        assert_eq!(compiler().compile("- -5").fragment().as_const(), None);

        let result = compiler().compile("-9223372036854775809");
        assert_eq!(codes(&result), vec![MessageCode::InvalidLiteral]);
        let span = result.messages().iter().next().and_then(|m| m.span());
        assert_eq!(span, Some(Span::new(1, 1, 20)));
    }

    #[test]
    fn malformed_money_suffix_is_a_syntax_error() {
        let result = compiler().compile("10.80EU");
        assert_eq!(codes(&result), vec![MessageCode::SyntaxError]);
        assert!(result.fragment().is_invalid());
    }

    #[test]
    fn syntax_error_has_location() {
        let result = compiler().compile("(1 + 2");
        let message = result.messages().first_error().unwrap();
        assert_eq!(message.code(), MessageCode::SyntaxError);
        assert_eq!(message.span().map(|s| (s.line, s.col)), Some((1, 7)));
    }

    #[test]
    fn undefined_identifier_is_reported_once() {
        let result = compiler().compile("unknownVar * 2");
        assert_eq!(codes(&result), vec![MessageCode::UndefinedIdentifier]);
        let span = result.messages().first_error().and_then(|m| m.span());
        assert_eq!(span, Some(Span::new(1, 1, 10)));
    }

    #[test]
    fn sibling_errors_are_all_reported() {
        let result = compiler().compile("x + y");
        assert_eq!(
            codes(&result),
            vec![MessageCode::UndefinedIdentifier, MessageCode::UndefinedIdentifier]
        );
    }

    #[test]
    fn missing_operation() {
        let result = compiler().compile("\"a\" - 1");
        assert_eq!(codes(&result), vec![MessageCode::NoOperation]);
        let message = result.messages().first_error().unwrap();
        assert_eq!(message.text(), "the operator '-' is not defined for String and Integer");
        assert_eq!(message.span(), Some(Span::new(1, 1, 7)));

        let result = compiler().compile("-\"a\"");
        assert_eq!(codes(&result), vec![MessageCode::NoOperation]);
    }

    #[test]
    fn operand_types_select_operation() {
        let c = compiler();
        assert_eq!(c.compile("10 / 4").datatype(), Some(&Datatype::Decimal));
        assert_eq!(c.compile("b + 1").datatype(), Some(&Datatype::Integer));
        assert_eq!(c.compile("premium / 2").datatype(), Some(&Datatype::Money));
        assert_eq!(c.compile("premium / premium").datatype(), Some(&Datatype::Decimal));
        assert_eq!(c.compile("a < b && !false").datatype(), Some(&Datatype::Boolean));
        let result = c.compile("Gender.MALE != Gender.FEMALE");
        assert_eq!(result.datatype(), Some(&Datatype::Boolean));
        let result = c.compile("Gender.MALE < Gender.FEMALE");
        assert_eq!(codes(&result), vec![MessageCode::NoOperation]);
    }

    #[test]
    fn unknown_function() {
        let result = compiler().compile("SQRT(4)");
        assert_eq!(codes(&result), vec![MessageCode::UnknownFunction]);
        let span = result.messages().first_error().and_then(|m| m.span());
        assert_eq!(span, Some(Span::new(1, 1, 4)));

        // Failed arguments fail the call before any resolver is asked.
        let result = compiler().compile("SQRT(x)");
        assert_eq!(codes(&result), vec![MessageCode::UndefinedIdentifier]);
    }

    struct Sqrt;

    impl FunctionResolver for Sqrt {
        fn try_resolve(
            &self,
            name: &str,
            args: &[CompilationResult],
            _context: &ResolveContext,
        ) -> Option<CompilationResult> {
            if name != "SQRT" || args.len() != 1 {
                return None;
            }
            let node = formula_core::CallNode {
                function: NativeFunction::new("SQRT", |_, _| Ok(Value::Integer(2))),
                args: vec![args[0].fragment().clone()],
                numeric: Default::default(),
            };
            Some(CompilationResult::new(Fragment::Call(Box::new(node)), Datatype::Integer))
        }
    }

    #[test]
    fn custom_function_resolver() {
        let compiler = Compiler::builder().function_resolver(Sqrt).build().unwrap();
        let result = compiler.compile("SQRT(4) + 1");
        assert!(result.succeeded());
        assert_eq!(result.datatype(), Some(&Datatype::Integer));
    }

    #[test]
    fn standard_functions_can_be_left_out() {
        let compiler = Compiler::builder().without_standard_functions().build().unwrap();
        assert_eq!(codes(&compiler.compile("ABS(1)")), vec![MessageCode::UnknownFunction]);
    }

    #[test]
    fn expected_result_type() {
        let c = compiler();
        let result = c.compile_expecting("1 + 2", &Datatype::Decimal);
        assert_eq!(result.datatype(), Some(&Datatype::Decimal));
        assert!(matches!(result.fragment(), Fragment::Coerce { .. }));

        let result = c.compile_expecting("b", &Datatype::Integer);
        assert!(matches!(result.fragment(), Fragment::Identifier { .. }));

        let result = c.compile_expecting("true", &Datatype::Integer);
        assert_eq!(codes(&result), vec![MessageCode::IncompatibleResultType]);
        assert_eq!(
            result.messages().first_error().map(|m| m.text()),
            Some("expected a result of type Integer, found Boolean")
        );

        // A bare number has no currency to become Money with.
        let result = c.compile_expecting("1", &Datatype::Money);
        assert_eq!(codes(&result), vec![MessageCode::IncompatibleResultType]);

        // Earlier errors are not followed by a type error.
        let result = c.compile_expecting("x", &Datatype::Money);
        assert_eq!(codes(&result), vec![MessageCode::UndefinedIdentifier]);
    }

    #[test]
    fn german_locale() {
        let settings = CompilerSettings {
            locale: Locale::GERMAN,
            ..CompilerSettings::default()
        };
        let compiler = Compiler::builder().settings(settings).build().unwrap();
        let result = compiler.compile("ROUND(1.234,567; 2)");
        assert!(result.succeeded(), "{}", result.messages());
        assert_eq!(result.datatype(), Some(&Datatype::Decimal));

        let result = compiler.compile("ROUND(1,5, 2)");
        assert_eq!(codes(&result), vec![MessageCode::SyntaxError]);
    }

    #[test]
    fn referenced_identifiers() {
        let result = compiler().compile("a + b * a");
        assert_eq!(
            result.identifiers(),
            vec![("a", &Datatype::Decimal), ("b", &Datatype::PrimitiveInteger)]
        );
    }

    #[test]
    fn build_errors() {
        let result = Compiler::builder()
            .enum_type(EnumType::new("Gender", ["MALE"]))
            .enum_type(EnumType::new("Gender", ["FEMALE"]))
            .build();
        assert!(matches!(result, Err(CompilerError::Registration(_))));

        let settings = CompilerSettings {
            max_depth: 0,
            ..CompilerSettings::default()
        };
        let result = Compiler::builder().settings(settings).build();
        assert!(matches!(result, Err(CompilerError::Settings(_))));
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let text = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        let result = compiler().compile(&text);
        assert_eq!(codes(&result), vec![MessageCode::SyntaxError]);
    }

    #[test]
    fn long_operator_chains_compile() {
        let text = vec!["1"; 1_000].join(" + ");
        let result = compiler().compile(&text);
        assert!(result.succeeded(), "{}", result.messages());
        assert_eq!(result.datatype(), Some(&Datatype::Integer));

        let text = format!("{} + \"a\"", vec!["1"; 300].join(" + "));
        let result = compiler().compile(&text);
        assert_eq!(codes(&result), vec![MessageCode::NoOperation]);
    }
}
