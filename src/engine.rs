//! One-stop facade: compile and evaluate with a single configured compiler.

use std::fmt;

use formula_compiler::{Compiler, CompilerBuilder};
use formula_core::{CompilationResult, CompilerSettings, Datatype, Value};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::eval::{Bindings, evaluate};

/// A configured [`Compiler`] together with the evaluator.
///
/// # Example
///
/// ```
/// use formula::{Bindings, Engine};
/// use formula_core::{Datatype, Value};
///
/// let engine = Engine::builder()
///     .parameter("age", Datatype::Integer)
///     .build()
///     .unwrap();
///
/// let mut bindings = Bindings::default();
/// bindings.insert("age".into(), Value::Integer(30));
/// let value = engine.evaluate("IF(age >= 18, \"adult\", \"minor\")", &bindings).unwrap();
/// assert_eq!(value, Value::String("adult".into()));
/// ```
pub struct Engine {
    compiler: Compiler,
}

impl Engine {
    /// Wrap an already built compiler.
    pub fn new(compiler: Compiler) -> Self {
        Self { compiler }
    }

    /// Start configuring an engine. Takes the same options as
    /// [`Compiler::builder`].
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Engine with standard operations and functions under `settings`.
    pub fn with_settings(settings: CompilerSettings) -> EngineResult<Self> {
        Self::builder().settings(settings).build()
    }

    /// Engine configured from TOML text, e.g.
    ///
    /// ```toml
    /// max_depth = 64
    ///
    /// [locale]
    /// decimal_separator = ","
    /// grouping_separator = "."
    ///
    /// [numeric]
    /// decimal_scale = 4
    /// rounding = "HALF_EVEN"
    /// ```
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        Self::with_settings(CompilerSettings::from_toml_str(text)?)
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn settings(&self) -> &CompilerSettings {
        self.compiler.settings()
    }

    /// Compile without evaluating; diagnostics stay in the result.
    pub fn compile(&self, text: &str) -> CompilationResult {
        self.compiler.compile(text)
    }

    /// Compile `text` and evaluate it against `bindings`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Compilation`] with the diagnostics if compilation
    /// reports errors, [`EngineError::Execution`] if evaluation fails.
    pub fn evaluate(&self, text: &str, bindings: &Bindings) -> EngineResult<Value> {
        let result = self.compiler.compile(text);
        Self::run(result, bindings)
    }

    /// Like [`evaluate`](Self::evaluate), with the result coerced to `expected`.
    pub fn evaluate_as(
        &self,
        text: &str,
        expected: &Datatype,
        bindings: &Bindings,
    ) -> EngineResult<Value> {
        let result = self.compiler.compile_expecting(text, expected);
        Self::run(result, bindings)
    }

    fn run(result: CompilationResult, bindings: &Bindings) -> EngineResult<Value> {
        if result.failed_to_compile() {
            let (_, _, messages) = result.into_parts();
            debug!(errors = messages.error_count(), "refusing to evaluate");
            return Err(EngineError::Compilation(messages));
        }
        Ok(evaluate(&result, bindings)?)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("settings", self.settings())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Engine`], wrapping a [`CompilerBuilder`].
#[derive(Default)]
pub struct EngineBuilder {
    compiler: CompilerBuilder,
}

impl EngineBuilder {
    pub fn settings(self, settings: CompilerSettings) -> Self {
        self.map(|builder| builder.settings(settings))
    }

    pub fn parameter(self, name: impl Into<String>, datatype: Datatype) -> Self {
        self.map(|builder| builder.parameter(name, datatype))
    }

    /// Apply any other [`CompilerBuilder`] option.
    pub fn map(self, f: impl FnOnce(CompilerBuilder) -> CompilerBuilder) -> Self {
        Self {
            compiler: f(self.compiler),
        }
    }

    pub fn build(self) -> EngineResult<Engine> {
        let compiler = self.compiler.build().map_err(EngineError::from)?;
        Ok(Engine::new(compiler))
    }
}
