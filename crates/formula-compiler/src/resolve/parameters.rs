use rustc_hash::FxHashMap;
use tracing::trace;

use formula_core::{CompilationResult, Datatype, Fragment};

use super::{IdentifierResolver, ResolveContext, undefined_identifier};

/// Resolves declared parameters to identifier placeholders.
///
/// The evaluator fills each placeholder from its bindings.
#[derive(Debug, Clone, Default)]
pub struct ParameterResolver {
    parameters: FxHashMap<String, Datatype>,
}

impl ParameterResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with `datatype`, replacing an earlier declaration.
    pub fn declare(&mut self, name: impl Into<String>, datatype: Datatype) {
        self.parameters.insert(name.into(), datatype);
    }

    /// Builder form of [`declare`](Self::declare).
    pub fn with_parameter(mut self, name: impl Into<String>, datatype: Datatype) -> Self {
        self.declare(name, datatype);
        self
    }

    /// The declared datatype of `name`.
    pub fn datatype(&self, name: &str) -> Option<&Datatype> {
        self.parameters.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl IdentifierResolver for ParameterResolver {
    fn resolve(&self, name: &str, context: &ResolveContext) -> CompilationResult {
        match self.parameters.get(name) {
            Some(datatype) => {
                trace!(name, %datatype, "parameter");
                let fragment = Fragment::Identifier {
                    name: name.to_string(),
                    datatype: datatype.clone(),
                };
                CompilationResult::new(fragment, datatype.clone())
            }
            None => undefined_identifier(name, context),
        }
    }
}
