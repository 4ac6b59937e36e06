use formula_core::{CompilationResult, MessageCode};

use super::{IdentifierResolver, ResolveContext, undefined_identifier};

/// Asks several resolvers in order.
///
/// The first answer that is not `UNDEFINED_IDENTIFIER` wins. When every
/// resolver reports the name undefined, the first of those answers is used.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn IdentifierResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver; it is asked after all earlier ones.
    pub fn push(&mut self, resolver: impl IdentifierResolver + 'static) {
        self.resolvers.push(Box::new(resolver));
    }

    pub fn with(mut self, resolver: impl IdentifierResolver + 'static) -> Self {
        self.push(resolver);
        self
    }

    /// Append all resolvers of `other`, keeping their order.
    pub fn extend(&mut self, other: ResolverChain) {
        self.resolvers.extend(other.resolvers);
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl IdentifierResolver for ResolverChain {
    fn resolve(&self, name: &str, context: &ResolveContext) -> CompilationResult {
        let mut first_undefined = None;
        for resolver in &self.resolvers {
            let result = resolver.resolve(name, context);
            if !result.messages().contains_code(MessageCode::UndefinedIdentifier) {
                return result;
            }
            first_undefined.get_or_insert(result);
        }
        first_undefined.unwrap_or_else(|| undefined_identifier(name, context))
    }
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverChain")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{EnumValueResolver, ParameterResolver, test_context};
    use formula_core::{Datatype, EnumType, Value};

    #[test]
    fn first_defined_answer_wins() {
        let chain = ResolverChain::new()
            .with(ParameterResolver::new().with_parameter("age", Datatype::PrimitiveInteger))
            .with(EnumValueResolver::from_iter([EnumType::new("Gender", ["MALE"])]));

        let result = chain.resolve("age", &test_context());
        assert_eq!(result.datatype(), Some(&Datatype::PrimitiveInteger));

        let result = chain.resolve("Gender.MALE", &test_context());
        assert!(matches!(result.fragment().as_const(), Some(Value::Enum(_))));
    }

    #[test]
    fn undefined_everywhere() {
        let chain = ResolverChain::new().with(ParameterResolver::new());
        let result = chain.resolve("x", &test_context());
        assert!(result.messages().contains_code(MessageCode::UndefinedIdentifier));
        assert_eq!(result.messages().len(), 1);

        let empty = ResolverChain::new();
        assert!(empty.resolve("x", &test_context()).failed_to_compile());
    }
}
