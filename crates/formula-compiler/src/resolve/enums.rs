use rustc_hash::FxHashMap;
use tracing::trace;

use formula_core::{CompilationResult, EnumType, Message, MessageCode, Value};

use super::{IdentifierResolver, ResolveContext, undefined_identifier};

/// Resolves `Type.MEMBER` references to enum constants.
#[derive(Debug, Clone, Default)]
pub struct EnumValueResolver {
    types: FxHashMap<String, EnumType>,
}

impl EnumValueResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the members of `enum_type` resolvable.
    pub fn add(&mut self, enum_type: EnumType) {
        self.types.insert(enum_type.id().to_string(), enum_type);
    }
}

impl FromIterator<EnumType> for EnumValueResolver {
    fn from_iter<I: IntoIterator<Item = EnumType>>(iter: I) -> Self {
        let mut resolver = Self::new();
        for enum_type in iter {
            resolver.add(enum_type);
        }
        resolver
    }
}

impl IdentifierResolver for EnumValueResolver {
    fn resolve(&self, name: &str, context: &ResolveContext) -> CompilationResult {
        let Some((type_id, member)) = name.rsplit_once('.') else {
            return undefined_identifier(name, context);
        };
        let Some(enum_type) = self.types.get(type_id) else {
            return undefined_identifier(name, context);
        };

        match enum_type.value(member) {
            Some(value) => {
                trace!(name, "enum value");
                CompilationResult::constant(Value::Enum(value))
            }
            None => CompilationResult::failed(
                Message::error(
                    MessageCode::UndefinedIdentifier,
                    format!("'{member}' is not a member of enum type {type_id}"),
                )
                .with_span(context.span),
            ),
        }
    }
}
