//! Enumeration types declared by the embedding system.

use crate::datatype::Datatype;
use crate::value::EnumValue;

/// A named enumeration with a fixed, ordered set of members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    id: String,
    members: Vec<String>,
}

impl EnumType {
    /// Create an enumeration `id` with the given members.
    pub fn new<I, S>(id: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// The enum type id, also the datatype's display name.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// The datatype of this enumeration's values.
    pub fn datatype(&self) -> Datatype {
        Datatype::enumeration(self.id.clone())
    }

    /// Whether `member` is one of the declared members.
    pub fn contains(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }

    /// The value of `member`, if declared.
    pub fn value(&self, member: &str) -> Option<EnumValue> {
        self.contains(member).then(|| EnumValue::new(self.id.clone(), member))
    }

    /// Resolve a qualified reference `Type.MEMBER`.
    pub fn resolve_qualified(&self, name: &str) -> Option<EnumValue> {
        let member = name.strip_prefix(self.id.as_str())?.strip_prefix('.')?;
        self.value(member)
    }
}
