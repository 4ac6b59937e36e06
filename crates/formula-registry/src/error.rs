use thiserror::Error;

/// Errors raised while populating an [`OperationRegistry`](crate::OperationRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// An operation with the same operator and operand datatypes exists.
    #[error("operation '{0}' is already registered")]
    DuplicateOperation(String),

    /// An enum type with the same id exists.
    #[error("enum type '{0}' is already registered")]
    DuplicateEnumType(String),

    /// The id clashes with a built-in datatype name.
    #[error("'{0}' is the name of a built-in datatype")]
    ReservedName(String),
}
