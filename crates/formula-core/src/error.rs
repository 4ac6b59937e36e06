//! Error types of the formula language.
//!
//! Compile-time problems are never Rust errors: they are [`Message`]s inside a
//! [`CompilationResult`]. The enums here cover the remaining failure modes:
//!
//! ```text
//! LiteralError    - literal text could not be turned into a Value
//!                   (surfaced by the compiler as INVALID_LITERAL)
//! ExecutionError  - evaluation failed (missing binding, overflow, ...)
//! SettingsError   - configuration could not be loaded
//! ```
//!
//! [`Message`]: crate::Message
//! [`CompilationResult`]: crate::CompilationResult

use thiserror::Error;

/// Literal text that cannot be converted into a value of its datatype.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    /// The text does not have the shape of the datatype's literals.
    #[error("'{text}' is not a valid {datatype} literal")]
    Malformed { text: String, datatype: String },

    /// The value does not fit the datatype's range or precision.
    #[error("'{text}' is out of range for {datatype}")]
    OutOfRange { text: String, datatype: String },

    /// The currency suffix of a money literal is not a known ISO code.
    #[error("'{code}' is not a recognized currency code")]
    UnknownCurrency { code: String },

    /// A money literal has more fractional digits than its currency allows.
    #[error("'{text}' has more than {allowed} fractional digits allowed for {currency}")]
    TooManyFractionDigits {
        text: String,
        currency: String,
        allowed: u32,
    },
}

/// Failure while evaluating a successfully compiled expression.
///
/// These are runtime faults or violated preconditions, never diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Evaluation was requested for a result that carries error messages.
    #[error("cannot evaluate an expression that failed to compile")]
    NotCompiled,

    /// The compiled expression reads an identifier the bindings do not supply.
    #[error("no value bound for identifier '{name}'")]
    MissingBinding { name: String },

    /// The bound value does not have the datatype the compiler resolved.
    #[error("value bound to '{name}' is {found}, expected {expected}")]
    BindingTypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// Integer or Decimal division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The result does not fit the datatype.
    #[error("arithmetic overflow in '{operation}'")]
    Overflow { operation: String },

    /// Money amounts of different currencies were combined.
    #[error("cannot combine {left} with {right}")]
    CurrencyMismatch { left: String, right: String },

    /// A value could not be widened at runtime.
    #[error("cannot widen {from} to {to}: {reason}")]
    Coercion {
        from: String,
        to: String,
        reason: String,
    },

    /// An operation kernel received operands of an unexpected datatype.
    #[error("'{operation}' cannot be applied to {found}")]
    OperandMismatch { operation: String, found: String },

    /// A native function reported a failure.
    #[error("function {name} failed: {message}")]
    Function { name: String, message: String },
}

/// Invalid or unreadable compiler settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// TOML syntax or type error.
    #[error("malformed settings: {0}")]
    Toml(#[from] toml::de::Error),

    /// Values that parse but violate a constraint.
    #[error("invalid settings: {0}")]
    Invalid(String),
}
