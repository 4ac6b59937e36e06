//! Formula Core crate.
//!
//! Shared vocabulary of the formula language compiler:
//! - The datatype catalog and its implicit coercions
//! - Runtime values, currencies and money amounts
//! - Enumeration types
//! - Operators
//! - Diagnostics (messages and message lists)
//! - Compiled fragments and compilation results
//! - Locale, numeric and compiler settings
//! - Error types for literal parsing, evaluation and configuration
//!
//! # Example
//!
//! ```
//! use formula_core::{Datatype, Locale, Value};
//!
//! let value = Datatype::Money.parse_literal("10.80EUR", &Locale::ENGLISH).unwrap();
//! assert_eq!(value.datatype(), Datatype::Money);
//! assert!(Datatype::Integer.can_coerce_to(&Datatype::Money));
//! assert_eq!(Value::Integer(3).to_string(), "3");
//! ```

pub mod currency;
pub mod datatype;
pub mod enumeration;
pub mod error;
pub mod fragment;
pub mod message;
pub mod ops;
pub mod result;
pub mod settings;
pub mod span;
pub mod value;

pub use currency::{Currency, Money};
pub use datatype::Datatype;
pub use enumeration::EnumType;
pub use error::{ExecutionError, LiteralError, SettingsError};
pub use fragment::{
    BinaryKernel, BinaryNode, CallNode, ConditionalNode, Fragment, NativeFunction,
    ShortCircuitNode, UnaryKernel, UnaryNode,
};
pub use message::{InvalidObject, Message, MessageCode, MessageList, Severity};
pub use ops::{BinaryOp, UnaryOp};
pub use result::CompilationResult;
pub use settings::{CompilerSettings, Locale, NumericConfig, RoundingMode};
pub use span::Span;
pub use value::{EnumValue, Value};
pub use rust_decimal::{self, Decimal};
