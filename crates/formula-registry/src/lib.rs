//! Formula Registry crate.
//!
//! Binds operators to implementations:
//! - [`BinaryOperation`] and [`UnaryOperation`] descriptors, which compile
//!   their operands into executable fragments
//! - [`OperationRegistry`], which resolves an operator and operand datatypes
//!   to a descriptor, widening operands where needed
//! - The built-in operation table for Integer, Decimal, Money, Boolean and
//!   String, plus equality for registered enum types

mod builtins;
pub mod error;
pub mod operation;
pub mod registry;

pub use error::RegistrationError;
pub use operation::{BinaryBuilder, BinaryOperation, UnaryOperation};
pub use registry::{BinaryMatch, OperationRegistry, UnaryMatch};
