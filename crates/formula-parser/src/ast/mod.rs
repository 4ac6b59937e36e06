//! Abstract Syntax Tree (AST) for formula expressions.
//!
//! This module provides:
//! - AST node definitions for literals, identifiers, operators and calls
//! - The Pratt parser transforming tokens into an AST
//! - Error types and reporting

pub mod error;
pub mod expr;
pub mod ops;

mod expr_parser;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use expr::*;
pub use ops::{PREFIX_BINDING_POWER, binary_op_from_token, binding_power, unary_op_from_token};
pub use parser::{ParseOptions, Parser};
