//! Formula Parser crate.
//!
//! This crate provides the lexer and parser for formula expressions.
//! It includes:
//! - Locale-aware lexical analysis (tokenization)
//! - Abstract Syntax Tree (AST) definitions
//! - Pratt parser for transforming tokens into an AST
//! - Error types and reporting
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use formula_parser::{Expr, ParseOptions, Parser};
//!
//! let arena = Bump::new();
//! match Parser::parse("IF(age >= 18; 10,80EUR; 0EUR)", &ParseOptions {
//!     locale: formula_core::Locale::GERMAN,
//!     ..ParseOptions::default()
//! }, &arena) {
//!     Expr::Invalid(error) => eprintln!("Parse error: {}", error),
//!     expr => println!("Parsed: {}", expr),
//! }
//! ```

// Lexer module
pub mod lexer;

// AST module
pub mod ast;

// Re-export commonly used types at crate root
pub use ast::{Expr, LiteralKind, ParseError, ParseErrorKind, ParseOptions, Parser};
pub use lexer::{Lexer, Token, TokenKind};
