//! Lexical analysis for formula expressions.

mod cursor;
mod error;
#[allow(clippy::module_inception)]
mod lexer;
mod token;

pub use error::{LexerError, LexerErrorKind};
pub use lexer::Lexer;
pub use token::{Token, TokenKind};
