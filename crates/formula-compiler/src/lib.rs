//! Formula Compiler crate.
//!
//! Turns formula text into a [`CompilationResult`](formula_core::CompilationResult):
//! typed, executable code plus diagnostics.
//!
//! - [`Compiler`] and [`CompilerBuilder`]: the entry point
//! - [`resolve`]: the identifier and function resolver seams
//! - [`StandardFunctions`]: ABS, IF, MIN, MAX, ROUND and friends
//!
//! # Example
//!
//! ```
//! use formula_compiler::Compiler;
//! use formula_core::{Datatype, MessageCode};
//!
//! let compiler = Compiler::builder()
//!     .parameter("age", Datatype::PrimitiveInteger)
//!     .build()
//!     .unwrap();
//!
//! let result = compiler.compile("IF(age >= 18, 10.80EUR / 4.2, 0EUR)");
//! assert!(result.succeeded());
//! assert_eq!(result.datatype(), Some(&Datatype::Money));
//!
//! let result = compiler.compile("unknownVar * 2");
//! assert_eq!(result.messages().codes(), vec![MessageCode::UndefinedIdentifier]);
//! ```

mod compiler;
pub mod error;
mod expr;
pub mod functions;
pub mod resolve;

pub use compiler::{Compiler, CompilerBuilder};
pub use error::CompilerError;
pub use functions::StandardFunctions;
pub use resolve::{
    EnumValueResolver, FunctionResolver, IdentifierResolver, ParameterResolver, ResolveContext,
    ResolverChain,
};
