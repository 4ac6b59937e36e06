//! Formula language.
//!
//! Compiles small business expressions over integers, decimals, money,
//! booleans, strings and enum members into typed code, then evaluates that
//! code against identifier bindings.
//!
//! The work is split over the workspace crates:
//! - `formula-core`: datatypes, values, diagnostics, settings
//! - `formula-parser`: lexer and Pratt parser
//! - `formula-registry`: operator overloads and their kernels
//! - `formula-compiler`: resolvers, standard functions and the compiler
//!
//! This crate adds the evaluator, the [`Engine`] facade and [`logging`] setup.
//!
//! # Example
//!
//! ```
//! use formula::prelude::*;
//!
//! let engine = Engine::builder()
//!     .parameter("premium", Datatype::Money)
//!     .build()
//!     .unwrap();
//!
//! let result = engine.compile("premium / 4.2");
//! assert_eq!(result.datatype(), Some(&Datatype::Money));
//!
//! let mut bindings = Bindings::default();
//! bindings.insert(
//!     "premium".into(),
//!     Datatype::Money.parse_literal("10.80EUR", &Locale::ENGLISH).unwrap(),
//! );
//! let value = evaluate(&result, &bindings).unwrap();
//! assert_eq!(value.to_string(), "2.57EUR");
//! ```

mod engine;
pub mod error;
mod eval;
pub mod logging;

pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, EngineResult};
pub use eval::{Bindings, evaluate};

pub use formula_compiler as compiler;
pub use formula_core as core;
pub use formula_parser as parser;
pub use formula_registry as registry;

pub mod prelude {
    pub use crate::engine::{Engine, EngineBuilder};
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::eval::{Bindings, evaluate};
    pub use formula_compiler::{
        Compiler, CompilerBuilder, FunctionResolver, IdentifierResolver, ResolveContext,
    };
    pub use formula_core::{
        CompilationResult, CompilerSettings, Datatype, EnumType, ExecutionError, Locale, Message,
        MessageCode, MessageList, NumericConfig, RoundingMode, Value,
    };
}
