//! Errors of the [`Engine`](crate::Engine) facade.

use formula_compiler::CompilerError;
use formula_core::{ExecutionError, MessageList, SettingsError};
use thiserror::Error;

/// Everything that can go wrong between settings text and a value.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Compiler(#[from] CompilerError),

    /// The expression did not compile; the diagnostics are attached.
    #[error("expression failed to compile: {0}")]
    Compilation(MessageList),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

pub type EngineResult<T> = Result<T, EngineError>;
