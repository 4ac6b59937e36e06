use thiserror::Error;

use formula_core::SettingsError;
use formula_registry::RegistrationError;

/// Errors raised while building a [`Compiler`](crate::Compiler).
///
/// Problems with an expression are never errors; they are reported as
/// messages of its compilation result.
#[derive(Debug, Error)]
pub enum CompilerError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}
