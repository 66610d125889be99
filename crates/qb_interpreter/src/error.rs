use std::io;

use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A variable was read before any assignment. Raised in strict mode
    /// only; lenient mode resolves the read to zero instead.
    #[error("variable `{0}` is not defined")]
    UndefinedVariable(String),
    /// A string literal used where an integer value is required, e.g. as a
    /// `let` value. The parser never produces such a statement; hand-built
    /// ones can.
    #[error("string literal \"{0}\" used where an integer is required")]
    NotAnInteger(String),
    /// The output sink rejected a write
    #[error("failed to write program output")]
    Output(#[from] io::Error),
}
