use crate::Bindings;
use thiserror::Error;
use tilde_eval::{ErrorKind, EvalError};
use tilde_parse::ParseError;

/// Failure of a one-shot [`run`](crate::run).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) => ErrorKind::Syntax,
            Error::Eval(err) => err.kind(),
        }
    }

    /// Source line the failure is attributed to, if known.
    pub fn line(&self) -> Option<u32> {
        match self {
            Error::Parse(err) => Some(err.line),
            Error::Eval(err) => err.line(),
        }
    }
}

/// A run that stopped at a failing statement, with the bindings made
/// before it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct PartialRun {
    pub error: EvalError,
    pub bindings: Bindings,
}
