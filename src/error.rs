use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TixyError>;

/// the source text could not be turned into an evaluator
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", messages.join("; "))]
pub struct CompileError {
    pub messages: Vec<String>,
}

impl CompileError {
    pub fn new(messages: impl IntoIterator<Item = String>) -> Self {
        CompileError {
            messages: messages.into_iter().collect(),
        }
    }
}

/// raised while evaluating one cell; returned as a value, never propagated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("{0} is not defined")]
    UnknownName(String),

    #[error("{0} is not a function")]
    NotCallable(String),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no javascript file found in {path}")]
    NoScript { path: PathBuf },

    #[error("found multiple javascript files but no tixy.js in {path}")]
    Ambiguous { path: PathBuf },

    #[error("javascript file larger than 1MB: {path}")]
    TooLarge { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum TixyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not set up logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}
