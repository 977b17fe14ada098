//! Error types for pack compilation and datapack emission.
//!
//! Every variant is fatal: the compiler surfaces the first violation and
//! aborts the rest of the pass.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while lowering or emitting a pack.
#[derive(Debug, Error)]
pub enum CompileError {
    // -- Structural --
    #[error("function '{0}' must return an ordered sequence of commands")]
    BodyNotSequence(String),

    #[error("then block must be defined")]
    EmptyThen,

    #[error("then block is already defined")]
    ThenAlreadyDefined,

    #[error("else block is already defined")]
    ElseAlreadyDefined,

    #[error("invalid step in '{function}': {message}")]
    InvalidStep { function: String, message: String },

    // -- Naming --
    #[error("function \"{0}\" is already defined!")]
    DuplicateFunction(String),

    #[error("function \"{0}\" is not declared")]
    UnknownFunction(String),

    #[error("\"{0}\" is not a valid namespace (allowed: a-z 0-9 _ . -)")]
    InvalidNamespace(String),

    #[error("\"{0}\" is not a valid function path")]
    InvalidFunctionPath(String),

    // -- Type --
    #[error("selector options and values must both be strings (offending {0})")]
    SelectorFilterType(String),

    #[error("anchored must either be \"feet\" or \"eyes\", got \"{0}\"")]
    InvalidAnchor(String),

    // -- Environment --
    #[error("export folder already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_message() {
        let err = CompileError::AlreadyExists(PathBuf::from("/tmp/pack"));
        assert_eq!(err.to_string(), "export folder already exists: /tmp/pack");
    }

    #[test]
    fn test_duplicate_function_message() {
        let err = CompileError::DuplicateFunction("whoami".to_string());
        assert!(err.to_string().contains("\"whoami\" is already defined"));
    }

    #[test]
    fn test_io_keeps_source() {
        let err = CompileError::io(
            "/x/y.mcfunction",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/x/y.mcfunction"));
    }
}
