use std::path::PathBuf;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Errors raised while loading sources or configuration from disk.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The path does not exist
    #[error("Path does not exist: {0}")]
    #[diagnostic(
        code("SOURCE-001"),
        help("Make sure the path exists and has proper permissions")
    )]
    PathNotFound(PathBuf),

    /// Reading a file failed
    #[error("Failed to read {path}: {message}")]
    #[diagnostic(code("SOURCE-002"))]
    ReadError { path: PathBuf, message: String },

    /// `relay.toml` is not valid TOML or does not match the expected shape
    #[error("Invalid configuration: {message}")]
    #[diagnostic(
        code("SOURCE-003"),
        help("Check the [assist] section of relay.toml")
    )]
    ConfigParse {
        message: String,
        #[source_code]
        src: String,
        #[label("here")]
        span: Option<SourceSpan>,
    },
}

/// Result type for source loading.
pub type SourceResult<T> = Result<T, SourceError>;

impl SourceError {
    pub(crate) fn read(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        SourceError::ReadError {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
