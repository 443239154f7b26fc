use std::path::PathBuf;

use miette::Diagnostic;
use relay_db::DbError;
use thiserror::Error;

/// CLI-specific error type that provides rich diagnostics
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("`{0}` does not name a field")]
    #[diagnostic(
        code(relay::cli::invalid_field),
        help("Write the field as `Struct.field`, e.g. `Labeled.shape`, `geo::Size.width` or `Pair.0`")
    )]
    InvalidField(String),

    #[error("Failed to write file {path}")]
    #[diagnostic(code(relay::cli::io_error))]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Analysis(#[from] DbError),
}

/// Convert IO errors with context
pub fn convert_io_error(error: std::io::Error, path: PathBuf) -> CliError {
    CliError::IoError { path, source: error }
}
