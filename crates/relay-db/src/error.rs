use std::path::PathBuf;

use miette::Diagnostic;
use relay_assists::{AbortReason, ExpandError};
use relay_source::SourceError;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DbError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error("{0} is not part of the analyzed workspace")]
    #[diagnostic(
        code("DB-001"),
        help("Pass the file itself or a directory containing it")
    )]
    UnknownFile(PathBuf),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Delegate(#[from] AbortReason),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Expand(#[from] ExpandError),
}

pub type DbResult<T> = Result<T, DbError>;
