mod delegate;
mod expand;
mod traits;

pub use delegate::handle_delegate;
pub use expand::handle_expand;
pub use traits::handle_traits;

use std::path::{Path, PathBuf};

use relay_assists::FieldTarget;
use relay_db::{Analysis, AnalysisHost};

use crate::error::CliError;

/// How a command points at a field. Exactly one of the two is given.
#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
pub struct FieldArgs {
    /// Byte offset of a cursor inside the field declaration
    #[arg(long, value_name = "N")]
    pub offset: Option<usize>,
    /// The field as `Struct.field`
    #[arg(long, value_name = "STRUCT.FIELD")]
    pub field: Option<String>,
}

impl FieldArgs {
    pub fn target(&self) -> Result<FieldTarget, CliError> {
        match (&self.offset, &self.field) {
            (Some(offset), _) => Ok(FieldTarget::Offset(*offset)),
            (None, Some(path)) => FieldTarget::parse_path(path).ok_or_else(|| CliError::InvalidField(path.clone())),
            (None, None) => Err(CliError::InvalidField(String::new())),
        }
    }
}

/// Loads `root` (the file's directory by default) and logs what the file and the
/// workspace have wrong before any assist runs.
pub fn load(file: &Path, root: Option<&Path>) -> Result<AnalysisHost, CliError> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    };
    Ok(AnalysisHost::load(&root)?)
}

pub fn report_diagnostics(analysis: &Analysis, file: &Path) -> Result<(), CliError> {
    for error in analysis.syntax_errors(file)? {
        log::warn!("{}: {error}", file.display());
    }
    for diagnostic in analysis.lowering_diagnostics() {
        log::warn!("{diagnostic}");
    }
    Ok(())
}

/// Prints a diagnostic without failing the command.
fn print_diagnostic(diagnostic: impl miette::Diagnostic + Send + Sync + 'static) {
    eprintln!("{:?}", miette::Report::new(diagnostic));
}
