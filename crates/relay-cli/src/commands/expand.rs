use std::path::Path;

use super::{load, report_diagnostics, FieldArgs};
use crate::error::CliError;
use crate::io::write_file;

pub fn handle_expand(file: &Path, root: Option<&Path>, field: &FieldArgs, apply: bool) -> Result<(), CliError> {
    let host = load(file, root)?;
    let analysis = host.analysis();
    report_diagnostics(&analysis, file)?;

    let outcome = analysis.expand(file, &field.target()?)?;
    let text = outcome.plan.apply(&analysis.file_text(file)?);
    if apply {
        write_file(file, &text)?;
        println!("Expanded into {} in {}", outcome.fields.join(", "), file.display());
    } else {
        print!("{text}");
    }
    Ok(())
}
