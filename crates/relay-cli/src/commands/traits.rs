use std::path::Path;

use super::{load, print_diagnostic, report_diagnostics, FieldArgs};
use crate::error::CliError;

/// Lists what a default delegate run would generate without changing anything.
pub fn handle_traits(file: &Path, root: Option<&Path>, field: &FieldArgs) -> Result<(), CliError> {
    let host = load(file, root)?;
    let analysis = host.analysis();
    report_diagnostics(&analysis, file)?;

    let report = analysis.traits(file, &field.target()?)?;
    println!("{} delegates to `{}`", report.composite, report.field_ty);
    if report.candidates.is_empty() {
        println!("  no traits to delegate");
    }
    for candidate in &report.candidates {
        println!("  {candidate}");
    }
    for exclusion in report.exclusions {
        print_diagnostic(exclusion);
    }
    Ok(())
}
