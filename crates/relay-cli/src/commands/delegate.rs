use std::path::Path;

use relay_assists::DelegateRequest;

use super::{load, print_diagnostic, report_diagnostics, FieldArgs};
use crate::error::CliError;
use crate::io::write_file;

pub fn handle_delegate(
    file: &Path,
    root: Option<&Path>,
    field: &FieldArgs,
    traits: Vec<String>,
    apply: bool,
) -> Result<(), CliError> {
    let host = load(file, root)?;
    let analysis = host.analysis();
    report_diagnostics(&analysis, file)?;

    let request = DelegateRequest::new(field.target()?).with_traits(traits);
    let outcome = analysis.delegate(file, &request)?;
    for exclusion in &outcome.exclusions {
        print_diagnostic(exclusion.clone());
    }

    if apply {
        let text = analysis.file_text(file)?;
        write_file(file, &outcome.plan.apply(&text))?;
        println!("Wrote {} impl(s) to {}", outcome.generated.len(), file.display());
    } else {
        let impls: Vec<&str> = outcome.generated.iter().map(|generated| generated.text.as_str()).collect();
        println!("{}", impls.join("\n\n"));
    }
    Ok(())
}
