use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

mod commands;
mod error;
mod io;

use commands::FieldArgs;

#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(about = "Generate trait impls that forward to a struct field", long_about = None)]
struct Args {
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Implement the traits of a field's type on the struct by forwarding to the field
    Delegate {
        /// Source file containing the struct
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Directory analyzed together with the file (defaults to the file's directory)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        #[command(flatten)]
        field: FieldArgs,
        /// Trait to generate, e.g. `Deref` or `AsRef<str>` (repeatable, defaults to all)
        #[arg(long = "trait", value_name = "NAME")]
        traits: Vec<String>,
        /// Write the result back to FILE instead of printing the generated impls
        #[arg(short, long)]
        apply: bool,
    },

    /// List the traits a field could delegate and why others are left out
    Traits {
        /// Source file containing the struct
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Directory analyzed together with the file (defaults to the file's directory)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        #[command(flatten)]
        field: FieldArgs,
    },

    /// Replace a struct-typed field by the fields of that struct
    Expand {
        /// Source file containing the struct
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Directory analyzed together with the file (defaults to the file's directory)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        #[command(flatten)]
        field: FieldArgs,
        /// Write the result back to FILE instead of printing it
        #[arg(short, long)]
        apply: bool,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    match args.command {
        Command::Delegate {
            file,
            root,
            field,
            traits,
            apply,
        } => commands::handle_delegate(&file, root.as_deref(), &field, traits, apply)?,
        Command::Traits { file, root, field } => commands::handle_traits(&file, root.as_deref(), &field)?,
        Command::Expand {
            file,
            root,
            field,
            apply,
        } => commands::handle_expand(&file, root.as_deref(), &field, apply)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn delegate_takes_repeated_traits() {
        let args = Args::try_parse_from([
            "relay",
            "delegate",
            "src/lib.rs",
            "--field",
            "Labeled.shape",
            "--trait",
            "Deref",
            "--trait",
            "AsRef<str>",
        ])
        .unwrap();
        let Command::Delegate { traits, field, apply, .. } = args.command else {
            panic!("parsed {:?}", args.command);
        };
        assert_eq!(traits, ["Deref", "AsRef<str>"]);
        assert_eq!(field.field.as_deref(), Some("Labeled.shape"));
        assert!(!apply);
    }

    #[test]
    fn field_needs_exactly_one_locator() {
        assert!(Args::try_parse_from(["relay", "traits", "lib.rs"]).is_err());
        assert!(Args::try_parse_from(["relay", "expand", "lib.rs", "--offset", "3", "--field", "A.b"]).is_err());
        assert!(Args::try_parse_from(["relay", "expand", "lib.rs", "--offset", "3"]).is_ok());
    }

    #[test]
    fn malformed_field_paths_are_rejected() {
        let field = FieldArgs {
            offset: None,
            field: Some("Labeled".to_string()),
        };
        assert!(matches!(field.target(), Err(error::CliError::InvalidField(_))));
    }
}
